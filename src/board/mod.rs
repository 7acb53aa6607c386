use crate::{
    board::zobrist::{calculate_hash, en_passant_key},
    prelude::*,
};

pub mod components;
pub mod fen;
pub mod status;
pub mod zobrist;

#[cfg(test)]
mod tests;

/// A chess position plus everything needed to unwind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub positions: BoardState,
    pub stm: Side,
    pub castling_rights: CastlingRights,
    pub enpassant_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_counter: u16,
    pub hash: u64,
    /// Hashes of every position before the current one, oldest first
    history: Vec<u64>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        Self::from_fen(START_FEN)
    }

    /// An empty board with no pieces, white to move.
    pub(crate) fn empty() -> Self {
        Self {
            positions: BoardState::default(),
            stm: Side::White,
            castling_rights: CastlingRights::empty(),
            enpassant_square: None,
            halfmove_clock: 0,
            fullmove_counter: 1,
            hash: 0,
            history: Vec::with_capacity(MAX_MOVES),
        }
    }

    pub fn try_from_fen(fen: &str) -> miette::Result<Self> {
        fen::parse_fen(fen)
    }

    /// Parses `fen`, panicking on invalid input.
    pub fn from_fen(fen: &str) -> Self {
        match Self::try_from_fen(fen) {
            Ok(board) => board,
            Err(e) => panic!("Invalid FEN '{fen}': {e:?}"),
        }
    }

    pub fn to_fen(&self) -> String {
        fen::to_fen(self)
    }

    pub(crate) fn recompute_hash(&mut self) {
        self.hash = calculate_hash(self);
    }

    #[inline(always)]
    pub fn get_piece_at(&self, square: Square) -> Option<(Piece, Side)> {
        self.positions.get_piece_at(square)
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.positions
            .get_piece_bb(side, Piece::King)
            .lsb()
            .and_then(|sq| Square::new(sq as usize))
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.king_square(side)
            .is_some_and(|king| self.is_attacked_by(king, side.flip()))
    }

    /// Every piece of `side` that attacks `square`, kings and pinned pieces
    /// included.
    pub fn attackers_to(&self, square: Square, side: Side) -> BitBoard {
        let sq = square.index();
        let occupied = self.positions.get_occupied_bb();
        let pieces = |piece| *self.positions.get_piece_bb(side, piece);

        (MOVE_TABLES.get_pawn_attacks(sq, side.flip()) & pieces(Piece::Pawn))
            | (MOVE_TABLES.knight_moves[sq] & pieces(Piece::Knight))
            | (MOVE_TABLES.king_moves[sq] & pieces(Piece::King))
            | (MOVE_TABLES.get_bishop_attacks(sq, occupied)
                & self.positions.get_diag_sliders_bb(side))
            | (MOVE_TABLES.get_rook_attacks(sq, occupied)
                & self.positions.get_ortho_sliders_bb(side))
    }

    #[inline(always)]
    pub fn is_attacked_by(&self, square: Square, side: Side) -> bool {
        self.attackers_to(square, side).any()
    }

    /// Attack set of the piece on `square`, squares held by its own side
    /// included. Empty if the square is empty.
    pub fn attacks_from(&self, square: Square) -> BitBoard {
        match self.get_piece_at(square) {
            Some((piece, side)) => MOVE_TABLES.attacks_of(
                piece,
                side,
                square.index(),
                self.positions.get_occupied_bb(),
            ),
            None => BitBoard::EMPTY,
        }
    }

    pub fn fingerprint(&self) -> PositionFingerprint {
        PositionFingerprint::from_state(&self.positions)
    }

    pub fn generate_legal_moves(&self, moves: &mut Vec<Move>) {
        moves.clear();
        move_gen::generate_legal_moves(self, moves);
    }

    /// Hashes of the positions before this one, oldest first.
    pub fn hash_history(&self) -> &[u64] {
        &self.history
    }

    /// Plays `mv` only if it is legal in the current position.
    pub fn try_move(&mut self, mv: Move) -> miette::Result<MoveInfo> {
        let mut legal = Vec::with_capacity(MAX_MOVES);
        self.generate_legal_moves(&mut legal);
        miette::ensure!(
            legal.contains(&mv),
            "{mv} is not a legal move in {}",
            self.to_fen()
        );
        self.make_move(mv)
    }

    /// Applies `mv` without checking legality. The returned [`MoveInfo`]
    /// restores the position through [`Board::unmake_move`].
    pub fn make_move(&mut self, mv: Move) -> miette::Result<MoveInfo> {
        let from = mv.from_sq();
        let to = mv.to_sq();
        let us = self.stm;
        let them = us.flip();

        let (piece_moved, mover) = self
            .get_piece_at(from)
            .with_context(|| format!("[make_move] No piece on {from} for {mv}"))?;
        miette::ensure!(mover == us, "[make_move] {from} holds a {mover} piece, {us} to move");

        let mut info = MoveInfo {
            mv,
            piece_moved,
            captured: None,
            castling_rights: self.castling_rights,
            enpassant_square: self.enpassant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_counter: self.fullmove_counter,
            hash: self.hash,
        };

        let mut hash = self.hash;
        hash ^= en_passant_key(self);
        hash ^= ZOBRIST.castling[self.castling_rights.0 as usize];

        // Remove the captured piece first so that the destination is free
        let captured_sq = if mv.is_enpassant() {
            let index = if us == Side::White {
                to.index() - 8
            } else {
                to.index() + 8
            };
            Square::new(index)
        } else if self.positions.is_occupied(to.index()) {
            Some(to)
        } else {
            None
        };
        if let Some(sq) = captured_sq {
            let victim = self.positions.remove_piece(sq)?;
            miette::ensure!(
                victim.side == them,
                "[make_move] {mv} captures its own piece on {sq}"
            );
            hash ^= ZOBRIST.piece(them, victim.piece, sq);
            info.captured = Some((victim.piece, sq));
        }

        self.positions.move_piece(from, to)?;
        hash ^= ZOBRIST.piece(us, piece_moved, from);

        if let Some(promoted) = mv.promotion() {
            self.positions.remove_piece(to)?;
            self.positions.set(us, promoted, to)?;
            hash ^= ZOBRIST.piece(us, promoted, to);
        } else {
            hash ^= ZOBRIST.piece(us, piece_moved, to);
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castling_rook_squares(mv)?;
            self.positions.move_piece(rook_from, rook_to)?;
            hash ^= ZOBRIST.piece(us, Piece::Rook, rook_from);
            hash ^= ZOBRIST.piece(us, Piece::Rook, rook_to);
        }

        self.castling_rights.remove_right(
            CastlingRights::rights_touched_by(from.index())
                | CastlingRights::rights_touched_by(to.index()),
        );

        self.enpassant_square = if mv.is_double_push() {
            Square::new((from.index() + to.index()) / 2)
        } else {
            None
        };

        if piece_moved == Piece::Pawn || info.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Side::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }

        self.stm = them;
        hash ^= ZOBRIST.black_to_move;
        hash ^= ZOBRIST.castling[self.castling_rights.0 as usize];
        hash ^= en_passant_key(self);

        self.history.push(info.hash);
        self.hash = hash;

        Ok(info)
    }

    /// Reverts the move described by `info`, which must be the last move
    /// made on this board.
    pub fn unmake_move(&mut self, info: &MoveInfo) -> miette::Result<()> {
        let mv = info.mv;
        let from = mv.from_sq();
        let to = mv.to_sq();
        let us = self.stm.flip();

        if mv.is_castle() {
            let (rook_from, rook_to) = castling_rook_squares(mv)?;
            self.positions.move_piece(rook_to, rook_from)?;
        }

        if mv.is_promotion() {
            self.positions.remove_piece(to)?;
            self.positions.set(us, Piece::Pawn, to)?;
        }
        self.positions.move_piece(to, from)?;

        if let Some((piece, sq)) = info.captured {
            self.positions.set(us.flip(), piece, sq)?;
        }

        self.stm = us;
        self.castling_rights = info.castling_rights;
        self.enpassant_square = info.enpassant_square;
        self.halfmove_clock = info.halfmove_clock;
        self.fullmove_counter = info.fullmove_counter;
        self.hash = info.hash;
        self.history.pop();

        Ok(())
    }
}

/// (from, to) of the rook for a castling move.
fn castling_rook_squares(mv: Move) -> miette::Result<(Square, Square)> {
    let king_to = mv.to_idx() as usize;
    let (rook_from, rook_to) = if mv.flags() == Move::KING_CASTLE {
        (king_to + 1, king_to - 1)
    } else {
        (king_to - 2, king_to + 1)
    };
    let rook_from = Square::new(rook_from).context("castling rook square off the board")?;
    let rook_to = Square::new(rook_to).context("castling rook square off the board")?;
    Ok((rook_from, rook_to))
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for rank in (0..NUM_RANKS).rev() {
            write!(f, " {} |", rank + 1)?;
            for file in 0..NUM_FILES {
                let c = match self.positions.mailbox()[rank * 8 + file] {
                    Some(info) => info.piece.icon(info.side),
                    None => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   +----------------")?;
        writeln!(f, "     a b c d e f g h")?;
        writeln!(f)?;
        writeln!(f, "{} to move", self.stm)?;
        write!(f, "FEN: {}", self.to_fen())
    }
}
