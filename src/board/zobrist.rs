use std::sync::LazyLock;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::prelude::*;

pub static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::new);

#[derive(Debug)]
pub struct ZobristKeys {
    /// Per side, per piece type, per square
    pub pieces: [[[u64; NUM_SQUARES]; NUM_PIECES]; NUM_SIDES],
    /// One key per castling rights nibble
    pub castling: [u64; NUM_CASTLING_RIGHTS],
    /// En passant file, only hashed when a capture is actually possible
    pub en_passant_file: [u64; NUM_FILES],
    pub black_to_move: u64,
}

impl ZobristKeys {
    pub fn new() -> Self {
        // Fixed seed so hashes are reproducible between runs
        let mut rng = StdRng::seed_from_u64(1070373321345817214);
        let mut keys = Self {
            pieces: [[[0; NUM_SQUARES]; NUM_PIECES]; NUM_SIDES],
            castling: [0; NUM_CASTLING_RIGHTS],
            en_passant_file: [0; NUM_FILES],
            black_to_move: rng.random(),
        };

        for side in keys.pieces.iter_mut() {
            for piece in side.iter_mut() {
                piece.iter_mut().for_each(|key| *key = rng.random());
            }
        }
        keys.castling.iter_mut().for_each(|key| *key = rng.random());
        keys.en_passant_file
            .iter_mut()
            .for_each(|key| *key = rng.random());

        keys
    }

    #[inline(always)]
    pub fn piece(&self, side: Side, piece: Piece, square: Square) -> u64 {
        self.pieces[side.index()][piece.index()][square.index()]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// En passant key of `board`, or 0 when no pawn of the side to move can
/// take on the en passant square.
pub fn en_passant_key(board: &Board) -> u64 {
    let Some(ep_sq) = board.enpassant_square else {
        return 0;
    };
    // Squares from which a pawn of the side to move attacks `ep_sq`
    let capturers = MOVE_TABLES.get_pawn_attacks(ep_sq.index(), board.stm.flip())
        & *board.positions.get_piece_bb(board.stm, Piece::Pawn);
    if capturers.any() {
        ZOBRIST.en_passant_file[ep_sq.col()]
    } else {
        0
    }
}

/// Hash of `board` computed from scratch.
pub fn calculate_hash(board: &Board) -> u64 {
    let mut hash = 0;

    for (piece, side) in Piece::all() {
        for sq in board.positions.get_piece_bb(side, piece).iter_bits() {
            hash ^= ZOBRIST.pieces[side.index()][piece.index()][sq];
        }
    }

    hash ^= ZOBRIST.castling[board.castling_rights.0 as usize];
    hash ^= en_passant_key(board);

    if board.stm == Side::Black {
        hash ^= ZOBRIST.black_to_move;
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_incremental_hash(fen: &str) {
        let mut board = Board::from_fen(fen);
        let original_hash = board.hash;
        assert_eq!(original_hash, calculate_hash(&board), "initial hash for {fen}");

        let mut legal_moves = Vec::with_capacity(MAX_MOVES);
        board.generate_legal_moves(&mut legal_moves);

        for mv in legal_moves {
            let info = board.make_move(mv).unwrap();
            assert_eq!(
                board.hash,
                calculate_hash(&board),
                "incremental hash mismatch after {mv} on {fen}"
            );
            assert_ne!(board.hash, original_hash, "hash unchanged after {mv}");

            board.unmake_move(&info).unwrap();
            assert_eq!(board.hash, original_hash, "hash not restored after {mv} on {fen}");
        }
    }

    #[test]
    fn test_incremental_hash_startpos() {
        assert_incremental_hash(START_FEN);
    }

    #[test]
    fn test_incremental_hash_kiwipete() {
        assert_incremental_hash(KIWIPETE);
    }

    #[test]
    fn test_incremental_hash_special_moves() {
        // Double pushes creating en passant chances
        assert_incremental_hash("rnbqkbnr/pppp1ppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        // En passant capture available
        assert_incremental_hash("rnbqkbnr/pp1p1ppp/8/2pPp3/8/8/PPP1PPPP/RNBQKBNR w KQkq e6 0 3");
        // Castling with partial rights
        assert_incremental_hash("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 1 1");
        // Promotions with and without capture
        assert_incremental_hash("r3k2r/pPpp1ppp/1b3nbN/nP6/BBP1P3/q4N2/P2P2PP/R2Q1RK1 w kq - 0 1");
    }

    #[test]
    fn test_hash_depends_on_side_to_move_and_rights() {
        let white = Board::from_fen(START_FEN);
        let black = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
        assert_ne!(white.hash, black.hash);

        let fewer_rights = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kk - 0 1");
        assert_ne!(white.hash, fewer_rights.hash);
    }

    #[test]
    fn test_hash_ignores_unusable_en_passant_square() {
        // No black pawn can take on e3
        let with_ep = Board::from_fen("rnbqkbnr/pppp1ppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        let without = Board::from_fen("rnbqkbnr/pppp1ppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        assert_eq!(with_ep.hash, without.hash);

        // Black pawn on d4 can
        let with_ep = Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1");
        let without = Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - - 0 1");
        assert_ne!(with_ep.hash, without.hash);
    }
}
