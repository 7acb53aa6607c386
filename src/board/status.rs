use crate::prelude::*;

/// Outcome of a position under the rules of chess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The side that is checkmated
    Checkmate(Side),
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl GameStatus {
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    #[inline(always)]
    pub const fn is_draw(&self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::InsufficientMaterial
                | GameStatus::FiftyMoveRule
                | GameStatus::ThreefoldRepetition
        )
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "Game in progress"),
            GameStatus::Checkmate(loser) => write!(f, "Checkmate! {} wins", loser.flip()),
            GameStatus::Stalemate => write!(f, "Draw by stalemate"),
            GameStatus::InsufficientMaterial => write!(f, "Draw by insufficient material"),
            GameStatus::FiftyMoveRule => write!(f, "Draw by the fifty-move rule"),
            GameStatus::ThreefoldRepetition => write!(f, "Draw by threefold repetition"),
        }
    }
}

impl Board {
    pub fn status(&self) -> GameStatus {
        let mut moves = Vec::with_capacity(MAX_MOVES);
        self.generate_legal_moves(&mut moves);
        self.status_with_moves(&moves)
    }

    /// Same as [`Board::status`] when the legal moves are already known.
    pub fn status_with_moves(&self, legal_moves: &[Move]) -> GameStatus {
        if legal_moves.is_empty() {
            return if self.is_in_check(self.stm) {
                GameStatus::Checkmate(self.stm)
            } else {
                GameStatus::Stalemate
            };
        }
        if self.is_insufficient_material() {
            return GameStatus::InsufficientMaterial;
        }
        if self.halfmove_clock >= 100 {
            return GameStatus::FiftyMoveRule;
        }
        if self.is_threefold_repetition() {
            return GameStatus::ThreefoldRepetition;
        }
        GameStatus::Ongoing
    }

    #[inline(always)]
    pub fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.status(), GameStatus::Checkmate(_))
    }

    /// Neither side can possibly deliver mate: no pawns, rooks or queens,
    /// and at most one minor piece or only bishops on one square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let pos = &self.positions;
        let heavy_or_pawn = Side::SIDES.iter().any(|&side| {
            pos.count(side, Piece::Pawn) > 0
                || pos.count(side, Piece::Rook) > 0
                || pos.count(side, Piece::Queen) > 0
        });
        if heavy_or_pawn {
            return false;
        }

        let knights: u32 = Side::SIDES.iter().map(|&s| pos.count(s, Piece::Knight)).sum();
        let bishops = *pos.get_piece_bb(Side::White, Piece::Bishop)
            | *pos.get_piece_bb(Side::Black, Piece::Bishop);
        let minors = knights + bishops.pop_count();
        if minors <= 1 {
            return true;
        }
        if knights > 0 {
            return false;
        }

        let light = BitBoard(LIGHT_SQUARES);
        (bishops & light).is_empty() || (bishops & !light).is_empty()
    }

    /// Number of earlier occurrences of the current position since the last
    /// irreversible move.
    pub fn repetition_count(&self) -> usize {
        let history = self.hash_history();
        let window = (self.halfmove_clock as usize).min(history.len());
        history[history.len() - window..]
            .iter()
            .filter(|&&h| h == self.hash)
            .count()
    }

    #[inline(always)]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkmate_and_stalemate() {
        // Fool's mate
        let board = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(board.status(), GameStatus::Checkmate(Side::White));
        assert!(board.is_game_over());
        assert!(board.is_checkmate());

        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(board.status(), GameStatus::Stalemate);
        assert!(board.status().is_draw());
        assert!(!board.is_checkmate());
    }

    #[test]
    fn test_insufficient_material() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KB2 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
            // Bishops on opposite colours, then on the same colour
            ("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1", false),
            ("5b2/4k3/8/8/8/8/8/2B1K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/4P3/4KB2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/4KNN1 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/3NKB2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let board = Board::from_fen(fen);
            assert_eq!(board.is_insufficient_material(), expected, "{fen}");
        }
    }

    #[test]
    fn test_fifty_move_rule() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w - - 100 80");
        assert_eq!(board.status(), GameStatus::FiftyMoveRule);
        let board = Board::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w - - 99 80");
        assert_eq!(board.status(), GameStatus::Ongoing);
    }

    #[test]
    fn test_threefold_repetition() {
        let mut board = Board::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        for _ in 0..2 {
            assert!(!board.is_threefold_repetition());
            for uci in shuffle {
                let mv = Move::from_uci(&board, uci).unwrap();
                board.make_move(mv).unwrap();
            }
        }
        assert_eq!(board.repetition_count(), 2);
        assert_eq!(board.status(), GameStatus::ThreefoldRepetition);
    }
}
