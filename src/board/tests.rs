use crate::prelude::*;

fn sq(s: &str) -> Square {
    Square::from_str(s).unwrap()
}

#[cfg(test)]
mod make_unmake_tests {
    use super::*;

    fn assert_make_unmake(fen: &str, uci: &str) -> Board {
        let mut board = Board::from_fen(fen);
        let orig_board = board.clone();

        let mv = Move::from_uci(&board, uci).unwrap();
        let move_data = board.make_move(mv).unwrap();
        let after = board.clone();
        assert_ne!(board, orig_board, "{uci} did not change the board");

        board.unmake_move(&move_data).unwrap();
        assert_eq!(board, orig_board, "{uci} was not undone on {fen}");
        after
    }

    #[test]
    fn test_make_unmake_quiet() {
        let after = assert_make_unmake(START_FEN, "e2e4");
        assert_eq!(after.get_piece_at(sq("e4")), Some((Piece::Pawn, Side::White)));
        assert_eq!(after.get_piece_at(sq("e2")), None);
        assert_eq!(after.stm, Side::Black);
        assert_eq!(
            after.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn test_make_unmake_capture() {
        let after = assert_make_unmake(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
            "e4d5",
        );
        assert_eq!(after.positions.count(Side::Black, Piece::Pawn), 7);
        assert_eq!(after.halfmove_clock, 0);
    }

    #[test]
    fn test_make_unmake_castling() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let after = assert_make_unmake(fen, "e1g1");
        assert_eq!(after.get_piece_at(sq("f1")), Some((Piece::Rook, Side::White)));
        assert_eq!(after.get_piece_at(sq("g1")), Some((Piece::King, Side::White)));
        assert!(!after.castling_rights.has_rights(Side::White));
        assert!(after.castling_rights.has_rights(Side::Black));

        let after = assert_make_unmake(fen, "e1c1");
        assert_eq!(after.get_piece_at(sq("d1")), Some((Piece::Rook, Side::White)));
        assert_eq!(after.get_piece_at(sq("a1")), None);
    }

    #[test]
    fn test_rook_capture_removes_rights() {
        let after = assert_make_unmake("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "a1a8");
        assert_eq!(after.castling_rights.to_string(), "Kk");
    }

    #[test]
    fn test_make_unmake_en_passant() {
        let after = assert_make_unmake(
            "rnbqkbnr/pp1p1ppp/8/2pPp3/8/8/PPP1PPPP/RNBQKBNR w KQkq e6 0 3",
            "d5e6",
        );
        assert_eq!(after.get_piece_at(sq("e5")), None);
        assert_eq!(after.get_piece_at(sq("e6")), Some((Piece::Pawn, Side::White)));
    }

    #[test]
    fn test_make_unmake_promotion() {
        let fen = "1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1";
        let after = assert_make_unmake(fen, "a7a8q");
        assert_eq!(after.get_piece_at(sq("a8")), Some((Piece::Queen, Side::White)));
        let after = assert_make_unmake(fen, "a7b8n");
        assert_eq!(after.get_piece_at(sq("b8")), Some((Piece::Knight, Side::White)));
        assert_eq!(after.positions.count(Side::White, Piece::Pawn), 0);
    }

    #[test]
    fn test_make_move_rejects_wrong_side() {
        let mut board = Board::new();
        let mv = Move::new(sq("e7").index() as u8, sq("e5").index() as u8, Move::DOUBLE_PAWN);
        assert!(board.make_move(mv).is_err());
        let empty = Move::new(sq("e4").index() as u8, sq("e5").index() as u8, Move::QUIET);
        assert!(board.make_move(empty).is_err());
    }

    #[test]
    fn test_try_move_requires_legality() {
        // Pinned knight
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let mv = Move::new(sq("e2").index() as u8, sq("c3").index() as u8, Move::QUIET);
        assert!(board.try_move(mv).is_err());
        let mv = Move::new(sq("e1").index() as u8, sq("d1").index() as u8, Move::QUIET);
        assert!(board.try_move(mv).is_ok());
    }
}

#[cfg(test)]
mod query_tests {
    use super::*;

    #[test]
    fn test_attackers_to() {
        let board = Board::from_fen("4k3/8/8/3p4/2N1R3/8/8/4K3 w - - 0 1");
        assert!(board.attackers_to(sq("d5"), Side::White).is_empty());
        let attackers = board.attackers_to(sq("e5"), Side::White);
        assert_eq!(attackers.pop_count(), 2);
        assert!(attackers.contains_square(sq("e4").index()));
        assert!(attackers.contains_square(sq("c4").index()));
        // Black pawn on d5 attacks c4 and e4
        assert!(board.is_attacked_by(sq("e4"), Side::Black));
        assert!(board.is_attacked_by(sq("c4"), Side::Black));
        assert!(!board.is_attacked_by(sq("d4"), Side::Black));
    }

    #[test]
    fn test_attacks_from_includes_friendly_squares() {
        let board = Board::new();
        let attacks = board.attacks_from(sq("b1"));
        assert_eq!(attacks.pop_count(), 3);
        assert!(attacks.contains_square(sq("d2").index()));
        assert!(board.attacks_from(sq("e4")).is_empty());
    }

    #[test]
    fn test_check_queries() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1");
        assert_eq!(board.king_square(Side::White), Some(sq("e1")));
        assert!(board.is_in_check(Side::White));
        assert!(!board.is_in_check(Side::Black));
    }

    #[test]
    fn test_fingerprint_ignores_side_and_rights() {
        let a = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b - - 12 40");
        let c = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K1R1 w Qkq - 0 1");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_display_contains_fen() {
        let board = Board::new();
        let shown = board.to_string();
        assert!(shown.contains(START_FEN));
        assert!(shown.contains("White to move"));
    }
}
