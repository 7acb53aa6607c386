use std::time::{Duration, Instant};

use super::*;

fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    board.generate_legal_moves(&mut moves);
    moves
}

mod engine_tests {
    use super::*;

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(SearchEngine::new(0, 1.0).is_err());
        assert!(SearchEngine::new(3, 0.0).is_err());
        assert!(SearchEngine::new(3, -2.0).is_err());
        assert!(SearchEngine::new(3, f64::NAN).is_err());
        assert!(SearchEngine::new(3, f64::INFINITY).is_err());

        let engine = SearchEngine::new(4, 2.5).unwrap();
        assert_eq!(engine.max_depth(), 4);
        assert_eq!(engine.time_limit(), Duration::from_millis(2500));
    }

    #[test]
    fn test_start_position_depth_3() {
        let mut engine = SearchEngine::new(3, 300.0).unwrap();
        let mut board = Board::new();
        let before = board.clone();

        let mv = engine.get_best_move(&mut board).expect("a move from the start position");
        assert!(legal_moves(&board).contains(&mv), "{mv} is not legal");
        assert_eq!(board, before);
        assert!(engine.history().is_empty());

        let stats = engine.last_stats();
        assert_eq!(stats.depth_reached, 3);
        assert!(stats.nodes_searched > 20);
        assert_eq!(engine.last_result().map(|r| r.depth), Some(3));
    }

    #[test]
    fn test_finds_mate_in_one() {
        let mut engine = SearchEngine::new(3, 300.0).unwrap();
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let mv = engine.get_best_move(&mut board).unwrap();
        assert_eq!(mv.uci(), "a1a8");
        let result = engine.last_result().unwrap();
        assert!(result.score.is_mate() && result.score.value() > 0.0);
    }

    #[test]
    fn test_black_finds_mate_in_one() {
        let mut engine = SearchEngine::new(2, 300.0).unwrap();
        let mut board = Board::from_fen("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1");
        assert_eq!(engine.get_best_move(&mut board).unwrap().uci(), "a8a1");
    }

    #[test]
    fn test_returned_moves_are_legal() {
        let fens = [
            KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ];
        for fen in fens {
            let mut engine = SearchEngine::new(2, 300.0).unwrap();
            let mut board = Board::from_fen(fen);
            let before = board.clone();
            let mv = engine.get_best_move(&mut board).expect(fen);
            assert!(legal_moves(&board).contains(&mv), "{mv} illegal in {fen}");
            assert_eq!(board, before, "{fen}");
            assert!(engine.history().is_empty(), "{fen}");
        }
    }

    #[test]
    fn test_game_over_gives_no_move() {
        let mut engine = SearchEngine::new(3, 10.0).unwrap();
        let mut mated =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(engine.get_best_move(&mut mated), None);
        assert_eq!(engine.last_stats().depth_reached, 0);

        let mut stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(engine.get_best_move(&mut stalemate), None);
    }

    #[test]
    fn test_tiny_budget_returns_quickly() {
        let mut engine = SearchEngine::new(8, 1e-6).unwrap();
        let mut board = Board::from_fen(KIWIPETE);
        let before = board.clone();

        let start = Instant::now();
        let mv = engine.get_best_move(&mut board);
        assert!(start.elapsed() < Duration::from_secs(10));

        if let Some(mv) = mv {
            assert!(legal_moves(&board).contains(&mv));
        }
        assert_eq!(board, before);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_cancelled_search_restores_state() {
        // Deep enough that the deadline always cuts into an iteration
        let mut engine = SearchEngine::new(12, 0.05).unwrap();
        let mut board = Board::from_fen(KIWIPETE);
        let before = board.clone();

        let _ = engine.get_best_move(&mut board);
        assert_eq!(board, before);
        assert!(engine.history().is_empty());
        assert!(engine.last_stats().depth_reached < 12);
    }

    #[test]
    fn test_custom_search_params() {
        let params = SearchParams {
            repetition_damping: 0.5,
            ..SearchParams::default()
        };
        let mut engine = SearchEngine::new(1, 300.0)
            .unwrap()
            .with_params(EvalParams::default())
            .with_search_params(params);
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        assert_eq!(engine.get_best_move(&mut board).unwrap().uci(), "a1a8");
    }

    #[test]
    fn test_winning_side_avoids_threefold() {
        // The a1 queen position is on the board for the second time after
        // the first cycle, so b1a1 at the end would repeat it a third time.
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1");
        for uci in ["e8d8", "a1a2", "d8e8", "a2a1", "e8f8", "a1b1", "f8e8"] {
            let mv = Move::from_uci(&board, uci).unwrap();
            board.make_move(mv).unwrap();
        }
        assert!(!board.is_game_over());
        assert!(Evaluator::new().evaluate(&board).value() > SearchParams::default().winning_threshold);

        let repeating = Move::from_uci(&board, "b1a1").unwrap();
        let mut repeated = board.clone();
        repeated.make_move(repeating).unwrap();
        assert_eq!(repeated.status(), GameStatus::ThreefoldRepetition);

        let mut engine = SearchEngine::new(2, 300.0).unwrap();
        let before = board.clone();
        let result = engine.search(&mut board).unwrap();
        let mv = result.best_move.unwrap();

        assert_ne!(mv, repeating);
        assert!(legal_moves(&board).contains(&mv));
        // Both the repetition and losing the queen would score zero
        assert!(result.score.value() > 0.0, "{} scores {}", mv, result.score);
        assert_eq!(board, before);
    }

    #[test]
    fn test_more_time_does_not_worsen_a_completed_depth() {
        let fen = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1";

        let mut quick = SearchEngine::new(2, 60.0).unwrap();
        let mut slow = SearchEngine::new(2, 120.0).unwrap();
        let quick_result = quick.search(&mut Board::from_fen(fen)).unwrap();
        let slow_result = slow.search(&mut Board::from_fen(fen)).unwrap();

        assert_eq!(quick_result.depth, 2);
        assert_eq!(slow_result.depth, 2);
        assert!(slow_result.score >= quick_result.score);
        assert_eq!(slow_result.best_move.map(|m| m.uci()), Some("e4d5".to_string()));
    }
}

mod alpha_beta_tests {
    use super::*;
    use crate::search::alpha_beta::Searcher;

    #[test]
    fn test_mirrored_positions_negate() {
        let mut engine = SearchEngine::new(2, 300.0).unwrap();
        let mut white =
            Board::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
        let mut black =
            Board::from_fen("rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3");

        let max = engine.alpha_beta(&mut white, 2, true).unwrap();
        let min = engine.alpha_beta(&mut black, 2, false).unwrap();

        let (a, b) = (max.score.value(), min.score.value());
        assert!((a + b).abs() <= 1e-6 * a.abs().max(1.0), "{a} vs {b}");
        assert!(max.best_move.is_some() && min.best_move.is_some());
    }

    #[test]
    fn test_leaf_damping() {
        let evaluator = Evaluator::new();
        let params = SearchParams::default();
        let mut searcher = Searcher::new(&evaluator, &params, None);
        let mut history = PositionHistory::new();

        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/QR2K3 w - - 0 1");
        let raw = evaluator.evaluate(&board);
        assert!(raw.value() > params.winning_threshold);

        let (fresh, mv) = searcher
            .alpha_beta(&mut board, &mut history, 0, f64::NEG_INFINITY, f64::INFINITY, true)
            .unwrap();
        assert_eq!(fresh, raw);
        assert_eq!(mv, None);

        history.increment(board.fingerprint());
        let (damped, _) = searcher
            .alpha_beta(&mut board, &mut history, 0, f64::NEG_INFINITY, f64::INFINITY, true)
            .unwrap();
        assert_eq!(damped, raw * params.repetition_damping);

        let (minimizing, _) = searcher
            .alpha_beta(&mut board, &mut history, 0, f64::NEG_INFINITY, f64::INFINITY, false)
            .unwrap();
        assert_eq!(minimizing, -(raw * params.repetition_damping));
        assert_eq!(searcher.stats.damped_leaves, 2);
    }

    #[test]
    fn test_level_positions_are_not_damped() {
        let evaluator = Evaluator::new();
        let params = SearchParams::default();
        let mut searcher = Searcher::new(&evaluator, &params, None);
        let mut history = PositionHistory::new();

        let mut board = Board::new();
        history.increment(board.fingerprint());
        let (score, _) = searcher
            .alpha_beta(&mut board, &mut history, 0, f64::NEG_INFINITY, f64::INFINITY, true)
            .unwrap();
        assert_eq!(score, evaluator.evaluate(&board));
        assert_eq!(searcher.stats.damped_leaves, 0);
    }

    #[test]
    fn test_history_balanced_after_search() {
        let evaluator = Evaluator::new();
        let params = SearchParams::default();
        let mut searcher = Searcher::new(&evaluator, &params, None);

        let mut history = PositionHistory::new();
        let outside = Board::from_fen(KIWIPETE).fingerprint();
        history.increment(outside);
        let snapshot = history.clone();

        let mut board = Board::new();
        searcher
            .alpha_beta(&mut board, &mut history, 2, f64::NEG_INFINITY, f64::INFINITY, true)
            .unwrap();
        assert_eq!(history, snapshot);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_expired_deadline_cancels_immediately() {
        let evaluator = Evaluator::new();
        let params = SearchParams::default();
        let mut searcher = Searcher::new(&evaluator, &params, Some(Instant::now()));
        let mut history = PositionHistory::new();
        let mut board = Board::new();

        let result = searcher.alpha_beta(
            &mut board,
            &mut history,
            3,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
        );
        assert_eq!(result, Err(alpha_beta::Cancelled));
        assert_eq!(searcher.stats.nodes_searched, 0);
        assert!(history.is_empty());
    }
}

mod scoped_move_tests {
    use super::*;

    #[test]
    fn test_scoped_move_takes_back_on_drop() {
        let mut board = Board::from_fen(KIWIPETE);
        let before = board.clone();
        let castle = Move::from_uci(&board, "e1g1").unwrap();
        {
            let mut played = ScopedMove::apply(&mut board, castle);
            assert_eq!(played.stm, Side::Black);
            // Nested guards unwind in order
            let reply = Move::from_uci(&played, "e8c8").unwrap();
            let nested = ScopedMove::apply(&mut played, reply);
            assert_eq!(nested.stm, Side::White);
        }
        assert_eq!(board, before);
    }
}
