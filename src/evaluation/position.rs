use crate::{evaluation::material::eval_bishop_pair, prelude::*};

/// d4, e4, d5, e5
pub const CENTER: BitBoard = BitBoard(0x0000_0018_1800_0000);
/// c3 through f6, the four central squares included
pub const EXTENDED_CENTER: BitBoard = BitBoard(0x0000_3C3C_3C3C_0000);

/// Attacker difference and occupancy on a set of squares, White positive.
fn square_control(
    board: &Board,
    squares: BitBoard,
    attack_bonus: f64,
    pawn_bonus: f64,
    piece_bonus: f64,
) -> f64 {
    let mut score = 0.0;
    for sq in squares.iter_bits() {
        let Some(square) = Square::new(sq) else {
            continue;
        };
        let white = board.attackers_to(square, Side::White).pop_count() as f64;
        let black = board.attackers_to(square, Side::Black).pop_count() as f64;
        score += (white - black) * attack_bonus;

        if let Some((piece, side)) = board.get_piece_at(square) {
            let bonus = if piece == Piece::Pawn { pawn_bonus } else { piece_bonus };
            score += side.sign() * bonus;
        }
    }
    score
}

pub fn eval_center_control(board: &Board, params: &EvalParams) -> f64 {
    square_control(
        board,
        CENTER,
        params.center_attack_bonus,
        params.center_pawn_bonus,
        params.center_piece_bonus,
    ) + square_control(
        board,
        EXTENDED_CENTER,
        params.extended_center_attack_bonus,
        params.extended_center_pawn_bonus,
        params.extended_center_piece_bonus,
    )
}

/// Development of minor pieces (middlegame only), squares attacked, and a
/// bonus for every central square the piece's side reaches.
pub fn eval_piece_activity(board: &Board, params: &EvalParams, phase: Phase) -> f64 {
    // Per side, not per piece: every piece of a side gets the same reach bonus
    let center_reach = Side::SIDES.map(|side| {
        CENTER
            .iter_bits()
            .filter_map(Square::new)
            .filter(|&sq| board.is_attacked_by(sq, side))
            .count() as f64
            * params.center_reach_bonus
    });

    let mut score = 0.0;
    for (piece, side) in Piece::all() {
        for sq in board.positions.get_piece_bb(side, piece).iter_bits() {
            let Some(square) = Square::new(sq) else {
                continue;
            };
            let mut activity = 0.0;

            if phase == Phase::Middlegame && matches!(piece, Piece::Knight | Piece::Bishop) {
                let developed = match side {
                    Side::White => square.row() > 1,
                    Side::Black => square.row() < 6,
                };
                if developed {
                    activity += params.development_bonus;
                }
            }

            activity += board.attacks_from(square).pop_count() as f64 * params.attack_count_bonus;
            activity += center_reach[side.index()];

            score += side.sign() * activity;
        }
    }
    score
}

/// Two rooks sharing a rank, and rooks on files without any pawn. Only
/// counted for a side that still has at least two rooks.
pub fn eval_rook_coordination(board: &Board, params: &EvalParams) -> f64 {
    let all_pawns = *board.positions.get_piece_bb(Side::White, Piece::Pawn)
        | *board.positions.get_piece_bb(Side::Black, Piece::Pawn);

    let mut score = 0.0;
    for side in Side::SIDES {
        let rooks = *board.positions.get_piece_bb(side, Piece::Rook);
        if rooks.pop_count() < 2 {
            continue;
        }

        let shares_rank = RANK_MASKS
            .iter()
            .any(|&rank| (BitBoard(rank) & rooks).pop_count() >= 2);
        if shares_rank {
            score += side.sign() * params.rook_same_rank_bonus;
        }

        for sq in rooks.iter_bits() {
            if (BitBoard(FILE_MASKS[sq % 8]) & all_pawns).is_empty() {
                score += side.sign() * params.rook_open_file_bonus;
            }
        }
    }
    score
}

/// Defenders of every piece, counted with the current occupancy.
pub fn eval_piece_protection(board: &Board, params: &EvalParams) -> f64 {
    let mut score = 0.0;
    for side in Side::SIDES {
        for sq in board.positions.get_side_bb(side).iter_bits() {
            let Some(square) = Square::new(sq) else {
                continue;
            };
            let defenders = board.attackers_to(square, side).pop_count();
            score += side.sign() * defenders as f64 * params.protection_bonus;
        }
    }
    score
}

pub fn eval_piece_coordination(board: &Board, params: &EvalParams) -> f64 {
    eval_bishop_pair(board, params)
        + eval_rook_coordination(board, params)
        + eval_piece_protection(board, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_is_symmetric() {
        let params = EvalParams::default();
        let board = Board::new();
        assert_eq!(eval_center_control(&board, &params), 0.0);
        assert_eq!(eval_piece_activity(&board, &params, Phase::Middlegame), 0.0);
        assert_eq!(eval_piece_coordination(&board, &params), 0.0);
    }

    #[test]
    fn test_center_masks() {
        assert_eq!(CENTER.pop_count(), 4);
        assert_eq!(EXTENDED_CENTER.pop_count(), 16);
        assert_eq!(CENTER & EXTENDED_CENTER, CENTER);
        for s in ["d4", "e4", "d5", "e5"] {
            let sq = Square::from_str(s).unwrap().index();
            assert!(CENTER.contains_square(sq), "{s}");
        }
        for s in ["c3", "f3", "c6", "f6"] {
            let sq = Square::from_str(s).unwrap().index();
            assert!(EXTENDED_CENTER.contains_square(sq), "{s}");
        }
    }

    #[test]
    fn test_center_pawn() {
        let params = EvalParams::default();
        let board = Board::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        // Center: pawn on e4 (15) + d5 attacked (10)
        // Extended: pawn on e4 (7) + d5 and f5 attacked (5 each)
        assert_eq!(eval_center_control(&board, &params), 25.0 + 17.0);
    }

    #[test]
    fn test_piece_activity_development_only_in_middlegame() {
        let params = EvalParams::default();
        let board = Board::from_fen("4k3/8/8/8/8/2N5/8/4K3 w - - 0 1");
        // Knight: developed 10, 8 attacks * 2, reaches d5 and e4 (2 * 5)
        // White king: 5 attacks * 2 plus the same center reach
        // Black king: 5 attacks * 2
        assert_eq!(eval_piece_activity(&board, &params, Phase::Middlegame), 46.0);
        assert_eq!(eval_piece_activity(&board, &params, Phase::Endgame), 36.0);
    }

    #[test]
    fn test_rooks_and_protection() {
        let params = EvalParams::default();
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
        // Same rank 20, two pawnless files 30
        assert_eq!(eval_rook_coordination(&board, &params), 50.0);
        // King defended by both rooks
        assert_eq!(eval_piece_protection(&board, &params), 10.0);
        assert_eq!(eval_piece_coordination(&board, &params), 60.0);
    }

    #[test]
    fn test_single_rook_gets_nothing() {
        let params = EvalParams::default();
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert_eq!(eval_rook_coordination(&board, &params), 0.0);
    }
}
