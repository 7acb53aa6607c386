use crate::{precomputed::pawn_tables::PAWN_TABLES, prelude::*};

/// Shield bonus minus attacker pressure minus open files, White positive.
pub fn eval_king_safety(board: &Board, params: &EvalParams) -> f64 {
    let mut score = 0.0;
    for side in Side::SIDES {
        let Some(king_sq) = board.king_square(side) else {
            continue;
        };
        let safety = pawn_shield(board, side, king_sq, params)
            - king_attackers(board, side, king_sq, params)
            - open_files_near_king(board, side, king_sq, params);
        score += side.sign() * safety;
    }
    score
}

/// Friendly pawns on the two ranks in front of the king, adjacent files
/// included. Pawns straight ahead count extra.
pub fn pawn_shield(board: &Board, side: Side, king_sq: Square, params: &EvalParams) -> f64 {
    let shield = PAWN_TABLES.king_shield_masks[side.index()][king_sq.index()]
        & *board.positions.get_piece_bb(side, Piece::Pawn);

    shield
        .iter_bits()
        .map(|sq| {
            if sq % 8 == king_sq.col() {
                params.pawn_shield_bonus + params.pawn_shield_front_bonus
            } else {
                params.pawn_shield_bonus
            }
        })
        .sum()
}

/// Scaled value of every enemy piece whose attacks reach the 3x3 zone
/// around the king. An enemy king in opposition counts at full value.
pub fn king_attackers(board: &Board, side: Side, king_sq: Square, params: &EvalParams) -> f64 {
    let zone = MOVE_TABLES.king_zones[king_sq.index()];
    let enemy = side.flip();
    let mut value = 0.0;

    for piece in Piece::all_pieces() {
        for sq in board.positions.get_piece_bb(enemy, piece).iter_bits() {
            let Some(square) = Square::new(sq) else {
                continue;
            };
            if (board.attacks_from(square) & zone).any() {
                value += params.piece_value(piece) * params.king_attacker_scale;
            }
        }
    }
    value
}

/// Penalty per file around the king without a friendly pawn, more if no
/// pawn at all stands on it.
pub fn open_files_near_king(
    board: &Board,
    side: Side,
    king_sq: Square,
    params: &EvalParams,
) -> f64 {
    let friendly_pawns = *board.positions.get_piece_bb(side, Piece::Pawn);
    let enemy_pawns = *board.positions.get_piece_bb(side.flip(), Piece::Pawn);
    let king_file = king_sq.col();

    let mut penalty = 0.0;
    for file in king_file.saturating_sub(1)..=(king_file + 1).min(7) {
        let file_mask = BitBoard(FILE_MASKS[file]);
        if (file_mask & friendly_pawns).any() {
            continue;
        }
        penalty += params.half_open_file_penalty;
        if (file_mask & enemy_pawns).is_empty() {
            penalty += params.open_file_extra_penalty;
        }
    }
    penalty
}

/// Weighted count of each side's pieces hitting the enemy king zone.
/// Several attackers together multiply the total. The king weighs nothing
/// but still counts as an attacker.
pub fn eval_king_attack(board: &Board, params: &EvalParams) -> f64 {
    let mut score = 0.0;
    for side in Side::SIDES {
        let Some(enemy_king) = board.king_square(side.flip()) else {
            continue;
        };
        let zone = MOVE_TABLES.king_zones[enemy_king.index()];

        let mut attack_value = 0.0;
        let mut attacker_count = 0u32;
        for piece in Piece::all_pieces() {
            for sq in board.positions.get_piece_bb(side, piece).iter_bits() {
                let Some(square) = Square::new(sq) else {
                    continue;
                };
                if (board.attacks_from(square) & zone).any() {
                    attacker_count += 1;
                    attack_value += params.king_attack_piece_weights[piece.index()];
                }
            }
        }

        if attacker_count > 1 {
            attack_value *= attacker_count as f64 * params.king_attack_multiplier;
        }
        score += side.sign() * attack_value;
    }
    score
}

/// `7 - distance to the central four squares` per king, White positive.
pub fn eval_king_centralization(board: &Board) -> f64 {
    Side::SIDES
        .iter()
        .filter_map(|&side| board.king_square(side).map(|sq| (side, sq)))
        .map(|(side, sq)| {
            let (file, rank) = (sq.col() as i32, sq.row() as i32);
            let file_distance = (file - 3).abs().min((file - 4).abs());
            let rank_distance = (rank - 3).abs().min((rank - 4).abs());
            side.sign() * (7 - (file_distance + rank_distance)) as f64
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    #[test]
    fn test_pawn_shield() {
        let params = EvalParams::default();
        // f2 g2 h2 in front of g1, plus g3 on the second rank
        let board = Board::from_fen("6k1/8/8/8/8/6P1/5PP1/6K1 w - - 0 1");
        let shield = pawn_shield(&board, Side::White, sq("g1"), &params);
        // f2 (10) + g2 (15) + g3 (15)
        assert_eq!(shield, 40.0);
        assert_eq!(pawn_shield(&board, Side::Black, sq("g8"), &params), 0.0);
    }

    #[test]
    fn test_open_files_near_king() {
        let params = EvalParams::default();
        // White king on g1: f has a white pawn, g only a black pawn, h is empty
        let board = Board::from_fen("6k1/6p1/8/8/8/8/5P2/6K1 w - - 0 1");
        let penalty = open_files_near_king(&board, Side::White, sq("g1"), &params);
        assert_eq!(penalty, 20.0 + 30.0);
        // King on the edge only looks at two files
        let board = Board::from_fen("6k1/8/8/8/8/8/8/K7 w - - 0 1");
        assert_eq!(open_files_near_king(&board, Side::White, sq("a1"), &params), 60.0);
    }

    #[test]
    fn test_king_attackers_counts_each_piece() {
        let params = EvalParams::default();
        // Rook on the g-file and knight on f3 both hit the zone of g1
        let board = Board::from_fen("6k1/6r1/8/8/8/5n2/8/6K1 w - - 0 1");
        let value = king_attackers(&board, Side::White, sq("g1"), &params);
        assert!((value - (50.0 + 32.0)).abs() < 1e-9);
    }

    #[test]
    fn test_king_attack_multiplier() {
        let params = EvalParams::default();
        let board = Board::from_fen("6k1/6r1/8/8/8/5n2/8/6K1 w - - 0 1");
        // (rook 5 + knight 3) * (2 * 1.5), against black
        assert_eq!(eval_king_attack(&board, &params), -24.0);
    }

    #[test]
    fn test_kings_in_opposition_count_as_attackers() {
        let params = EvalParams::default();
        // Kings on e4 and e6, the rook on d1 also reaches the black zone
        let board = Board::from_fen("8/8/4k3/8/4K3/8/8/3R4 w - - 0 1");
        assert!((king_attackers(&board, Side::White, sq("e4"), &params) - 2000.0).abs() < 1e-9);
        assert!((king_attackers(&board, Side::Black, sq("e6"), &params) - 2050.0).abs() < 1e-9);
        // White: (king 0 + rook 5) * (2 * 1.5). Black: the lone king weighs 0
        assert_eq!(eval_king_attack(&board, &params), 15.0);
    }

    #[test]
    fn test_king_centralization() {
        let board = Board::from_fen("7k/8/8/8/4K3/8/8/8 w - - 0 1");
        // e4: 7 - 0, h8: 7 - (3 + 3)
        assert_eq!(eval_king_centralization(&board), 7.0 - 1.0);
    }
}
