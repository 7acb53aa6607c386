use crate::{precomputed::pawn_tables::PAWN_TABLES, prelude::*};

/// Chains, isolated pawns and doubled pawns, White positive.
pub fn eval_pawn_structure(board: &Board, params: &EvalParams) -> f64 {
    let mut score = 0.0;

    for side in Side::SIDES {
        let pawns = *board.positions.get_piece_bb(side, Piece::Pawn);
        let mut side_score = 0.0;
        let mut file_counts = [0u32; NUM_FILES];

        for sq in pawns.iter_bits() {
            let file = sq % 8;
            file_counts[file] += 1;

            // Chain: defended by friendly pawns from behind
            let supporters = PAWN_TABLES.pawn_support_masks[side.index()][sq] & pawns;
            side_score += supporters.pop_count() as f64 * params.pawn_chain_bonus;

            if (PAWN_TABLES.adjacent_files_masks[file] & pawns).is_empty() {
                side_score -= params.isolated_pawn_penalty;
            }
        }

        for count in file_counts.into_iter().filter(|&c| c > 1) {
            side_score -= (count - 1) as f64 * params.doubled_pawn_penalty;
        }

        score += side.sign() * side_score;
    }

    score
}

/// A pawn with no enemy pawn ahead of it on its own or an adjacent file.
pub fn is_passed_pawn(board: &Board, side: Side, sq: usize) -> bool {
    let enemy_pawns = *board.positions.get_piece_bb(side.flip(), Piece::Pawn);
    (PAWN_TABLES.passed_pawn_masks[side.index()][sq] & enemy_pawns).is_empty()
}

/// Passed pawns, worth more the further they have travelled.
pub fn eval_passed_pawns(board: &Board, params: &EvalParams) -> f64 {
    let mut score = 0.0;
    for side in Side::SIDES {
        for sq in board.positions.get_piece_bb(side, Piece::Pawn).iter_bits() {
            if !is_passed_pawn(board, side, sq) {
                continue;
            }
            let rank = sq / 8;
            let advancement = match side {
                Side::White => rank,
                Side::Black => 7 - rank,
            };
            let bonus = params.passed_pawn_base + advancement as f64 * params.passed_pawn_rank_bonus;
            score += side.sign() * bonus;
        }
    }
    score
}
