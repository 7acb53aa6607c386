use std::cell::OnceCell;

use crate::{evaluation::position::eval_piece_protection, prelude::*, search::ScopedMove};

/// Ranks legal moves so that alpha-beta looks at the promising ones first.
///
/// Every candidate is played on the board and taken back before the next
/// one is scored.
#[derive(Debug, Clone, Copy)]
pub struct MoveOrderer<'a> {
    evaluator: &'a Evaluator,
    params: &'a SearchParams,
}

impl<'a> MoveOrderer<'a> {
    pub fn new(evaluator: &'a Evaluator, params: &'a SearchParams) -> Self {
        Self { evaluator, params }
    }

    /// Sorts `moves` by descending score. Ties keep their input order.
    pub fn order(&self, board: &mut Board, moves: &mut [Move], history: &PositionHistory) {
        let mut scored: Vec<(Move, f64)> = moves
            .iter()
            .map(|&mv| (mv, self.score_move(board, mv, history)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (slot, (mv, _)) in moves.iter_mut().zip(scored) {
            *slot = mv;
        }
    }

    pub fn score_move(&self, board: &mut Board, mv: Move, history: &PositionHistory) -> f64 {
        let eval_params = self.evaluator.params();
        let mover = board.stm;
        let mut score = 0.0;

        // MVV-LVA, only for a piece standing on the destination
        if let Some((aggressor, _)) = board.get_piece_at(mv.from_sq())
            && let Some((victim, victim_side)) = board.get_piece_at(mv.to_sq())
            && victim_side != mover
        {
            score += self.params.victim_scale * eval_params.piece_value(victim)
                - eval_params.piece_value(aggressor);
        }

        if mv.is_promotion() {
            score += self.params.promotion_bonus;
        }

        let to = mv.to_sq();
        let center_distance = (3.5 - to.col() as f64).abs() + (3.5 - to.row() as f64).abs();
        score -= self.params.centralization_scale * center_distance;

        let after = ScopedMove::apply(board, mv);
        // Evaluated at most once, from the point of view of the side that moved
        let cached_eval = OnceCell::new();
        let mover_eval = || *cached_eval.get_or_init(|| -self.evaluator.evaluate(&after).value());

        let mut replies = Vec::with_capacity(MAX_MOVES);
        after.generate_legal_moves(&mut replies);
        let gives_check = after.is_in_check(after.stm);

        if gives_check && replies.is_empty() {
            score += self.params.mate_bonus;
        } else if gives_check {
            score += self.params.check_bonus;
            if mover_eval() > self.params.winning_threshold {
                score += self.params.winning_check_bonus;
            }
            if moved_piece_can_be_taken(to.index(), &replies) {
                score -= self.params.refuted_check_penalty;
            }
        }

        if history.contains(&after.fingerprint()) && mover_eval() > self.params.winning_threshold {
            score -= self.params.repetition_penalty;
        }

        score + eval_piece_protection(&after, eval_params)
    }
}

/// Whether any reply captures the piece that just moved to `landing`.
/// Only the moved piece is considered, even when the check is discovered
/// by another piece, and other ways of answering the check are ignored.
fn moved_piece_can_be_taken(landing: usize, replies: &[Move]) -> bool {
    replies.iter().filter(|r| r.is_capture()).any(|r| {
        let target = if r.is_enpassant() {
            r.from_idx() as usize / 8 * 8 + r.to_idx() as usize % 8
        } else {
            r.to_idx() as usize
        };
        target == landing
    })
}
