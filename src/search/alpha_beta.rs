//! Depth-limited minimax with alpha-beta pruning.
//!
//! Scores are kept in the frame of the side to move at the root: maximizing
//! nodes belong to that side, minimizing nodes to its opponent. Every
//! recursive call polls the deadline on entry and unwinds with [`Cancelled`]
//! once it has passed.

use std::time::Instant;

use crate::{
    prelude::*,
    search::{ScopedMove, move_ordering::MoveOrderer},
};

/// The deadline passed before the current call could finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// A child position entered from the search path: the move is on the board
/// and its fingerprint is counted in the history. Dropping it reverses both,
/// history first, then the move.
struct Descent<'a> {
    fingerprint: PositionFingerprint,
    history: &'a mut PositionHistory,
    board: ScopedMove<'a>,
}

impl<'a> Descent<'a> {
    fn enter(board: &'a mut Board, history: &'a mut PositionHistory, mv: Move) -> Self {
        let board = ScopedMove::apply(board, mv);
        let fingerprint = board.fingerprint();
        history.increment(fingerprint);
        Self {
            fingerprint,
            history,
            board,
        }
    }
}

impl Drop for Descent<'_> {
    fn drop(&mut self) {
        self.history.decrement(self.fingerprint);
    }
}

/// State of one search invocation
pub(crate) struct Searcher<'a> {
    evaluator: &'a Evaluator,
    params: &'a SearchParams,
    /// `None` when the budget is too large to be represented
    deadline: Option<Instant>,
    pub(crate) stats: SearchStats,
}

impl<'a> Searcher<'a> {
    pub(crate) fn new(
        evaluator: &'a Evaluator,
        params: &'a SearchParams,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            evaluator,
            params,
            deadline,
            stats: SearchStats::new(),
        }
    }

    #[inline(always)]
    pub(crate) fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Static score of a leaf in the root frame, damped if the position is
    /// already on the path and clearly decided.
    fn leaf_score(&mut self, board: &Board, history: &PositionHistory, maximizing: bool) -> Score {
        self.stats.leaf_nodes += 1;
        let mut score = self.evaluator.evaluate(board);

        if history.count(&board.fingerprint()) > 0
            && score.abs().value() > self.params.winning_threshold
        {
            self.stats.damped_leaves += 1;
            score = score * self.params.repetition_damping;
        }

        if maximizing { score } else { -score }
    }

    pub(crate) fn alpha_beta(
        &mut self,
        board: &mut Board,
        history: &mut PositionHistory,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> Result<(Score, Option<Move>), Cancelled> {
        if self.deadline_passed() {
            return Err(Cancelled);
        }
        self.stats.nodes_searched += 1;

        if depth == 0 {
            return Ok((self.leaf_score(board, history, maximizing), None));
        }

        let mut moves = Vec::with_capacity(MAX_MOVES);
        board.generate_legal_moves(&mut moves);
        if board.status_with_moves(&moves).is_over() {
            return Ok((self.leaf_score(board, history, maximizing), None));
        }

        MoveOrderer::new(self.evaluator, self.params).order(board, &mut moves, history);

        let mut best_value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = None;

        for mv in moves {
            let value = {
                let mut child = Descent::enter(board, history, mv);
                let (score, _) = self.alpha_beta(
                    &mut child.board,
                    &mut *child.history,
                    depth - 1,
                    alpha,
                    beta,
                    !maximizing,
                )?;
                score.value()
            };

            if maximizing {
                if value > best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                alpha = alpha.max(value);
            } else {
                if value < best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                beta = beta.min(value);
            }

            if beta <= alpha {
                self.stats.beta_cutoffs += 1;
                break;
            }
        }

        Ok((Score(best_value), best_move))
    }
}
