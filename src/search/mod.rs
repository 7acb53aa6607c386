use std::{
    ops::{Deref, DerefMut},
    time::{Duration, Instant},
};

use tracing::trace_span;

use crate::prelude::*;

pub mod alpha_beta;
pub mod common;
pub mod history;
pub mod move_ordering;

#[cfg(test)]
mod tests;

use alpha_beta::{Cancelled, Searcher};

/// A move played on a borrowed board for as long as the guard lives.
/// Dropping the guard takes the move back, whichever way the scope is left.
pub struct ScopedMove<'a> {
    board: &'a mut Board,
    info: MoveInfo,
}

impl<'a> ScopedMove<'a> {
    /// Panics if `mv` cannot be applied: callers only pass moves produced by
    /// the legal move generator for this exact position.
    pub fn apply(board: &'a mut Board, mv: Move) -> Self {
        let info = match board.make_move(mv) {
            Ok(info) => info,
            Err(e) => panic!("Generated move {mv} failed to apply on {}: {e:?}", board.to_fen()),
        };
        Self { board, info }
    }
}

impl Deref for ScopedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for ScopedMove<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.board.unmake_move(&self.info) {
            panic!("Failed to take back {}: {e:?}", self.info.mv);
        }
    }
}

/// Outcome of one full-width iteration.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// From the point of view of the side to move at the root
    pub score: Score,
    pub best_move: Option<Move>,
    /// Depth of the iteration that produced this result
    pub depth: u8,
}

/// Iterative-deepening alpha-beta move selector with a wall-clock budget.
#[derive(Debug)]
pub struct SearchEngine {
    max_depth: u8,
    time_limit: Duration,
    evaluator: Evaluator,
    params: SearchParams,
    history: PositionHistory,
    stats: SearchStats,
    last_result: Option<SearchResult>,
}

impl SearchEngine {
    pub fn new(max_depth: u8, time_limit_secs: f64) -> miette::Result<Self> {
        miette::ensure!(max_depth >= 1, "Search depth must be at least 1");
        miette::ensure!(
            time_limit_secs.is_finite() && time_limit_secs > 0.0,
            "Time limit must be a positive number of seconds, got {time_limit_secs}"
        );
        let time_limit = Duration::try_from_secs_f64(time_limit_secs)
            .into_diagnostic()
            .context("Invalid time limit")?;

        Ok(Self {
            max_depth,
            time_limit,
            evaluator: Evaluator::new(),
            params: SearchParams::default(),
            history: PositionHistory::new(),
            stats: SearchStats::new(),
            last_result: None,
        })
    }

    pub fn with_params(mut self, params: EvalParams) -> Self {
        self.evaluator = Evaluator::with_params(params);
        self
    }

    pub fn with_search_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Visit counts left over from the last search. Empty unless a frame
    /// failed to clean up after itself.
    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    pub fn last_result(&self) -> Option<SearchResult> {
        self.last_result
    }

    /// Best move for the side to move, or `None` if the game is already over
    /// or not even depth 1 finished in time. `board` is handed back exactly
    /// as it came in.
    pub fn get_best_move(&mut self, board: &mut Board) -> Option<Move> {
        self.search(board).and_then(|result| result.best_move)
    }

    /// Same as [`SearchEngine::get_best_move`] but keeps the score and the
    /// depth of the last completed iteration.
    pub fn search(&mut self, board: &mut Board) -> Option<SearchResult> {
        let span = trace_span!("search_root");
        let _guard = span.enter();

        let start = Instant::now();
        let deadline = start.checked_add(self.time_limit);
        self.history.reset();
        self.last_result = None;

        debug!(
            "Finding best move for '{}' with max_depth: {}, time limit: {:?}",
            board.to_fen(),
            self.max_depth,
            self.time_limit
        );

        if board.is_game_over() {
            debug!("Game is over: {}", board.status());
            self.stats = SearchStats::new();
            return None;
        }

        let mut searcher = Searcher::new(&self.evaluator, &self.params, deadline);
        let mut best = None;

        for depth in 1..=self.max_depth {
            if searcher.deadline_passed() {
                break;
            }
            match searcher.alpha_beta(
                board,
                &mut self.history,
                depth,
                f64::NEG_INFINITY,
                f64::INFINITY,
                true,
            ) {
                Ok((score, Some(mv))) => {
                    debug!("Depth {depth} done: {mv} ({score})");
                    searcher.stats.depth_reached = depth;
                    best = Some(SearchResult {
                        score,
                        best_move: Some(mv),
                        depth,
                    });
                }
                Ok((_, None)) => break,
                Err(Cancelled) => {
                    debug!("Depth {depth} cancelled, keeping depth {}", searcher.stats.depth_reached);
                    break;
                }
            }
        }

        let mut stats = searcher.stats;
        stats.time_elapsed = start.elapsed();
        stats.calculate_nps();
        stats.log_summary();
        self.stats = stats;

        info!(
            "move found in {:?} at depth {}",
            stats.time_elapsed, stats.depth_reached
        );
        self.last_result = best;
        best
    }

    /// A single full-width alpha-beta run at `depth`, outside of iterative
    /// deepening. `None` if the time budget ran out first.
    pub fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: u8,
        maximizing: bool,
    ) -> Option<SearchResult> {
        self.history.reset();
        let deadline = Instant::now().checked_add(self.time_limit);
        let mut searcher = Searcher::new(&self.evaluator, &self.params, deadline);

        let result = searcher.alpha_beta(
            board,
            &mut self.history,
            depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            maximizing,
        );
        self.stats = searcher.stats;

        result.ok().map(|(score, best_move)| SearchResult {
            score,
            best_move,
            depth,
        })
    }
}
