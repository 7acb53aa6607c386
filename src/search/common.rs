use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::prelude::*;
use std::{fs, path::Path, time::Duration};

/// Tunables of the search and of move ordering. Loadable from TOML like
/// [`EvalParams`]; missing keys keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Mover-relative evaluation above which a position counts as won
    pub winning_threshold: f64,
    /// Factor applied to large leaf scores of positions already on the path
    pub repetition_damping: f64,

    // Move ordering
    pub mate_bonus: f64,
    pub check_bonus: f64,
    pub winning_check_bonus: f64,
    pub refuted_check_penalty: f64,
    pub victim_scale: f64,
    pub promotion_bonus: f64,
    pub centralization_scale: f64,
    pub repetition_penalty: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            winning_threshold: 500.0,
            repetition_damping: 0.8,
            mate_bonus: 10_000.0,
            check_bonus: 30.0,
            winning_check_bonus: 50.0,
            refuted_check_penalty: 100.0,
            victim_scale: 10.0,
            promotion_bonus: 800.0,
            centralization_scale: 10.0,
            repetition_penalty: 400.0,
        }
    }
}

impl SearchParams {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> miette::Result<()> {
        let path = path.as_ref();
        let toml_string = toml::to_string_pretty(self).into_diagnostic()?;
        fs::write(path, toml_string)
            .into_diagnostic()
            .with_context(|| format!("Writing search params to {}", path.display()))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> miette::Result<Self> {
        let path = path.as_ref();
        let file_content = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("Reading search params from {}", path.display()))?;
        toml::from_str(&file_content)
            .into_diagnostic()
            .with_context(|| format!("Parsing search params in {}", path.display()))
    }
}

/// Counters of a single `get_best_move` call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_searched: u64,
    pub leaf_nodes: u64,
    pub beta_cutoffs: u64,
    pub damped_leaves: u64,
    /// Deepest iteration that finished before the deadline
    pub depth_reached: u8,
    pub time_elapsed: Duration,
    pub nps: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn percent(numerator: u64, denominator: u64) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            100.0 * numerator as f64 / denominator as f64
        }
    }

    pub fn calculate_nps(&mut self) {
        let time_ms = self.time_elapsed.as_millis().max(1) as u64;
        self.nps = (self.nodes_searched * 1000) / time_ms;
    }

    pub fn log_summary(&self) {
        let _span = debug_span!("search_stats").entered();
        debug!("=> SEARCH STATISTICS (depth {})", self.depth_reached);
        debug!(
            "NODES total={} time={:?} nps={}",
            self.nodes_searched, self.time_elapsed, self.nps
        );
        debug!(
            "  - Leaves:           {:>9} ({:>6.2}%)",
            self.leaf_nodes,
            Self::percent(self.leaf_nodes, self.nodes_searched)
        );
        debug!(
            "  - Beta Cutoffs:     {:>9} ({:>6.2}%)",
            self.beta_cutoffs,
            Self::percent(self.beta_cutoffs, self.nodes_searched.saturating_sub(self.leaf_nodes))
        );
        debug!("  - Damped Leaves:    {:>9}", self.damped_leaves);
    }
}
