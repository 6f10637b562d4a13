//! Solver traits and configuration.

use crate::geometry::{PartSpec, StockSheetSpec};
use crate::result::LayoutResult;
use crate::sa::SaConfig;
use crate::Result;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placement heuristic used for a single packing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    /// Row/shelf placement, kept for comparison.
    Legacy,
    /// Free-rectangle guillotine placement.
    #[default]
    Guillotine,
}

/// Deterministic unit ordering applied before packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SortStrategy {
    /// Descending area.
    Area,
    /// Descending part length.
    Length,
    /// Descending part width.
    Width,
    /// Descending perimeter.
    Perimeter,
}

impl SortStrategy {
    /// Every strategy, in the order the multi-strategy optimizer tries them.
    pub const ALL: [SortStrategy; 4] = [
        SortStrategy::Area,
        SortStrategy::Length,
        SortStrategy::Width,
        SortStrategy::Perimeter,
    ];

    /// Sort key for a part of the given dimensions (larger sorts first).
    pub fn key(self, length: f64, width: f64) -> f64 {
        match self {
            SortStrategy::Area => length * width,
            SortStrategy::Length => length,
            SortStrategy::Width => width,
            SortStrategy::Perimeter => 2.0 * (length + width),
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortStrategy::Area => "area",
            SortStrategy::Length => "length",
            SortStrategy::Width => "width",
            SortStrategy::Perimeter => "perimeter",
        };
        f.write_str(name)
    }
}

/// Options recognized by every packing entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PackOptions {
    /// Allow 90° rotation of parts whose grain is `Any`.
    pub allow_rotation: bool,
    /// Placement heuristic.
    pub algorithm: Algorithm,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            allow_rotation: true,
            algorithm: Algorithm::Guillotine,
        }
    }
}

impl PackOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables rotation.
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Sets the placement heuristic.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Mix of local moves used by the annealing optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MoveOptions {
    /// Probability that a move swaps two units rather than flipping a rotation.
    pub swap_probability: f64,
    /// Allow rotation flips of grain-free units.
    pub allow_rotation: bool,
    /// Seed for the pseudo-random source; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            swap_probability: 0.7,
            allow_rotation: true,
            seed: None,
        }
    }
}

impl MoveOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the swap probability.
    pub fn with_swap_probability(mut self, p: f64) -> Self {
        self.swap_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables rotation flips.
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Optimization strategy for [`Solver`] implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Pack in the caller's order.
    InputOrder,
    /// Pack after one deterministic sort.
    Sorted(SortStrategy),
    /// Best of every sort order.
    #[default]
    MultiStrategy,
    /// Multi-strategy baseline refined by simulated annealing.
    SimulatedAnnealing,
}

/// Common configuration for solvers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Optimization strategy.
    pub strategy: Strategy,

    /// Rotation and placement heuristic.
    pub options: PackOptions,

    /// Annealing time budget in milliseconds.
    pub time_limit_ms: u64,

    /// Annealing temperature schedule.
    pub scheduling: SaConfig,

    /// Annealing move mix.
    pub moves: MoveOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            options: PackOptions::default(),
            time_limit_ms: 2000,
            scheduling: SaConfig::default(),
            moves: MoveOptions::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the optimization strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the packing options.
    pub fn with_options(mut self, options: PackOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the annealing time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the annealing schedule.
    pub fn with_scheduling(mut self, scheduling: SaConfig) -> Self {
        self.scheduling = scheduling;
        self
    }

    /// Sets the annealing move mix.
    pub fn with_moves(mut self, moves: MoveOptions) -> Self {
        self.moves = moves;
        self
    }

    /// Fixes the annealing seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.moves.seed = Some(seed);
        self
    }
}

/// Progress callback for long-running operations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during solving.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Iterations completed so far.
    pub iteration: u64,
    /// Best score so far.
    pub best_score: f64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the solver is still running.
    pub running: bool,
}

/// Trait for cutlist solvers.
pub trait Solver {
    /// Solves the packing problem.
    fn solve(&self, parts: &[PartSpec], sheets: &[StockSheetSpec]) -> Result<LayoutResult>;

    /// Solves with a progress callback.
    fn solve_with_progress(
        &self,
        parts: &[PartSpec],
        sheets: &[StockSheetSpec],
        callback: ProgressCallback,
    ) -> Result<LayoutResult>;

    /// Cancels an ongoing solve operation.
    fn cancel(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_keys() {
        assert_eq!(SortStrategy::Area.key(1000.0, 500.0), 500_000.0);
        assert_eq!(SortStrategy::Length.key(1000.0, 500.0), 1000.0);
        assert_eq!(SortStrategy::Width.key(1000.0, 500.0), 500.0);
        assert_eq!(SortStrategy::Perimeter.key(1000.0, 500.0), 3000.0);
    }

    #[test]
    fn test_config_builders() {
        let config = Config::new()
            .with_strategy(Strategy::Sorted(SortStrategy::Width))
            .with_options(PackOptions::new().with_algorithm(Algorithm::Legacy))
            .with_time_limit(500)
            .with_seed(7);

        assert_eq!(config.strategy, Strategy::Sorted(SortStrategy::Width));
        assert_eq!(config.options.algorithm, Algorithm::Legacy);
        assert!(config.options.allow_rotation);
        assert_eq!(config.time_limit_ms, 500);
        assert_eq!(config.moves.seed, Some(7));
    }

    #[test]
    fn test_move_options_clamp() {
        let moves = MoveOptions::new().with_swap_probability(1.5);
        assert_eq!(moves.swap_probability, 1.0);
    }
}
