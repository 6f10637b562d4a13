//! Cutlist solver implementing the [`Solver`] trait.

use crate::anneal::Annealer;
use crate::scoring::score_v2;
use crate::strategy::{pack_optimized, pack_sorted, reference_sheet_area};
use panelcut_core::geometry::{validate_inputs, PartSpec, StockSheetSpec};
use panelcut_core::result::LayoutResult;
use panelcut_core::sa::{SaHooks, SaProgress};
use panelcut_core::solver::{Config, ProgressCallback, ProgressInfo, Solver, Strategy};
use panelcut_core::{Error, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cutlist solver.
pub struct CutlistSolver {
    config: Config,
    cancelled: Arc<AtomicBool>,
}

impl CutlistSolver {
    /// Creates a new solver with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a solver with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Annealing over the first sheet type with stock.
    fn simulated_annealing(
        &self,
        parts: &[PartSpec],
        sheets: &[StockSheetSpec],
        hooks: SaHooks<'_>,
    ) -> Result<LayoutResult> {
        validate_inputs(parts, sheets)?;
        let sheet = sheets
            .iter()
            .find(|s| s.is_available())
            .ok_or(Error::NoUsableSheet)?;
        if sheets.len() > 1 {
            log::debug!("annealing packs onto sheet type '{}' only", sheet.id);
        }

        Annealer::new(parts, sheet)
            .with_options(self.config.options)
            .with_scheduling(self.config.scheduling.clone())
            .with_moves(self.config.moves)
            .with_time_budget(Duration::from_millis(self.config.time_limit_ms))
            .with_cancel_flag(self.cancelled.clone())
            .run_seeded(hooks)
    }

    fn run(
        &self,
        parts: &[PartSpec],
        sheets: &[StockSheetSpec],
        hooks: SaHooks<'_>,
    ) -> Result<LayoutResult> {
        // Reset cancellation flag
        self.cancelled.store(false, Ordering::Relaxed);

        match self.config.strategy {
            Strategy::InputOrder => crate::pack(parts, sheets, &self.config.options),
            Strategy::Sorted(sort) => pack_sorted(parts, sheets, &self.config.options, sort),
            Strategy::MultiStrategy => pack_optimized(parts, sheets, &self.config.options),
            Strategy::SimulatedAnnealing => self.simulated_annealing(parts, sheets, hooks),
        }
    }
}

impl Solver for CutlistSolver {
    fn solve(&self, parts: &[PartSpec], sheets: &[StockSheetSpec]) -> Result<LayoutResult> {
        self.run(parts, sheets, SaHooks::none())
    }

    fn solve_with_progress(
        &self,
        parts: &[PartSpec],
        sheets: &[StockSheetSpec],
        callback: ProgressCallback,
    ) -> Result<LayoutResult> {
        let mut forward = |p: &SaProgress| {
            callback(ProgressInfo {
                iteration: p.iteration,
                best_score: p.best_fitness,
                elapsed_ms: p.elapsed.as_millis() as u64,
                running: p.running,
            })
        };
        let result = self.run(parts, sheets, SaHooks::none().with_progress(&mut forward))?;

        // Deterministic strategies report once, when done
        if self.config.strategy != Strategy::SimulatedAnnealing {
            callback(ProgressInfo {
                iteration: 0,
                best_score: score_v2(&result, reference_sheet_area(sheets)),
                elapsed_ms: 0,
                running: false,
            });
        }
        Ok(result)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
