//! Simulated Annealing refinement of the multi-strategy layout.
//!
//! The search state is a unit order plus a rotation preference per unit.
//! Each state is decoded by re-running the guillotine packer and scored with
//! [`score_v2`]. The run starts from the multi-strategy winner and only
//! returns something else when it finds a strictly better score.
//!
//! # Neighborhood Operators
//!
//! - **Swap**: Exchange the positions of two units in the order
//! - **Rotation**: Flip the rotation preference of one grain-free unit

use crate::expand::UnitPart;
use crate::scoring::score_v2;
use crate::strategy::{best_of, run_packer};
use panelcut_core::clock::{Clock, SystemClock};
use panelcut_core::geometry::{validate_inputs, PartSpec, Rotation, StockSheetSpec};
use panelcut_core::result::{AnnealingStats, LayoutResult, StrategyUsed};
use panelcut_core::sa::{
    NeighborhoodOperator, PermutationSolution, SaConfig, SaHooks, SaProblem, SaProgress, SaRunner,
    SaSolution,
};
use panelcut_core::solver::{Algorithm, MoveOptions, PackOptions};
use panelcut_core::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

fn rotation_index(rotation: Rotation) -> usize {
    match rotation {
        Rotation::Deg0 => 0,
        Rotation::Deg90 => 1,
    }
}

fn rotation_of(index: usize) -> Rotation {
    if index % 2 == 1 {
        Rotation::Deg90
    } else {
        Rotation::Deg0
    }
}

/// SA problem definition for cutlist layouts.
pub struct CutlistAnnealProblem<'a> {
    parts: &'a [PartSpec],
    sheets: &'a [StockSheetSpec],
    /// Units in baseline order; solution sequences index into this.
    units: Vec<UnitPart>,
    /// Units whose rotation preference may be flipped.
    rotatable: Vec<usize>,
    options: PackOptions,
    swap_probability: f64,
    target_placed: usize,
    sheet_area: f64,
}

impl<'a> CutlistAnnealProblem<'a> {
    /// Creates a problem whose feasible states place exactly `target_placed` units.
    pub fn new(
        parts: &'a [PartSpec],
        sheets: &'a [StockSheetSpec],
        units: Vec<UnitPart>,
        options: PackOptions,
        moves: &MoveOptions,
        target_placed: usize,
    ) -> Self {
        let options = options.with_algorithm(Algorithm::Guillotine);
        let rotatable = if moves.allow_rotation {
            units
                .iter()
                .enumerate()
                .filter(|(_, u)| u.is_rotatable(options.allow_rotation))
                .map(|(i, _)| i)
                .collect()
        } else {
            Vec::new()
        };
        let sheet_area = sheets.first().map_or(0.0, StockSheetSpec::area);

        Self {
            parts,
            sheets,
            units,
            rotatable,
            options,
            swap_probability: moves.swap_probability,
            target_placed,
            sheet_area,
        }
    }

    /// Returns the total number of units.
    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    /// Returns true if no move can change the state.
    pub fn is_frozen(&self) -> bool {
        self.units.len() < 2 && self.rotatable.is_empty()
    }

    /// State equal to `baseline`: identity order, rotations as placed.
    pub fn initial_solution(&self, baseline: &LayoutResult) -> PermutationSolution {
        let placed: HashMap<(usize, usize), Rotation> = baseline
            .placements()
            .map(|(_, p)| ((p.part_index, p.instance), p.rotation))
            .collect();
        let rotations = self
            .units
            .iter()
            .map(|u| {
                placed
                    .get(&(u.part_index, u.instance))
                    .copied()
                    .map_or(0, rotation_index)
            })
            .collect();
        PermutationSolution::from_parts((0..self.units.len()).collect(), rotations, 2)
    }

    /// Decodes a solution into a layout using the guillotine packer.
    pub fn decode(&self, solution: &PermutationSolution) -> LayoutResult {
        let units: Vec<UnitPart> = solution
            .sequence
            .iter()
            .filter_map(|&i| {
                let mut unit = self.units.get(i)?.clone();
                if unit.is_rotatable(self.options.allow_rotation) {
                    let index = solution.rotations.get(i).copied().unwrap_or(0);
                    unit.preferred = Some(rotation_of(index));
                }
                Some(unit)
            })
            .collect();
        run_packer(&units, self.parts, self.sheets, &self.options)
    }
}

impl SaProblem for CutlistAnnealProblem<'_> {
    type Solution = PermutationSolution;

    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        operator: NeighborhoodOperator,
        rng: &mut R,
    ) -> Option<Self::Solution> {
        match operator {
            NeighborhoodOperator::Swap => solution.apply_swap(rng),
            NeighborhoodOperator::Rotation => solution.apply_rotation(&self.rotatable, rng),
        }
    }

    fn evaluate(&self, solution: &mut Self::Solution) {
        let result = self.decode(solution);
        // A state must keep the baseline's placed cardinality
        let fitness = if result.placed_count() == self.target_placed {
            score_v2(&result, self.sheet_area)
        } else {
            f64::NEG_INFINITY
        };
        solution.set_objective(fitness);
    }

    fn available_operators(&self) -> Vec<NeighborhoodOperator> {
        if self.rotatable.is_empty() {
            vec![NeighborhoodOperator::Swap]
        } else {
            vec![NeighborhoodOperator::Swap, NeighborhoodOperator::Rotation]
        }
    }

    fn choose_operator<R: Rng>(
        &self,
        operators: &[NeighborhoodOperator],
        rng: &mut R,
    ) -> NeighborhoodOperator {
        if operators.contains(&NeighborhoodOperator::Rotation)
            && rng.gen::<f64>() >= self.swap_probability
        {
            NeighborhoodOperator::Rotation
        } else {
            NeighborhoodOperator::Swap
        }
    }
}

/// Budgeted annealing over a single sheet type.
pub struct Annealer<'a, C: Clock = SystemClock> {
    parts: &'a [PartSpec],
    sheet: &'a StockSheetSpec,
    options: PackOptions,
    scheduling: SaConfig,
    moves: MoveOptions,
    clock: C,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl<'a> Annealer<'a, SystemClock> {
    /// Creates an annealer with default schedule and moves.
    pub fn new(parts: &'a [PartSpec], sheet: &'a StockSheetSpec) -> Self {
        Self {
            parts,
            sheet,
            options: PackOptions::default(),
            scheduling: SaConfig::default(),
            moves: MoveOptions::default(),
            clock: SystemClock::new(),
            cancel_flag: None,
        }
    }
}

impl<'a, C: Clock> Annealer<'a, C> {
    /// Sets the packing options (the algorithm is always guillotine).
    pub fn with_options(mut self, options: PackOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the temperature schedule.
    pub fn with_scheduling(mut self, scheduling: SaConfig) -> Self {
        self.scheduling = scheduling;
        self
    }

    /// Sets the move mix.
    pub fn with_moves(mut self, moves: MoveOptions) -> Self {
        self.moves = moves;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.scheduling.time_limit = Some(budget);
        self
    }

    /// Replaces the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Annealer<'a, C2> {
        Annealer {
            parts: self.parts,
            sheet: self.sheet,
            options: self.options,
            scheduling: self.scheduling,
            moves: self.moves,
            clock,
            cancel_flag: self.cancel_flag,
        }
    }

    /// Shares a cancellation flag with the caller.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Runs with a generator seeded from the move options.
    pub fn run_seeded(&self, hooks: SaHooks<'_>) -> Result<LayoutResult> {
        let mut rng = match self.moves.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run(&mut rng, hooks)
    }

    /// Runs the refinement with the given random source.
    pub fn run<R: Rng>(&self, rng: &mut R, hooks: SaHooks<'_>) -> Result<LayoutResult> {
        let sheets = std::slice::from_ref(self.sheet);
        validate_inputs(self.parts, sheets)?;
        self.scheduling.validate()?;

        let options = self.options.with_algorithm(Algorithm::Guillotine);
        let baseline = best_of(self.parts, sheets, &options);
        let baseline_score = score_v2(&baseline.result, self.sheet.area());
        let strategy = StrategyUsed::Annealed(baseline.strategy);

        let problem = CutlistAnnealProblem::new(
            self.parts,
            sheets,
            baseline.units,
            options,
            &self.moves,
            baseline.result.placed_count(),
        );
        if problem.is_frozen() {
            let mut result = baseline.result;
            result.strategy_used = Some(strategy);
            result.annealing = Some(AnnealingStats {
                baseline_score,
                best_score: baseline_score,
                ..AnnealingStats::default()
            });
            return Ok(result);
        }

        let initial = problem.initial_solution(&baseline.result);
        let mut runner =
            SaRunner::new(self.scheduling.clone(), problem).with_clock(&self.clock);
        if let Some(flag) = &self.cancel_flag {
            runner = runner.with_cancel_flag(flag.clone());
        }

        let sa = runner.run_from(initial, rng, hooks);
        let improved = sa.best.objective() > baseline_score;
        let best_score = if improved {
            sa.best.objective()
        } else {
            baseline_score
        };

        log::info!(
            "annealing: {} iterations, {} accepted, baseline={:.4}, best={:.4}{}",
            sa.iterations,
            sa.accepted,
            baseline_score,
            best_score,
            if sa.cancelled { " (cancelled)" } else { "" }
        );

        let mut result = if improved {
            runner.problem().decode(&sa.best)
        } else {
            baseline.result
        };
        result.strategy_used = Some(strategy);
        result.annealing = Some(AnnealingStats {
            iterations: sa.iterations,
            accepted: sa.accepted,
            improvements: sa.improvements,
            elapsed_ms: sa.elapsed.as_millis() as u64,
            baseline_score,
            best_score,
            cancelled: sa.cancelled,
        });
        Ok(result)
    }
}

/// Refines the multi-strategy layout within `time_budget_ms`.
///
/// Packs onto a single sheet type with default packing options; the move
/// options only decide which neighbours are generated. `on_progress` is called at the schedule's
/// progress interval; `should_cancel` is polled at iteration boundaries. An
/// exhausted budget or a cancellation returns the best layout found, never
/// worse than the multi-strategy baseline.
pub fn pack_annealed(
    parts: &[PartSpec],
    sheet: &StockSheetSpec,
    time_budget_ms: u64,
    scheduling: &SaConfig,
    moves: &MoveOptions,
    on_progress: Option<&mut dyn FnMut(&SaProgress)>,
    should_cancel: Option<&dyn Fn() -> bool>,
) -> Result<LayoutResult> {
    let mut hooks = SaHooks::none();
    if let Some(callback) = on_progress {
        hooks = hooks.with_progress(callback);
    }
    if let Some(predicate) = should_cancel {
        hooks = hooks.with_cancel(predicate);
    }

    Annealer::new(parts, sheet)
        .with_options(PackOptions::default())
        .with_scheduling(scheduling.clone())
        .with_moves(*moves)
        .with_time_budget(Duration::from_millis(time_budget_ms))
        .run_seeded(hooks)
}
