//! Simulated Annealing framework for budgeted optimization.
//!
//! The runner walks a single logical state through randomized neighbour moves
//! and accepts them with the Metropolis rule. Temperature is a function of
//! the consumed fraction of the budget, so the search cools on schedule no
//! matter how expensive a single evaluation is. The best state is tracked
//! separately from the current one; the run never returns anything worse
//! than its initial state.

use crate::clock::{Clock, SystemClock};
use crate::{Error, Result};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cooling schedule types for Simulated Annealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoolingSchedule {
    /// Geometric cooling: `T = T0 * (Tf / T0)^f`.
    #[default]
    Geometric,
    /// Linear cooling: `T = T0 + (Tf - T0) * f`.
    Linear,
}

/// Configuration for Simulated Annealing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Initial temperature.
    pub initial_temp: f64,
    /// Final (minimum) temperature, reached when the budget is spent.
    pub final_temp: f64,
    /// Cooling schedule type.
    pub cooling_schedule: CoolingSchedule,
    /// Wall-clock budget (None = iteration budget only).
    pub time_limit: Option<Duration>,
    /// Iteration budget (None = time budget only).
    pub max_iterations: Option<u64>,
    /// Poll the cancellation predicate every this many iterations.
    pub cancel_check_interval: u64,
    /// Minimum wall-clock spacing of progress reports.
    pub progress_interval: Duration,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp: 50.0,
            final_temp: 0.05,
            cooling_schedule: CoolingSchedule::Geometric,
            time_limit: Some(Duration::from_secs(2)),
            max_iterations: None,
            cancel_check_interval: 1,
            progress_interval: Duration::from_millis(250),
        }
    }
}

impl SaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp.max(0.001);
        self
    }

    /// Sets the final temperature.
    pub fn with_final_temp(mut self, temp: f64) -> Self {
        self.final_temp = temp.max(0.0001);
        self
    }

    /// Sets the cooling schedule.
    pub fn with_cooling_schedule(mut self, schedule: CoolingSchedule) -> Self {
        self.cooling_schedule = schedule;
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Removes the time limit.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }

    /// Sets the maximum iterations.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets how often cancellation is polled.
    pub fn with_cancel_check_interval(mut self, iterations: u64) -> Self {
        self.cancel_check_interval = iterations.max(1);
        self
    }

    /// Sets the progress reporting interval.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Checks that the schedule is usable and bounded.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temp.is_finite() && self.initial_temp > 0.0) {
            return Err(Error::ConfigError(format!(
                "initial temperature must be positive, got {}",
                self.initial_temp
            )));
        }
        if !(self.final_temp.is_finite() && self.final_temp > 0.0) {
            return Err(Error::ConfigError(format!(
                "final temperature must be positive, got {}",
                self.final_temp
            )));
        }
        if self.final_temp > self.initial_temp {
            return Err(Error::ConfigError(
                "final temperature exceeds initial temperature".to_string(),
            ));
        }
        if self.time_limit.is_none() && self.max_iterations.is_none() {
            return Err(Error::ConfigError(
                "annealing needs a time limit or an iteration limit".to_string(),
            ));
        }
        Ok(())
    }

    /// Temperature after consuming `fraction` (0..=1) of the budget.
    pub fn temperature_at(&self, fraction: f64) -> f64 {
        let f = fraction.clamp(0.0, 1.0);
        match self.cooling_schedule {
            CoolingSchedule::Geometric => {
                self.initial_temp * (self.final_temp / self.initial_temp).powf(f)
            }
            CoolingSchedule::Linear => {
                self.initial_temp + (self.final_temp - self.initial_temp) * f
            }
        }
    }

    /// Fraction of the budget consumed.
    fn budget_fraction(&self, elapsed: Duration, iteration: u64) -> f64 {
        let by_time = self
            .time_limit
            .filter(|limit| !limit.is_zero())
            .map_or(0.0, |limit| elapsed.as_secs_f64() / limit.as_secs_f64());
        let by_iter = self
            .max_iterations
            .filter(|&max| max > 0)
            .map_or(0.0, |max| iteration as f64 / max as f64);
        by_time.max(by_iter)
    }
}

/// Trait for solutions in Simulated Annealing.
pub trait SaSolution: Clone {
    /// Returns the objective value (fitness) of this solution.
    /// Higher values are better (maximization).
    fn objective(&self) -> f64;

    /// Sets the objective value.
    fn set_objective(&mut self, value: f64);
}

/// Neighborhood operator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborhoodOperator {
    /// Swap two elements.
    Swap,
    /// Change the orientation of one element.
    Rotation,
}

/// Trait for problem-specific SA operations.
pub trait SaProblem {
    /// The solution type for this problem.
    type Solution: SaSolution;

    /// Generates a neighbor solution using the specified operator.
    ///
    /// Returns `None` when the operator has no legal move for this solution.
    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        operator: NeighborhoodOperator,
        rng: &mut R,
    ) -> Option<Self::Solution>;

    /// Evaluates the objective of a solution.
    fn evaluate(&self, solution: &mut Self::Solution);

    /// Returns available neighborhood operators for this problem.
    fn available_operators(&self) -> Vec<NeighborhoodOperator> {
        vec![NeighborhoodOperator::Swap]
    }

    /// Picks the operator for the next move.
    fn choose_operator<R: Rng>(
        &self,
        operators: &[NeighborhoodOperator],
        rng: &mut R,
    ) -> NeighborhoodOperator {
        if operators.is_empty() {
            NeighborhoodOperator::Swap
        } else {
            operators[rng.gen_range(0..operators.len())]
        }
    }
}

/// Progress information during SA execution.
#[derive(Debug, Clone)]
pub struct SaProgress {
    /// Current temperature.
    pub temperature: f64,
    /// Current iteration number.
    pub iteration: u64,
    /// Best fitness so far.
    pub best_fitness: f64,
    /// Current fitness.
    pub current_fitness: f64,
    /// Fraction of moves accepted so far.
    pub acceptance_rate: f64,
    /// Elapsed time since start.
    pub elapsed: Duration,
    /// Whether the algorithm is still running.
    pub running: bool,
}

/// Caller hooks: progress reporting and cooperative cancellation.
#[derive(Default)]
pub struct SaHooks<'a> {
    on_progress: Option<&'a mut dyn FnMut(&SaProgress)>,
    should_cancel: Option<&'a dyn Fn() -> bool>,
}

impl<'a> SaHooks<'a> {
    /// No hooks.
    pub fn none() -> Self {
        Self::default()
    }

    /// Reports progress at the configured interval.
    pub fn with_progress(mut self, callback: &'a mut dyn FnMut(&SaProgress)) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Polls `predicate` at iteration boundaries; `true` stops the run.
    pub fn with_cancel(mut self, predicate: &'a dyn Fn() -> bool) -> Self {
        self.should_cancel = Some(predicate);
        self
    }

    fn report(&mut self, progress: &SaProgress) {
        if let Some(callback) = self.on_progress.as_deref_mut() {
            callback(progress);
        }
    }

    fn cancel_requested(&self) -> bool {
        self.should_cancel.map_or(false, |predicate| predicate())
    }
}

/// Result of a SA run.
#[derive(Debug, Clone)]
pub struct SaResult<S: SaSolution> {
    /// The best solution found.
    pub best: S,
    /// Temperature at termination.
    pub final_temperature: f64,
    /// Total iterations performed.
    pub iterations: u64,
    /// Accepted moves.
    pub accepted: u64,
    /// Improvements of the best solution.
    pub improvements: u64,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Whether the run stopped on cancellation.
    pub cancelled: bool,
    /// Best fitness sampled at every progress report.
    pub history: Vec<f64>,
}

/// Simulated Annealing runner.
pub struct SaRunner<P: SaProblem, C: Clock = SystemClock> {
    config: SaConfig,
    problem: P,
    clock: C,
    cancelled: Arc<AtomicBool>,
}

impl<P: SaProblem> SaRunner<P, SystemClock> {
    /// Creates a new SA runner on the system clock.
    pub fn new(config: SaConfig, problem: P) -> Self {
        Self {
            config,
            problem,
            clock: SystemClock::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<P: SaProblem, C: Clock> SaRunner<P, C> {
    /// Replaces the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SaRunner<P, C2> {
        SaRunner {
            config: self.config,
            problem: self.problem,
            clock,
            cancelled: self.cancelled,
        }
    }

    /// Shares an externally owned cancellation flag.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Returns a handle to cancel the algorithm.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Returns the problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Runs the search from `initial` until the budget is spent or
    /// cancellation is requested.
    pub fn run_from<R: Rng>(
        &self,
        initial: P::Solution,
        rng: &mut R,
        mut hooks: SaHooks<'_>,
    ) -> SaResult<P::Solution> {
        let start = self.clock.elapsed();
        let check_interval = self.config.cancel_check_interval.max(1);
        let operators = self.problem.available_operators();

        let mut current = initial;
        self.problem.evaluate(&mut current);
        let mut best = current.clone();

        let mut temperature = self.config.initial_temp;
        let mut iteration = 0u64;
        let mut accepted = 0u64;
        let mut improvements = 0u64;
        let mut cancelled = false;
        let mut history = vec![best.objective()];
        let mut last_report = Duration::ZERO;
        let mut elapsed;

        loop {
            elapsed = self.clock.elapsed().saturating_sub(start);

            if let Some(limit) = self.config.time_limit {
                if elapsed >= limit {
                    break;
                }
            }
            if let Some(max) = self.config.max_iterations {
                if iteration >= max {
                    break;
                }
            }
            if iteration % check_interval == 0
                && (self.cancelled.load(Ordering::Relaxed) || hooks.cancel_requested())
            {
                cancelled = true;
                break;
            }

            temperature = self
                .config
                .temperature_at(self.config.budget_fraction(elapsed, iteration));
            iteration += 1;

            let operator = self.problem.choose_operator(&operators, rng);
            if let Some(mut neighbor) = self.problem.neighbor(&current, operator, rng) {
                self.problem.evaluate(&mut neighbor);

                let current_obj = current.objective();
                let neighbor_obj = neighbor.objective();

                let accept = if neighbor_obj >= current_obj {
                    true
                } else if neighbor_obj.is_finite() {
                    // Metropolis rule: exp(-(current - neighbor) / T)
                    let probability = (-(current_obj - neighbor_obj) / temperature).exp();
                    rng.gen::<f64>() < probability
                } else {
                    false
                };

                if accept {
                    accepted += 1;
                    current = neighbor;
                    if current.objective() > best.objective() {
                        best = current.clone();
                        improvements += 1;
                    }
                }
            }

            if elapsed.saturating_sub(last_report) >= self.config.progress_interval {
                last_report = elapsed;
                history.push(best.objective());
                hooks.report(&SaProgress {
                    temperature,
                    iteration,
                    best_fitness: best.objective(),
                    current_fitness: current.objective(),
                    acceptance_rate: accepted as f64 / iteration as f64,
                    elapsed,
                    running: true,
                });
                log::debug!(
                    "SA iteration {}: temp={:.4}, best={:.4}, current={:.4}",
                    iteration,
                    temperature,
                    best.objective(),
                    current.objective()
                );
            }
        }

        history.push(best.objective());
        hooks.report(&SaProgress {
            temperature,
            iteration,
            best_fitness: best.objective(),
            current_fitness: current.objective(),
            acceptance_rate: if iteration > 0 {
                accepted as f64 / iteration as f64
            } else {
                0.0
            },
            elapsed,
            running: false,
        });

        SaResult {
            best,
            final_temperature: temperature,
            iterations: iteration,
            accepted,
            improvements,
            elapsed,
            cancelled,
            history,
        }
    }
}

/// Permutation-based solution for SA.
#[derive(Debug, Clone)]
pub struct PermutationSolution {
    /// The permutation (indices).
    pub sequence: Vec<usize>,
    /// Rotation option chosen per item (indexed by item, not by position).
    pub rotations: Vec<usize>,
    /// Number of rotation options per item.
    pub rotation_options: usize,
    /// Cached objective value.
    objective: f64,
}

impl PermutationSolution {
    /// Creates the identity permutation.
    pub fn new(size: usize, rotation_options: usize) -> Self {
        Self {
            sequence: (0..size).collect(),
            rotations: vec![0; size],
            rotation_options,
            objective: f64::NEG_INFINITY,
        }
    }

    /// Creates a solution from an explicit order and rotation choice.
    pub fn from_parts(sequence: Vec<usize>, rotations: Vec<usize>, rotation_options: usize) -> Self {
        Self {
            sequence,
            rotations,
            rotation_options,
            objective: f64::NEG_INFINITY,
        }
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Applies swap operator: swaps two distinct positions.
    ///
    /// Returns `None` for sequences shorter than two.
    pub fn apply_swap<R: Rng>(&self, rng: &mut R) -> Option<Self> {
        let n = self.sequence.len();
        if n < 2 {
            return None;
        }

        let i = rng.gen_range(0..n);
        let mut j = rng.gen_range(0..n - 1);
        if j >= i {
            j += 1;
        }

        let mut result = self.clone();
        result.sequence.swap(i, j);
        result.objective = f64::NEG_INFINITY;
        Some(result)
    }

    /// Applies rotation operator: advances the rotation of one of `candidates`.
    ///
    /// Returns `None` if there is nothing to rotate.
    pub fn apply_rotation<R: Rng>(&self, candidates: &[usize], rng: &mut R) -> Option<Self> {
        if candidates.is_empty() || self.rotation_options <= 1 {
            return None;
        }

        let item = candidates[rng.gen_range(0..candidates.len())];
        let mut result = self.clone();
        let slot = result.rotations.get_mut(item)?;
        *slot = (*slot + 1) % result.rotation_options;
        result.objective = f64::NEG_INFINITY;
        Some(result)
    }
}

impl SaSolution for PermutationSolution {
    fn objective(&self) -> f64 {
        self.objective
    }

    fn set_objective(&mut self, value: f64) {
        self.objective = value;
    }
}
