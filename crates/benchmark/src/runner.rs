//! Benchmark runner for cutlist jobs.

use crate::dataset::Job;
use crate::result::{BenchmarkResult, RunResult};
use panelcut_core::{Error, LayoutResult, LayoutSummary, Result};
use panelcut_packer::strategy::reference_sheet_area;
use panelcut_packer::{
    pack, pack_annealed, pack_optimized, score_v2, verify_layout, Algorithm, MoveOptions,
    PackOptions, SaConfig,
};
use std::fmt;
use std::time::Instant;

/// A packing method under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Shelf packer in input order.
    Legacy,
    /// Guillotine packer in input order.
    Guillotine,
    /// Multi-strategy optimizer.
    Optimized,
    /// Annealing refinement over the first available sheet type.
    Annealed,
}

impl Method {
    /// All methods.
    pub const ALL: [Method; 4] = [
        Method::Legacy,
        Method::Guillotine,
        Method::Optimized,
        Method::Annealed,
    ];
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Legacy => write!(f, "legacy"),
            Method::Guillotine => write!(f, "guillotine"),
            Method::Optimized => write!(f, "optimized"),
            Method::Annealed => write!(f, "annealed"),
        }
    }
}

/// Configuration for benchmark runs.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Methods to benchmark.
    pub methods: Vec<Method>,
    /// Annealing budget per run in milliseconds.
    pub time_limit_ms: u64,
    /// Number of runs per configuration.
    pub runs_per_config: usize,
    /// Base seed; run `n` anneals with `seed + n`.
    pub seed: u64,
    /// Whether to show progress.
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            methods: Method::ALL.to_vec(),
            time_limit_ms: 2_000,
            runs_per_config: 1,
            seed: 42,
            show_progress: true,
        }
    }
}

impl BenchmarkConfig {
    /// Creates a new benchmark configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the methods to benchmark.
    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    /// Sets the annealing budget per run.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the number of runs per configuration.
    pub fn with_runs_per_config(mut self, n: usize) -> Self {
        self.runs_per_config = n;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Silences per-run output.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Quick preset: deterministic methods only.
    pub fn quick() -> Self {
        Self {
            methods: vec![Method::Legacy, Method::Guillotine, Method::Optimized],
            ..Self::default()
        }
    }

    /// Standard preset: every method, three annealing seeds.
    pub fn standard() -> Self {
        Self {
            time_limit_ms: 5_000,
            runs_per_config: 3,
            ..Self::default()
        }
    }
}

/// Benchmark runner.
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    /// Creates a new benchmark runner.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    /// Runs every configured method on one job.
    pub fn run_job(&self, job: &Job) -> BenchmarkResult {
        let mut results = BenchmarkResult::new();
        let info = job.info();

        if self.config.show_progress {
            println!("\nBenchmarking job: {}", job.name);
            println!("  Part types: {}", info.part_types);
            println!("  Total units: {}", info.total_units);
            println!("  Sheet types: {}", info.sheet_types);
        }

        for &method in &self.config.methods {
            // Deterministic methods give the same layout every run
            let runs = if method == Method::Annealed {
                self.config.runs_per_config.max(1)
            } else {
                1
            };

            for run_idx in 0..runs {
                let result = self.run_single(job, method, run_idx);
                if self.config.show_progress {
                    println!(
                        "  {:<11} run {}: sheets={}, placed={}/{}, yield={:.1}%, time={}ms{}",
                        method,
                        run_idx + 1,
                        result.sheets_used,
                        result.units_placed,
                        result.total_units,
                        result.yield_ratio * 100.0,
                        result.time_ms,
                        result
                            .error
                            .as_ref()
                            .map_or(String::new(), |e| format!(" ({})", e))
                    );
                }
                results.add_run(result);
            }
        }

        results
    }

    /// Runs benchmarks on multiple jobs.
    pub fn run_jobs(&self, jobs: &[Job]) -> BenchmarkResult {
        let mut combined = BenchmarkResult::new();
        for job in jobs {
            combined.merge(self.run_job(job));
        }
        combined
    }

    /// Runs one method once and verifies the layout.
    pub fn run_single(&self, job: &Job, method: Method, run_idx: usize) -> RunResult {
        let total_units = job.info().total_units;
        let method_name = method.to_string();

        let start = Instant::now();
        let outcome = self.pack_with(job, method, run_idx);
        let elapsed = start.elapsed().as_millis() as u64;

        let layout = match outcome {
            Ok(layout) => layout,
            Err(e) => {
                log::warn!("{} on {} failed: {}", method, job.name, e);
                return RunResult::failed(&job.name, &method_name, run_idx + 1, total_units, e.to_string());
            }
        };

        let verification = verify_layout(&layout, &job.parts);
        let summary = LayoutSummary::from(&layout);
        RunResult {
            job: job.name.clone(),
            method: method_name,
            run: run_idx + 1,
            sheets_used: summary.sheets_used,
            units_placed: summary.total_placed,
            total_units,
            yield_ratio: layout.stats.yield_ratio,
            waste_area: summary.waste_area,
            largest_offcut_area: layout.stats.largest_offcut_area,
            score: score_v2(&layout, reference_sheet_area(&job.sheets)),
            cut_count: layout.stats.cut_count,
            time_ms: elapsed,
            iterations: layout.annealing.as_ref().map(|a| a.iterations),
            strategy: summary.strategy,
            rotated_units: layout.placement_stats().rotated_count,
            verified: verification.is_ok(),
            error: verification.err().map(|e| e.to_string()),
        }
    }

    fn pack_with(&self, job: &Job, method: Method, run_idx: usize) -> Result<LayoutResult> {
        match method {
            Method::Legacy => pack(
                &job.parts,
                &job.sheets,
                &PackOptions::default().with_algorithm(Algorithm::Legacy),
            ),
            Method::Guillotine => pack(&job.parts, &job.sheets, &PackOptions::default()),
            Method::Optimized => pack_optimized(&job.parts, &job.sheets, &PackOptions::default()),
            Method::Annealed => {
                let sheet = job
                    .sheets
                    .iter()
                    .find(|s| s.is_available())
                    .ok_or(Error::NoUsableSheet)?;
                let moves = MoveOptions::default().with_seed(self.config.seed + run_idx as u64);
                pack_annealed(
                    &job.parts,
                    sheet,
                    self.config.time_limit_ms,
                    &SaConfig::default(),
                    &moves,
                    None,
                    None,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_every_method() {
        let job = Job::builtin("cabinet").unwrap();
        let config = BenchmarkConfig::new()
            .with_time_limit(50)
            .with_runs_per_config(2)
            .quiet();
        let results = BenchmarkRunner::new(config).run_job(&job);

        // One run per deterministic method, two annealing runs
        assert_eq!(results.runs.len(), 5);
        assert!(results.runs.iter().all(|r| r.verified));
        assert!(results.runs.iter().all(|r| r.all_placed()));
        assert_eq!(
            results.runs.iter().filter(|r| r.iterations.is_some()).count(),
            2
        );
    }

    #[test]
    fn test_annealed_at_least_as_good_as_optimized() {
        let job = Job::builtin("tall-strip").unwrap();
        let config = BenchmarkConfig::new()
            .with_methods(vec![Method::Optimized, Method::Annealed])
            .with_time_limit(100)
            .quiet();
        let results = BenchmarkRunner::new(config).run_job(&job);

        assert!(results.runs[1].score >= results.runs[0].score);
    }

    #[test]
    fn test_records_strategy_and_rotations() {
        // Only fits the sheet when turned 90°
        let job = Job::new(
            "narrow",
            vec![panelcut_core::PartSpec::new("SLAT", 900.0, 200.0).with_quantity(2)],
            vec![panelcut_core::StockSheetSpec::new("S", 500.0, 1000.0)],
        );
        let config = BenchmarkConfig::new()
            .with_methods(vec![Method::Guillotine, Method::Optimized])
            .quiet();
        let results = BenchmarkRunner::new(config).run_job(&job);

        assert_eq!(results.runs[0].strategy, "input-order");
        assert!(results.runs[1].strategy.starts_with("best-of:"));
        assert!(results.runs.iter().all(|r| r.rotated_units == 2));
        assert!(results.runs.iter().all(|r| r.all_placed()));
    }

    #[test]
    fn test_invalid_job_is_recorded_not_panicking() {
        let job = Job::new(
            "broken",
            vec![panelcut_core::PartSpec::new("BAD", 0.0, 100.0)],
            vec![panelcut_core::StockSheetSpec::new("S", 1000.0, 1000.0)],
        );
        let config = BenchmarkConfig::quick().quiet();
        let results = BenchmarkRunner::new(config).run_job(&job);

        assert_eq!(results.runs.len(), 3);
        assert!(results.runs.iter().all(|r| !r.verified && r.error.is_some()));
    }
}
