//! Benchmark result types and recording.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Result of a single benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Job name
    pub job: String,
    /// Method used
    pub method: String,
    /// Run number (1-based)
    pub run: usize,
    /// Sheets opened
    pub sheets_used: usize,
    /// Units placed
    pub units_placed: usize,
    /// Units requested
    pub total_units: usize,
    /// Used area over opened sheet area (0.0 - 1.0)
    pub yield_ratio: f64,
    /// Waste area (mm²)
    pub waste_area: f64,
    /// Largest offcut area (mm²)
    pub largest_offcut_area: f64,
    /// V2 layout score
    pub score: f64,
    /// Number of saw cuts
    pub cut_count: usize,
    /// Computation time in milliseconds
    pub time_ms: u64,
    /// Annealing iterations (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,
    /// Strategy label reported by the packer
    pub strategy: String,
    /// Units placed turned by 90°
    pub rotated_units: usize,
    /// Whether the layout passed verification
    pub verified: bool,
    /// Verification or solver error, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    /// Creates a failed run.
    pub fn failed(job: &str, method: &str, run: usize, total_units: usize, error: String) -> Self {
        Self {
            job: job.to_string(),
            method: method.to_string(),
            run,
            sheets_used: 0,
            units_placed: 0,
            total_units,
            yield_ratio: 0.0,
            waste_area: 0.0,
            largest_offcut_area: 0.0,
            score: f64::NEG_INFINITY,
            cut_count: 0,
            time_ms: 0,
            iterations: None,
            strategy: String::new(),
            rotated_units: 0,
            verified: false,
            error: Some(error),
        }
    }

    /// Returns true if every unit was placed.
    pub fn all_placed(&self) -> bool {
        self.units_placed == self.total_units
    }
}

/// Collection of benchmark results.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Individual run results
    pub runs: Vec<RunResult>,
    /// Seconds since the Unix epoch when the benchmark was run
    pub timestamp: u64,
    /// Crate version that produced the results
    pub version: String,
}

impl BenchmarkResult {
    /// Creates a new benchmark result.
    pub fn new() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self {
            runs: Vec::new(),
            timestamp,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Adds a run result.
    pub fn add_run(&mut self, result: RunResult) {
        self.runs.push(result);
    }

    /// Appends all runs of `other`.
    pub fn merge(&mut self, other: BenchmarkResult) {
        self.runs.extend(other.runs);
    }

    /// Saves results to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Saves results to a CSV file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        self.write_csv(&mut file)
    }

    /// Writes results as CSV.
    pub fn write_csv(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(
            out,
            "job,method,run,sheets_used,units_placed,total_units,yield,waste_area,largest_offcut_area,score,cut_count,time_ms,iterations,strategy,rotated_units,verified"
        )?;

        for run in &self.runs {
            writeln!(
                out,
                "{},{},{},{},{},{},{:.4},{:.0},{:.0},{:.4},{},{},{},{},{},{}",
                run.job,
                run.method,
                run.run,
                run.sheets_used,
                run.units_placed,
                run.total_units,
                run.yield_ratio,
                run.waste_area,
                run.largest_offcut_area,
                run.score,
                run.cut_count,
                run.time_ms,
                run.iterations.map_or(String::new(), |i| i.to_string()),
                run.strategy,
                run.rotated_units,
                run.verified,
            )?;
        }

        Ok(())
    }

    /// Prints a summary table to stdout.
    pub fn print_summary(&self) {
        println!("\n{:=<100}", "");
        println!("BENCHMARK RESULTS");
        println!("{:=<100}", "");
        println!(
            "{:<24} {:<12} {:>4} {:>7} {:>9} {:>8} {:>11} {:>9} {:>4}",
            "Job", "Method", "Run", "Sheets", "Placed", "Yield%", "Score", "Time(ms)", "OK"
        );
        println!("{:-<100}", "");

        for run in &self.runs {
            println!(
                "{:<24} {:<12} {:>4} {:>7} {:>9} {:>8.1} {:>11.2} {:>9} {:>4}",
                run.job,
                run.method,
                run.run,
                run.sheets_used,
                format!("{}/{}", run.units_placed, run.total_units),
                run.yield_ratio * 100.0,
                run.score,
                run.time_ms,
                if run.verified { "yes" } else { "NO" }
            );
            if let Some(error) = &run.error {
                println!("    error: {}", error);
            }
        }

        println!("{:=<100}\n", "");
    }

    /// Computes summary statistics grouped by method, ordered by name.
    pub fn summary_by_method(&self) -> Vec<MethodSummary> {
        let mut by_method: BTreeMap<&str, Vec<&RunResult>> = BTreeMap::new();
        for run in &self.runs {
            by_method.entry(run.method.as_str()).or_default().push(run);
        }

        by_method
            .into_iter()
            .map(|(method, runs)| {
                let n = runs.len() as f64;
                MethodSummary {
                    method: method.to_string(),
                    run_count: runs.len(),
                    total_sheets: runs.iter().map(|r| r.sheets_used).sum(),
                    avg_yield: runs.iter().map(|r| r.yield_ratio).sum::<f64>() / n,
                    avg_time_ms: (runs.iter().map(|r| r.time_ms).sum::<u64>() as f64 / n) as u64,
                    failures: runs.iter().filter(|r| !r.verified).count(),
                }
            })
            .collect()
    }
}

/// Summary statistics for a method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSummary {
    pub method: String,
    pub run_count: usize,
    pub total_sheets: usize,
    pub avg_yield: f64,
    pub avg_time_ms: u64,
    pub failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(method: &str, sheets: usize, yield_ratio: f64) -> RunResult {
        RunResult {
            job: "cabinet".to_string(),
            method: method.to_string(),
            run: 1,
            sheets_used: sheets,
            units_placed: 10,
            total_units: 10,
            yield_ratio,
            waste_area: 1000.0,
            largest_offcut_area: 800.0,
            score: -1000.0,
            cut_count: 12,
            time_ms: 4,
            iterations: None,
            strategy: "best-of:area".to_string(),
            rotated_units: 2,
            verified: true,
            error: None,
        }
    }

    #[test]
    fn test_summary_by_method() {
        let mut results = BenchmarkResult::new();
        results.add_run(run("legacy", 3, 0.6));
        results.add_run(run("guillotine", 2, 0.8));
        results.add_run(run("guillotine", 2, 0.9));

        let summary = results.summary_by_method();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].method, "guillotine");
        assert_eq!(summary[0].total_sheets, 4);
        assert_relative_eq!(summary[0].avg_yield, 0.85);
        assert_eq!(summary[1].failures, 0);
    }

    #[test]
    fn test_csv_rows() {
        let mut results = BenchmarkResult::new();
        results.add_run(run("legacy", 3, 0.6));
        results.add_run(RunResult::failed("cabinet", "annealed", 1, 10, "boom".to_string()));

        let mut out = Vec::new();
        results.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("job,method,run"));
        assert!(lines[1].starts_with("cabinet,legacy,1,3,10,10,0.6000"));
        assert!(lines[2].ends_with(",false"));
    }
}
