//! Benchmark suite for Panelcut
//!
//! This crate provides:
//! - JSON cutlist jobs and a few built-in reference jobs
//! - Seeded synthetic job generation
//! - Benchmark runner comparing the packing methods, with layout verification
//! - Result recording (JSON, CSV) and comparison

mod dataset;
mod result;
mod runner;
mod synthetic;

pub use dataset::{Job, JobError, JobInfo};
pub use result::{BenchmarkResult, MethodSummary, RunResult};
pub use runner::{BenchmarkConfig, BenchmarkRunner, Method};
pub use synthetic::{SyntheticGenerator, SyntheticJobs, SyntheticKind};
