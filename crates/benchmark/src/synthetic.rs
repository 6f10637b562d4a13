//! Synthetic job generator.
//!
//! Produces reproducible cutlists for stress testing the heuristics,
//! including the "one tall strip among medium panels" shape on which the
//! greedy packers are known to open an extra sheet.

use crate::dataset::Job;
use panelcut_core::geometry::{EdgeBanding, Grain, PartSpec, StockSheetSpec};
use rand::prelude::*;
use std::fmt;

/// Kind of synthetic job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticKind {
    /// Carcass parts in a few related sizes, some grain-bound.
    Cabinet,
    /// Many copies of a single size.
    Uniform,
    /// Long thin strips mixed with medium panels.
    TallStrip,
}

impl SyntheticKind {
    /// All kinds.
    pub const ALL: [SyntheticKind; 3] = [
        SyntheticKind::Cabinet,
        SyntheticKind::Uniform,
        SyntheticKind::TallStrip,
    ];
}

impl fmt::Display for SyntheticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntheticKind::Cabinet => write!(f, "cabinet"),
            SyntheticKind::Uniform => write!(f, "uniform"),
            SyntheticKind::TallStrip => write!(f, "tall-strip"),
        }
    }
}

/// Generator for synthetic benchmark jobs.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    /// Creates a new generator with a random seed.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a job of the given kind with `count` part types.
    pub fn generate(&mut self, kind: SyntheticKind, count: usize) -> Job {
        match kind {
            SyntheticKind::Cabinet => self.cabinet(count),
            SyntheticKind::Uniform => self.uniform(count),
            SyntheticKind::TallStrip => self.tall_strip(count),
        }
    }

    /// Cabinet carcasses: `count` cabinets of random width and depth.
    pub fn cabinet(&mut self, count: usize) -> Job {
        let mut parts = Vec::with_capacity(count * 4);
        for i in 0..count {
            let height = self.mm(600.0..900.0);
            let depth = self.mm(300.0..600.0);
            let width = self.mm(400.0..1000.0);
            let front = EdgeBanding {
                top: true,
                bottom: false,
                left: false,
                right: false,
            };

            parts.push(
                PartSpec::new(format!("C{}-SIDE", i), height, depth)
                    .with_quantity(2)
                    .with_edge_banding(front),
            );
            parts.push(
                PartSpec::new(format!("C{}-BOTTOM", i), width - 36.0, depth)
                    .with_edge_banding(front),
            );
            parts.push(
                PartSpec::new(format!("C{}-SHELF", i), width - 38.0, depth - 20.0)
                    .with_quantity(self.rng.gen_range(1..=3))
                    .with_edge_banding(front),
            );
            parts.push(
                PartSpec::new(format!("C{}-DOOR", i), height - 4.0, width / 2.0 - 4.0)
                    .with_quantity(2)
                    .with_grain(Grain::Length)
                    .with_edge_banding(EdgeBanding::all()),
            );
        }

        Job::new(format!("synthetic_cabinet_{}", count), parts, vec![Self::board()])
    }

    /// A single part size repeated `count` times.
    pub fn uniform(&mut self, count: usize) -> Job {
        let length = self.mm(200.0..800.0);
        let width = self.mm(100.0..600.0);
        let parts = vec![PartSpec::new("P", length, width).with_quantity(count)];

        Job::new(format!("synthetic_uniform_{}", count), parts, vec![Self::board()])
    }

    /// One long strip per five panels of medium size.
    pub fn tall_strip(&mut self, count: usize) -> Job {
        let mut parts = Vec::with_capacity(count);
        for i in 0..count {
            let part = if i % 5 == 0 {
                PartSpec::new(format!("STRIP{}", i), self.mm(2300.0..2700.0), self.mm(60.0..150.0))
                    .with_grain(Grain::Length)
            } else {
                PartSpec::new(format!("PANEL{}", i), self.mm(600.0..900.0), self.mm(400.0..650.0))
                    .with_quantity(self.rng.gen_range(1..=2))
            };
            parts.push(part);
        }

        Job::new(format!("synthetic_tall_strip_{}", count), parts, vec![Self::board()])
            .with_description("Greedy placement tends to waste the strip's row")
    }

    fn mm(&mut self, range: std::ops::Range<f64>) -> f64 {
        self.rng.gen_range(range).round()
    }

    fn board() -> StockSheetSpec {
        StockSheetSpec::new("MDF-18", 2750.0, 1830.0).with_kerf(4.0)
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Predefined synthetic jobs for benchmarking.
pub struct SyntheticJobs;

impl SyntheticJobs {
    /// Generates one job of every kind.
    pub fn all(seed: u64) -> Vec<Job> {
        let mut gen = SyntheticGenerator::with_seed(seed);
        vec![gen.cabinet(6), gen.uniform(200), gen.tall_strip(20)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cabinet_generation() {
        let mut gen = SyntheticGenerator::with_seed(42);
        let job = gen.cabinet(3);
        assert_eq!(job.parts.len(), 12);
        assert!(job.parts.iter().all(|p| p.length > 0.0 && p.width > 0.0));
    }

    #[test]
    fn test_uniform_quantity() {
        let mut gen = SyntheticGenerator::with_seed(1);
        let job = gen.generate(SyntheticKind::Uniform, 200);
        assert_eq!(job.info().total_units, 200);
    }

    #[test]
    fn test_reproducibility() {
        let mut gen1 = SyntheticGenerator::with_seed(123);
        let mut gen2 = SyntheticGenerator::with_seed(123);

        for kind in SyntheticKind::ALL {
            let a = gen1.generate(kind, 10);
            let b = gen2.generate(kind, 10);
            assert_eq!(a.parts, b.parts, "Mismatch for {}", kind);
        }
    }

    #[test]
    fn test_tall_strip_mix() {
        let mut gen = SyntheticGenerator::with_seed(7);
        let job = gen.tall_strip(10);
        let strips = job.parts.iter().filter(|p| p.id.starts_with("STRIP")).count();
        assert_eq!(strips, 2);
    }
}
