//! Time sources for budgeted search.
//!
//! The annealing loop never reads ambient time directly; it asks a [`Clock`].
//! [`SystemClock`] is the production source, [`StepClock`] makes runs
//! reproducible in tests.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn elapsed(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Starts a new clock.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
#[derive(Debug)]
pub struct StepClock {
    step: Duration,
    readings: Cell<u32>,
}

impl StepClock {
    /// Creates a clock advancing `step` per reading.
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            readings: Cell::new(0),
        }
    }

    /// Number of readings taken so far.
    pub fn readings(&self) -> u32 {
        self.readings.get()
    }
}

impl Clock for StepClock {
    fn elapsed(&self) -> Duration {
        let n = self.readings.get();
        self.readings.set(n.saturating_add(1));
        self.step * n
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}
