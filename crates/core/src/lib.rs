//! # Panelcut Core
//!
//! Core types and abstractions for the Panelcut cutting-stock optimizer.
//!
//! This crate provides the data model shared by the packing heuristics, the
//! benchmark harness and the facade crate.
//!
//! ## Core Components
//!
//! - **Specifications**: `PartSpec`, `StockSheetSpec`, grain, banding and lamination
//! - **Layout types**: `Placement`, `SheetLayout`, `LayoutResult`, `LayoutStats`
//! - **Solver trait**: Common interface for the packing strategies
//! - **SA framework**: Budgeted simulated annealing with injected clock and RNG
//! - **Geometry**: The axis-aligned `Rect` used for free space and offcuts
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod clock;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod rect;
pub mod result;
pub mod sa;
pub mod solver;

// Re-exports
pub use clock::{Clock, StepClock, SystemClock};
pub use error::{Error, Result};
pub use geometry::{
    validate_inputs, BandingClass, EdgeBanding, Grain, LaminationType, PartSpec, Rotation,
    SpecId, StockSheetSpec,
};
pub use placement::{Placement, PlacementStats};
pub use rect::{Rect, EPSILON};
pub use result::{
    AnnealingStats, Cut, CutOrientation, LayoutResult, LayoutStats, LayoutSummary, SheetLayout,
    StrategyUsed, UnplacedPart, UnplacedReason,
};
pub use sa::{
    CoolingSchedule, NeighborhoodOperator, PermutationSolution, SaConfig, SaHooks, SaProblem,
    SaProgress, SaResult, SaRunner, SaSolution,
};
pub use solver::{
    Algorithm, Config, MoveOptions, PackOptions, ProgressCallback, ProgressInfo, SortStrategy,
    Solver, Strategy,
};
