//! # Panelcut
//!
//! 2D cutting-stock optimizer for sheet goods.
//!
//! This crate provides:
//! - **Packing**: Guillotine and shelf heuristics with saw kerf
//! - **Optimization**: Best-of-all sort orders and budgeted simulated annealing
//! - **Accounting**: Waste, offcuts, cut length and edge banding per thickness
//!
//! ## Quick Start
//!
//! ```rust
//! use panelcut::{CutlistSolver, Config, PartSpec, Solver, StockSheetSpec};
//!
//! let parts = vec![
//!     PartSpec::new("SIDE", 720.0, 560.0).with_quantity(2),
//!     PartSpec::new("SHELF", 764.0, 540.0).with_quantity(3),
//! ];
//! let sheets = vec![StockSheetSpec::new("MDF", 2750.0, 1830.0).with_kerf(4.0)];
//!
//! let solver = CutlistSolver::new(Config::default());
//! let result = solver.solve(&parts, &sheets).unwrap();
//! assert_eq!(result.sheet_count(), 1);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support

/// Core types and abstractions.
pub use panelcut_core as core;

/// Packing heuristics and optimizers.
pub use panelcut_packer as packer;

// Re-export commonly used types at root level
pub use panelcut_core::{
    Config, EdgeBanding, Error, Grain, LaminationType, LayoutResult, PartSpec, Placement,
    Result, Solver, StockSheetSpec, Strategy,
};
pub use panelcut_packer::{
    pack, pack_annealed, pack_optimized, pack_sorted, score, score_v2, verify_layout,
    CutlistSolver,
};
