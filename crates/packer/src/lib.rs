//! # Panelcut Packer
//!
//! Rectangular panel packing for the Panelcut cutting-stock optimizer.
//!
//! Parts are expanded into units, ordered, and placed by one of two
//! heuristics onto stock sheets with saw kerf taken into account:
//!
//! - **Guillotine**: free-rectangle packing with best-short-side-fit
//! - **Legacy**: row-by-row shelf packing
//!
//! On top of the heuristics sit the multi-strategy optimizer, which packs
//! under every sort order and keeps the best layout, and a budgeted
//! simulated-annealing refinement of that layout.
//!
//! ## Example
//!
//! ```rust
//! use panelcut_packer::{pack_optimized, PackOptions, PartSpec, StockSheetSpec};
//!
//! let parts = vec![PartSpec::new("SHELF", 764.0, 540.0).with_quantity(6)];
//! let sheets = vec![StockSheetSpec::new("MDF", 2750.0, 1830.0).with_kerf(4.0)];
//!
//! let result = pack_optimized(&parts, &sheets, &PackOptions::default()).unwrap();
//! assert!(result.all_placed());
//! ```

pub mod accounting;
pub mod anneal;
pub mod expand;
pub mod free_rect;
pub mod guillotine;
pub mod packer;
pub mod scoring;
pub mod shelf;
pub mod stock;
pub mod strategy;
pub mod verify;

use expand::expand_parts;
use panelcut_core::geometry::validate_inputs;
use panelcut_core::result::StrategyUsed;

// Re-exports
pub use anneal::{pack_annealed, Annealer, CutlistAnnealProblem};
pub use packer::CutlistSolver;
pub use panelcut_core::{
    Algorithm, Config, Error, LayoutResult, MoveOptions, PackOptions, PartSpec, Result, SaConfig,
    SortStrategy, StockSheetSpec, Strategy,
};
pub use scoring::{score, score_v2};
pub use strategy::{pack_optimized, pack_sorted};
pub use verify::verify_layout;

/// Packs parts in the order given, with the configured heuristic.
///
/// Deterministic: the same input always yields the same layout.
pub fn pack(
    parts: &[PartSpec],
    sheets: &[StockSheetSpec],
    options: &PackOptions,
) -> Result<LayoutResult> {
    validate_inputs(parts, sheets)?;
    let units = expand_parts(parts);
    Ok(strategy::run_packer(&units, parts, sheets, options).with_strategy(StrategyUsed::InputOrder))
}
