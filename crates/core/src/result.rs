//! Layout result representation.

use crate::geometry::SpecId;
use crate::placement::{Placement, PlacementStats};
use crate::rect::Rect;
use crate::solver::SortStrategy;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of a saw cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CutOrientation {
    /// Cut along the sheet length (constant `y`).
    Horizontal,
    /// Cut along the sheet width (constant `x`).
    Vertical,
}

/// A single straight cut recorded while splitting free space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cut {
    /// Start of the cut (left end for horizontal, top end for vertical).
    pub x: f64,
    /// Start of the cut.
    pub y: f64,
    /// Physical length of the cut.
    pub length: f64,
    /// Direction.
    pub orientation: CutOrientation,
}

impl Cut {
    /// Creates a horizontal cut starting at `(x, y)`.
    pub fn horizontal(x: f64, y: f64, length: f64) -> Self {
        Self {
            x,
            y,
            length,
            orientation: CutOrientation::Horizontal,
        }
    }

    /// Creates a vertical cut starting at `(x, y)`.
    pub fn vertical(x: f64, y: f64, length: f64) -> Self {
        Self {
            x,
            y,
            length,
            orientation: CutOrientation::Vertical,
        }
    }
}

/// One opened sheet and everything placed on it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetLayout {
    /// ID of the sheet type.
    pub sheet_id: SpecId,
    /// Index of the sheet type in the caller's sheet list.
    pub sheet_index: usize,
    /// Instance number among sheets of this type (0-based).
    pub instance: usize,
    /// Sheet length.
    pub length: f64,
    /// Sheet width.
    pub width: f64,
    /// Saw kerf of the sheet type.
    pub kerf: f64,
    /// Placed parts.
    pub placements: Vec<Placement>,
    /// Total area of the placed parts.
    pub used_area: f64,
    /// Remaining free rectangles, kerf removed.
    pub offcuts: Vec<Rect>,
    /// Cuts in the order they were recorded.
    pub cuts: Vec<Cut>,
}

impl SheetLayout {
    /// Area of the sheet.
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Area not covered by parts.
    pub fn waste_area(&self) -> f64 {
        self.area() - self.used_area
    }

    /// Used fraction of the sheet.
    pub fn utilization(&self) -> f64 {
        let area = self.area();
        if area > 0.0 {
            self.used_area / area
        } else {
            0.0
        }
    }

    /// The largest remaining offcut, if any.
    pub fn largest_offcut(&self) -> Option<&Rect> {
        self.offcuts
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
    }

    /// Sheet bounds as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.length, self.width)
    }
}

/// Why a part unit could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnplacedReason {
    /// The part does not fit any sheet type in any allowed orientation.
    TooLargeForSheet,
    /// The part fits some sheet type, but none with remaining quantity.
    InsufficientStock,
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnplacedReason::TooLargeForSheet => write!(f, "too_large_for_sheet"),
            UnplacedReason::InsufficientStock => write!(f, "insufficient_stock"),
        }
    }
}

/// Units of one part that could not be placed, for one reason.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnplacedPart {
    /// ID of the part.
    pub part_id: SpecId,
    /// Index of the part in the caller's part list.
    pub part_index: usize,
    /// Number of unplaced units.
    pub quantity: usize,
    /// Reason code.
    pub reason: UnplacedReason,
}

/// How the unit order of a layout was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StrategyUsed {
    /// Caller-supplied order.
    InputOrder,
    /// A single sort order.
    Sorted(SortStrategy),
    /// Winner of the multi-strategy optimizer.
    BestOf(SortStrategy),
    /// Annealing refinement started from the given sort order.
    Annealed(SortStrategy),
}

impl fmt::Display for StrategyUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyUsed::InputOrder => write!(f, "input-order"),
            StrategyUsed::Sorted(s) => write!(f, "{}", s),
            StrategyUsed::BestOf(s) => write!(f, "best-of:{}", s),
            StrategyUsed::Annealed(s) => write!(f, "annealed:{}", s),
        }
    }
}

/// Aggregate material statistics of a layout.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutStats {
    /// Number of sheets opened.
    pub sheets_used: usize,
    /// Summed area of all opened sheets (mm²).
    pub total_sheet_area: f64,
    /// Summed area of all placed parts (mm²).
    pub used_area: f64,
    /// `total_sheet_area - used_area` (mm²).
    pub waste_area: f64,
    /// `used_area / total_sheet_area`, 0 when no sheet is used.
    pub yield_ratio: f64,
    /// Number of saw cuts.
    pub cut_count: usize,
    /// Summed length of all saw cuts (mm).
    pub total_cut_length: f64,
    /// Banding length for unlaminated parts (mm).
    pub edge_banding_16mm: f64,
    /// Banding length for laminated parts (mm).
    pub edge_banding_32mm: f64,
    /// Area of the single largest offcut across all sheets (mm²).
    pub largest_offcut_area: f64,
    /// `largest_offcut_area / waste_area`, 1 when there is no waste.
    pub offcut_concentration: f64,
    /// Number of placed units.
    pub placed_count: usize,
    /// Number of unplaced units.
    pub unplaced_count: usize,
}

/// Diagnostics of an annealing run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnealingStats {
    /// Iterations performed.
    pub iterations: u64,
    /// Accepted moves (including worse ones).
    pub accepted: u64,
    /// Times the best state improved.
    pub improvements: u64,
    /// Wall-clock time spent, in milliseconds.
    pub elapsed_ms: u64,
    /// Score of the multi-strategy baseline.
    pub baseline_score: f64,
    /// Score of the returned layout.
    pub best_score: f64,
    /// Whether the run was stopped by the cancellation predicate.
    pub cancelled: bool,
}

/// Result of a packing run; the sole output of every entry point.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutResult {
    /// Opened sheets in opening order.
    pub sheets: Vec<SheetLayout>,
    /// Aggregate statistics.
    pub stats: LayoutStats,
    /// Units that could not be placed.
    pub unplaced: Vec<UnplacedPart>,
    /// How the unit order was chosen.
    pub strategy_used: Option<StrategyUsed>,
    /// Annealing diagnostics, for annealed layouts.
    pub annealing: Option<AnnealingStats>,
}

impl LayoutResult {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every requested unit was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Number of opened sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Number of placed units.
    pub fn placed_count(&self) -> usize {
        self.sheets.iter().map(|s| s.placements.len()).sum()
    }

    /// Number of unplaced units.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.iter().map(|u| u.quantity).sum()
    }

    /// Iterates over all placements with their sheet index.
    pub fn placements(&self) -> impl Iterator<Item = (usize, &Placement)> {
        self.sheets
            .iter()
            .enumerate()
            .flat_map(|(i, s)| s.placements.iter().map(move |p| (i, p)))
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: StrategyUsed) -> Self {
        self.strategy_used = Some(strategy);
        self
    }

    /// Computes placement statistics.
    pub fn placement_stats(&self) -> PlacementStats {
        PlacementStats::from_sheets(self.sheets.iter().map(|s| s.placements.as_slice()))
    }

    /// Returns yield as a percentage string.
    pub fn yield_percent(&self) -> String {
        format!("{:.1}%", self.stats.yield_ratio * 100.0)
    }
}

/// Summary of a layout result for reporting.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutSummary {
    /// Units requested.
    pub total_requested: usize,
    /// Units placed.
    pub total_placed: usize,
    /// Sheets opened.
    pub sheets_used: usize,
    /// Yield percentage.
    pub yield_percent: f64,
    /// Waste area (mm²).
    pub waste_area: f64,
    /// Strategy label.
    pub strategy: String,
}

impl From<&LayoutResult> for LayoutSummary {
    fn from(result: &LayoutResult) -> Self {
        Self {
            total_requested: result.placed_count() + result.unplaced_count(),
            total_placed: result.placed_count(),
            sheets_used: result.sheet_count(),
            yield_percent: result.stats.yield_ratio * 100.0,
            waste_area: result.stats.waste_area,
            strategy: result
                .strategy_used
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotation;

    fn sheet_with(placements: Vec<Placement>) -> SheetLayout {
        let used_area = placements.iter().map(Placement::area).sum();
        SheetLayout {
            sheet_id: "S".to_string(),
            sheet_index: 0,
            instance: 0,
            length: 1000.0,
            width: 500.0,
            kerf: 0.0,
            placements,
            used_area,
            offcuts: vec![
                Rect::new(0.0, 100.0, 1000.0, 400.0),
                Rect::new(200.0, 0.0, 800.0, 100.0),
            ],
            cuts: Vec::new(),
        }
    }

    #[test]
    fn test_result_new() {
        let result = LayoutResult::new();
        assert!(result.sheets.is_empty());
        assert!(result.all_placed());
        assert_eq!(result.placed_count(), 0);
    }

    #[test]
    fn test_sheet_layout_metrics() {
        let sheet = sheet_with(vec![Placement::new(
            "A".to_string(),
            0,
            0,
            Rect::new(0.0, 0.0, 200.0, 100.0),
            Rotation::Deg0,
        )]);
        assert_eq!(sheet.area(), 500_000.0);
        assert_eq!(sheet.waste_area(), 480_000.0);
        assert!((sheet.utilization() - 0.04).abs() < 1e-12);
        assert_eq!(sheet.largest_offcut().map(Rect::area), Some(400_000.0));
    }

    #[test]
    fn test_unplaced_counts_by_quantity() {
        let mut result = LayoutResult::new();
        result.unplaced.push(UnplacedPart {
            part_id: "BIG".to_string(),
            part_index: 0,
            quantity: 3,
            reason: UnplacedReason::TooLargeForSheet,
        });
        assert!(!result.all_placed());
        assert_eq!(result.unplaced_count(), 3);
        assert_eq!(
            UnplacedReason::TooLargeForSheet.to_string(),
            "too_large_for_sheet"
        );
    }

    #[test]
    fn test_layout_summary() {
        let mut result = LayoutResult::new()
            .with_strategy(StrategyUsed::BestOf(SortStrategy::Area));
        result.sheets.push(sheet_with(vec![Placement::new(
            "A".to_string(),
            0,
            0,
            Rect::new(0.0, 0.0, 500.0, 500.0),
            Rotation::Deg0,
        )]));
        result.stats.yield_ratio = 0.5;

        let summary = LayoutSummary::from(&result);
        assert_eq!(summary.total_placed, 1);
        assert_eq!(summary.sheets_used, 1);
        assert_eq!(summary.yield_percent, 50.0);
        assert_eq!(summary.strategy, "best-of:area");
        assert_eq!(result.yield_percent(), "50.0%");
    }
}
