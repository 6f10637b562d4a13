//! Layout quality scores (higher is better).
//!
//! Both variants let sheet count dominate through a large fixed penalty per
//! sheet, and at a fixed sheet count reward layouts that concentrate waste
//! into one large offcut rather than fragmenting it. Area terms are
//! normalized by the reference sheet area.
//!
//! ```text
//! V1 = -1000·sheets - 10000·unplaced - 10·r(waste) + 50·r(largest) + 20·concentration
//! V2 = -1000·sheets - 10000·unplaced - 10·r(waste) + 100·r(largest) + 40·concentration
//!      + 10·squareness(largest) - 20·r(slivers)
//! ```

use panelcut_core::rect::Rect;
use panelcut_core::result::LayoutResult;

/// Penalty per opened sheet.
pub const SHEET_PENALTY: f64 = 1000.0;

/// Penalty per unplaced unit.
pub const UNPLACED_PENALTY: f64 = 10_000.0;

/// Offcuts whose shorter side is below this (mm) count as slivers.
pub const SLIVER_WIDTH: f64 = 50.0;

fn ratio(area: f64, sheet_area: f64) -> f64 {
    if sheet_area > 0.0 {
        area / sheet_area
    } else {
        0.0
    }
}

fn base(result: &LayoutResult, sheet_area: f64) -> f64 {
    -SHEET_PENALTY * result.sheets.len() as f64
        - UNPLACED_PENALTY * result.unplaced_count() as f64
        - 10.0 * ratio(result.stats.waste_area, sheet_area)
}

/// Scores a layout.
pub fn score(result: &LayoutResult, sheet_area: f64) -> f64 {
    base(result, sheet_area)
        + 50.0 * ratio(result.stats.largest_offcut_area, sheet_area)
        + 20.0 * result.stats.offcut_concentration
}

/// Scores a layout with explicit offcut-quality terms.
///
/// Adds the squareness of the largest offcut (short side over long side) and
/// penalizes the total area of sliver offcuts.
pub fn score_v2(result: &LayoutResult, sheet_area: f64) -> f64 {
    let offcuts = || result.sheets.iter().flat_map(|s| s.offcuts.iter());

    let squareness = offcuts()
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .map_or(0.0, |r| {
            let long = r.max_side();
            if long > 0.0 {
                r.min_side() / long
            } else {
                0.0
            }
        });
    let sliver_area: f64 = offcuts()
        .filter(|r| r.min_side() < SLIVER_WIDTH)
        .map(Rect::area)
        .sum();

    base(result, sheet_area)
        + 100.0 * ratio(result.stats.largest_offcut_area, sheet_area)
        + 40.0 * result.stats.offcut_concentration
        + 10.0 * squareness
        - 20.0 * ratio(sliver_area, sheet_area)
}
