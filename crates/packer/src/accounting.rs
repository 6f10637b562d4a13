//! Edge-banding and waste accounting over finished placements.

use panelcut_core::geometry::{BandingClass, PartSpec};
use panelcut_core::result::{LayoutResult, LayoutStats, SheetLayout, UnplacedPart, UnplacedReason};
use panelcut_core::rect::EPSILON;

/// A unit the packer could not place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnplacedUnit {
    /// Index of the originating part.
    pub part_index: usize,
    /// Why it was not placed.
    pub reason: UnplacedReason,
}

/// Raw output of a single packing pass.
#[derive(Debug, Clone, Default)]
pub struct PackOutcome {
    /// Opened sheets in opening order.
    pub sheets: Vec<SheetLayout>,
    /// Units left over, in processing order.
    pub unplaced: Vec<UnplacedUnit>,
}

/// Builds the final result: groups unplaced units and computes statistics.
pub fn build_result(parts: &[PartSpec], outcome: PackOutcome) -> LayoutResult {
    let unplaced = group_unplaced(parts, &outcome.unplaced);
    for u in &unplaced {
        log::warn!(
            "{} unit(s) of part '{}' not placed: {}",
            u.quantity,
            u.part_id,
            u.reason
        );
    }

    let mut result = LayoutResult::new();
    result.sheets = outcome.sheets;
    result.unplaced = unplaced;
    result.stats = compute_stats(parts, &result);
    result
}

/// Groups unplaced units per (part, reason), in first-seen order.
fn group_unplaced(parts: &[PartSpec], units: &[UnplacedUnit]) -> Vec<UnplacedPart> {
    let mut grouped: Vec<UnplacedPart> = Vec::new();
    for unit in units {
        match grouped
            .iter_mut()
            .find(|g| g.part_index == unit.part_index && g.reason == unit.reason)
        {
            Some(group) => group.quantity += 1,
            None => grouped.push(UnplacedPart {
                part_id: parts
                    .get(unit.part_index)
                    .map(|p| p.id.clone())
                    .unwrap_or_default(),
                part_index: unit.part_index,
                quantity: 1,
                reason: unit.reason,
            }),
        }
    }
    grouped
}

/// Aggregate statistics of a layout.
pub fn compute_stats(parts: &[PartSpec], result: &LayoutResult) -> LayoutStats {
    let mut stats = LayoutStats {
        sheets_used: result.sheets.len(),
        placed_count: result.placed_count(),
        unplaced_count: result.unplaced_count(),
        ..LayoutStats::default()
    };

    for sheet in &result.sheets {
        stats.total_sheet_area += sheet.area();
        stats.used_area += sheet.used_area;
        stats.cut_count += sheet.cuts.len();
        stats.total_cut_length += sheet.cuts.iter().map(|c| c.length).sum::<f64>();

        for offcut in &sheet.offcuts {
            stats.largest_offcut_area = stats.largest_offcut_area.max(offcut.area());
        }

        for placement in &sheet.placements {
            let Some(part) = parts.get(placement.part_index) else {
                continue;
            };
            let banded = part.edge_banding.banded_length(part.length, part.width);
            match part.lamination.banding_class() {
                BandingClass::Mm16 => stats.edge_banding_16mm += banded,
                BandingClass::Mm32 => stats.edge_banding_32mm += banded,
            }
        }
    }

    stats.waste_area = stats.total_sheet_area - stats.used_area;
    stats.yield_ratio = if stats.total_sheet_area > 0.0 {
        stats.used_area / stats.total_sheet_area
    } else {
        0.0
    };
    stats.offcut_concentration = if stats.waste_area > EPSILON {
        stats.largest_offcut_area / stats.waste_area
    } else {
        1.0
    };
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use panelcut_core::geometry::{EdgeBanding, LaminationType, Rotation};
    use panelcut_core::placement::Placement;
    use panelcut_core::rect::Rect;
    use panelcut_core::result::Cut;

    fn sheet(placements: Vec<Placement>, offcuts: Vec<Rect>) -> SheetLayout {
        SheetLayout {
            sheet_id: "S".to_string(),
            sheet_index: 0,
            instance: 0,
            length: 2750.0,
            width: 1830.0,
            kerf: 0.0,
            used_area: placements.iter().map(Placement::area).sum(),
            placements,
            offcuts,
            cuts: vec![
                Cut::horizontal(0.0, 500.0, 2750.0),
                Cut::vertical(1000.0, 0.0, 500.0),
            ],
        }
    }

    fn placement(part_index: usize, instance: usize, x: f64) -> Placement {
        Placement::new(
            format!("P{}", part_index),
            part_index,
            instance,
            Rect::new(x, 0.0, 1000.0, 500.0),
            Rotation::Deg0,
        )
    }

    #[test]
    fn test_banding_by_class() {
        let parts = vec![
            PartSpec::new("P0", 1000.0, 500.0).with_edge_banding(EdgeBanding::all()),
            PartSpec::new("P1", 1000.0, 500.0)
                .with_edge_banding(EdgeBanding::all())
                .with_lamination(LaminationType::SameBoard),
        ];
        let outcome = PackOutcome {
            sheets: vec![sheet(
                vec![placement(0, 0, 0.0), placement(0, 1, 1000.0), placement(1, 0, 2000.0)],
                Vec::new(),
            )],
            unplaced: Vec::new(),
        };

        let result = build_result(&parts, outcome);
        assert_relative_eq!(result.stats.edge_banding_16mm, 6000.0);
        assert_relative_eq!(result.stats.edge_banding_32mm, 3000.0);
    }

    #[test]
    fn test_waste_and_concentration() {
        let parts = vec![PartSpec::new("P0", 1000.0, 500.0)];
        let offcuts = vec![
            Rect::new(0.0, 500.0, 2750.0, 1330.0),
            Rect::new(1000.0, 0.0, 1750.0, 500.0),
        ];
        let outcome = PackOutcome {
            sheets: vec![sheet(vec![placement(0, 0, 0.0)], offcuts)],
            unplaced: Vec::new(),
        };

        let result = build_result(&parts, outcome);
        let stats = &result.stats;
        assert_eq!(stats.waste_area, 4_532_500.0);
        assert_eq!(stats.largest_offcut_area, 3_657_500.0);
        assert_relative_eq!(stats.offcut_concentration, 3_657_500.0 / 4_532_500.0);
        assert_eq!(stats.cut_count, 2);
        assert_relative_eq!(stats.total_cut_length, 3250.0);
        assert_relative_eq!(stats.yield_ratio, 500_000.0 / 5_032_500.0);
    }

    #[test]
    fn test_unplaced_grouped_per_reason() {
        let parts = vec![PartSpec::new("A", 10.0, 10.0), PartSpec::new("B", 10.0, 10.0)];
        let unit = |part_index, reason| UnplacedUnit { part_index, reason };
        let outcome = PackOutcome {
            sheets: Vec::new(),
            unplaced: vec![
                unit(1, UnplacedReason::TooLargeForSheet),
                unit(0, UnplacedReason::InsufficientStock),
                unit(1, UnplacedReason::TooLargeForSheet),
            ],
        };

        let result = build_result(&parts, outcome);
        assert_eq!(result.unplaced.len(), 2);
        assert_eq!(result.unplaced[0].part_id, "B");
        assert_eq!(result.unplaced[0].quantity, 2);
        assert_eq!(result.stats.unplaced_count, 3);
        assert_eq!(result.stats.offcut_concentration, 1.0);
        assert_eq!(result.stats.yield_ratio, 0.0);
    }
}
