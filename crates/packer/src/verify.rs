//! Geometric and accounting checks over a finished layout.

use panelcut_core::geometry::{Grain, PartSpec, Rotation};
use panelcut_core::rect::EPSILON;
use panelcut_core::result::LayoutResult;
use panelcut_core::{Error, Result};
use std::collections::HashSet;

/// Relative tolerance for area identities.
const AREA_TOLERANCE: f64 = 1e-6;

fn invalid(message: String) -> Error {
    Error::InvalidLayout(message)
}

fn areas_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= AREA_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Checks that `result` is a legal layout of `parts`.
///
/// Verifies sheet bounds, kerf separation between placements on the same
/// sheet, grain and placed dimensions against the originating part, unique
/// unit instances, the waste identity and that every requested unit is
/// either placed or reported unplaced.
pub fn verify_layout(result: &LayoutResult, parts: &[PartSpec]) -> Result<()> {
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut total_area = 0.0;
    let mut used_area = 0.0;

    for (s, sheet) in result.sheets.iter().enumerate() {
        let bounds = sheet.bounds();
        total_area += sheet.area();

        for p in &sheet.placements {
            let part = parts.get(p.part_index).ok_or_else(|| {
                invalid(format!("sheet {s}: unknown part index {}", p.part_index))
            })?;

            if !bounds.contains(&p.rect()) {
                return Err(invalid(format!(
                    "sheet {s}: part '{}' #{} at ({}, {}) leaves the {}x{} sheet",
                    part.id, p.instance, p.x, p.y, sheet.length, sheet.width
                )));
            }

            let required = match part.grain {
                Grain::Length => Some(Rotation::Deg0),
                Grain::Width => Some(Rotation::Deg90),
                Grain::Any => None,
            };
            if required.map_or(false, |r| r != p.rotation) {
                return Err(invalid(format!(
                    "part '{}' #{} placed at {}° against its grain",
                    part.id,
                    p.instance,
                    p.rotation.degrees()
                )));
            }

            let (w, h) = part.oriented(p.rotation);
            if (w - p.width).abs() > EPSILON || (h - p.height).abs() > EPSILON {
                return Err(invalid(format!(
                    "part '{}' #{} placed as {}x{}, expected {}x{}",
                    part.id, p.instance, p.width, p.height, w, h
                )));
            }

            if p.instance >= part.quantity || !seen.insert((p.part_index, p.instance)) {
                return Err(invalid(format!(
                    "part '{}' instance {} placed twice or out of range",
                    part.id, p.instance
                )));
            }
            used_area += p.area();
        }

        // Each placement grown by half a kerf must not overlap another
        let half = sheet.kerf / 2.0;
        for (i, a) in sheet.placements.iter().enumerate() {
            let grown = a.rect().expand(half);
            for b in &sheet.placements[i + 1..] {
                if grown.intersects(&b.rect().expand(half)) {
                    return Err(invalid(format!(
                        "sheet {s}: '{}' #{} and '{}' #{} closer than one kerf",
                        a.part_id, a.instance, b.part_id, b.instance
                    )));
                }
            }
        }

        if !areas_match(sheet.used_area, sheet.placements.iter().map(|p| p.area()).sum()) {
            return Err(invalid(format!("sheet {s}: used area disagrees with placements")));
        }
    }

    let stats = &result.stats;
    if stats.sheets_used != result.sheets.len() {
        return Err(invalid(format!(
            "stats report {} sheets, layout has {}",
            stats.sheets_used,
            result.sheets.len()
        )));
    }
    if !areas_match(stats.total_sheet_area, total_area) || !areas_match(stats.used_area, used_area)
    {
        return Err(invalid("sheet or used area disagrees with placements".to_string()));
    }
    if !areas_match(stats.waste_area, total_area - used_area) {
        return Err(invalid(format!(
            "waste {} != sheet area {} - used area {}",
            stats.waste_area, total_area, used_area
        )));
    }

    let requested: usize = parts.iter().map(|p| p.quantity).sum();
    let accounted = result.placed_count() + result.unplaced_count();
    if accounted != requested {
        return Err(invalid(format!(
            "{} units requested, {} placed and {} unplaced",
            requested,
            result.placed_count(),
            result.unplaced_count()
        )));
    }

    Ok(())
}
