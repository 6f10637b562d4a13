//! Legacy shelf packer.
//!
//! Places units left to right in rows ("shelves") whose height is set by the
//! first unit on the row; shelves stack top to bottom, and a new sheet is
//! opened once a unit fits neither the current shelf nor a new one. Only the
//! most recently opened sheet is ever considered.
//!
//! Kept alongside the guillotine packer for comparison. It shares the kerf
//! model: every unit and the sheet itself are inflated by one kerf.

use crate::accounting::{PackOutcome, UnplacedUnit};
use crate::expand::{Orientation, UnitPart};
use crate::stock::StockInventory;
use panelcut_core::geometry::{PartSpec, StockSheetSpec};
use panelcut_core::placement::Placement;
use panelcut_core::rect::{Rect, EPSILON};
use panelcut_core::result::{Cut, SheetLayout, UnplacedReason};

#[derive(Debug, Clone)]
struct Shelf {
    y: f64,
    height: f64,
    cursor: f64,
    items: Vec<usize>,
}

#[derive(Debug, Clone)]
struct ShelfSheet<'a> {
    spec: &'a StockSheetSpec,
    sheet_index: usize,
    instance: usize,
    shelves: Vec<Shelf>,
    placements: Vec<Placement>,
    used_area: f64,
}

impl<'a> ShelfSheet<'a> {
    fn new(spec: &'a StockSheetSpec, sheet_index: usize, instance: usize) -> Self {
        Self {
            spec,
            sheet_index,
            instance,
            shelves: Vec::new(),
            placements: Vec::new(),
            used_area: 0.0,
        }
    }

    fn kerf(&self) -> f64 {
        self.spec.kerf
    }

    /// Inflated sheet extents.
    fn frame(&self) -> (f64, f64) {
        (self.spec.length + self.kerf(), self.spec.width + self.kerf())
    }

    fn next_shelf_y(&self) -> f64 {
        self.shelves.last().map_or(0.0, |s| s.y + s.height)
    }

    /// Orientation that fits the current shelf, flattest first.
    fn fit_current(&self, orientations: &[Orientation]) -> Option<Orientation> {
        let (frame_l, _) = self.frame();
        let shelf = self.shelves.last()?;
        orientations.iter().copied().find(|o| {
            shelf.cursor + o.width + self.kerf() <= frame_l + EPSILON
                && o.height + self.kerf() <= shelf.height + EPSILON
        })
    }

    /// Orientation that fits a new shelf below the last one, flattest first.
    fn fit_new_shelf(&self, orientations: &[Orientation]) -> Option<Orientation> {
        let (frame_l, frame_w) = self.frame();
        let y = self.next_shelf_y();
        orientations.iter().copied().find(|o| {
            o.width + self.kerf() <= frame_l + EPSILON
                && y + o.height + self.kerf() <= frame_w + EPSILON
        })
    }

    fn open_shelf(&mut self, o: &Orientation) {
        let y = self.next_shelf_y();
        self.shelves.push(Shelf {
            y,
            height: o.height + self.kerf(),
            cursor: 0.0,
            items: Vec::new(),
        });
    }

    fn place(&mut self, unit: &UnitPart, part: &PartSpec, o: Orientation) {
        let kerf = self.kerf();
        let Some(shelf) = self.shelves.last_mut() else {
            return;
        };
        let rect = Rect::new(shelf.cursor, shelf.y, o.width, o.height);
        shelf.cursor += o.width + kerf;
        shelf.items.push(self.placements.len());
        self.used_area += rect.area();
        self.placements.push(Placement::new(
            part.id.clone(),
            unit.part_index,
            unit.instance,
            rect,
            o.rotation,
        ));
    }

    /// Derives cuts and offcuts from the shelf structure.
    fn finish(self) -> SheetLayout {
        let kerf = self.kerf();
        let (frame_l, frame_w) = self.frame();
        let mut cuts = Vec::new();
        let mut offcuts = Vec::new();

        for shelf in &self.shelves {
            let shelf_bottom = shelf.y + shelf.height;
            if shelf_bottom < frame_w - EPSILON {
                cuts.push(Cut::horizontal(0.0, shelf_bottom - kerf, frame_l - kerf));
            }

            for &index in &shelf.items {
                let p = &self.placements[index];
                let (iw, ih) = (p.width + kerf, p.height + kerf);
                if p.x + iw < frame_l - EPSILON {
                    cuts.push(Cut::vertical(p.x + p.width, shelf.y, shelf.height - kerf));
                }
                if ih < shelf.height - EPSILON {
                    cuts.push(Cut::horizontal(p.x, p.y + p.height, p.width));
                    offcuts.extend(
                        Rect::new(p.x, p.y + ih, iw, shelf.height - ih).trim_trailing(kerf),
                    );
                }
            }

            if shelf.cursor < frame_l - EPSILON {
                offcuts.extend(
                    Rect::new(shelf.cursor, shelf.y, frame_l - shelf.cursor, shelf.height)
                        .trim_trailing(kerf),
                );
            }
        }

        let y_end = self.next_shelf_y();
        if y_end < frame_w - EPSILON {
            offcuts.extend(Rect::new(0.0, y_end, frame_l, frame_w - y_end).trim_trailing(kerf));
        }

        SheetLayout {
            sheet_id: self.spec.id.clone(),
            sheet_index: self.sheet_index,
            instance: self.instance,
            length: self.spec.length,
            width: self.spec.width,
            kerf,
            placements: self.placements,
            used_area: self.used_area,
            offcuts,
            cuts,
        }
    }
}

/// Packs `units` in the given order using shelves.
pub fn pack_units(
    units: &[UnitPart],
    parts: &[PartSpec],
    sheets: &[StockSheetSpec],
    allow_rotation: bool,
) -> PackOutcome {
    let mut stock = StockInventory::new(sheets);
    let mut done: Vec<SheetLayout> = Vec::new();
    let mut current: Option<ShelfSheet<'_>> = None;
    let mut unplaced = Vec::new();

    for unit in units {
        let mut orientations = unit.orientations(allow_rotation);
        orientations.sort_by(|a, b| a.height.total_cmp(&b.height));
        let part = &parts[unit.part_index];

        if let Some(sheet) = current.as_mut() {
            if let Some(o) = sheet.fit_current(&orientations) {
                sheet.place(unit, part, o);
                continue;
            }
            if let Some(o) = sheet.fit_new_shelf(&orientations) {
                sheet.open_shelf(&o);
                sheet.place(unit, part, o);
                continue;
            }
        }

        match stock.open_for(&orientations) {
            Ok((sheet_index, instance)) => {
                let mut sheet = ShelfSheet::new(stock.spec(sheet_index), sheet_index, instance);
                match sheet.fit_new_shelf(&orientations) {
                    Some(o) => {
                        sheet.open_shelf(&o);
                        sheet.place(unit, part, o);
                        if let Some(full) = current.replace(sheet) {
                            done.push(full.finish());
                        }
                    }
                    None => {
                        log::warn!("part {} does not fit an empty sheet", unit.part_index);
                        stock.release(sheet_index);
                        unplaced.push(UnplacedUnit {
                            part_index: unit.part_index,
                            reason: UnplacedReason::TooLargeForSheet,
                        });
                    }
                }
            }
            Err(reason) => unplaced.push(UnplacedUnit {
                part_index: unit.part_index,
                reason,
            }),
        }
    }

    if let Some(last) = current {
        done.push(last.finish());
    }

    PackOutcome {
        sheets: done,
        unplaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand_parts;
    use approx::assert_relative_eq;
    use panelcut_core::geometry::Rotation;
    use panelcut_core::result::CutOrientation;

    #[test]
    fn test_rows_fill_left_to_right() {
        let parts = vec![PartSpec::new("A", 300.0, 200.0).with_quantity(4)];
        let sheets = vec![StockSheetSpec::new("S", 1000.0, 1000.0)];

        let outcome = pack_units(&expand_parts(&parts), &parts, &sheets, true);
        let placements = &outcome.sheets[0].placements;

        assert_eq!(placements.len(), 4);
        assert_eq!(placements[2].rect(), Rect::new(600.0, 0.0, 300.0, 200.0));
        assert_eq!(placements[3].rect(), Rect::new(0.0, 200.0, 300.0, 200.0));
        assert!(placements.iter().all(|p| p.rotation == Rotation::Deg0));
    }

    #[test]
    fn test_flatter_orientation_first() {
        let parts = vec![PartSpec::new("TALL", 200.0, 600.0)];
        let sheets = vec![StockSheetSpec::new("S", 1000.0, 1000.0)];

        let outcome = pack_units(&expand_parts(&parts), &parts, &sheets, true);
        let p = &outcome.sheets[0].placements[0];
        assert_eq!(p.rotation, Rotation::Deg90);
        assert_eq!((p.width, p.height), (600.0, 200.0));
    }

    #[test]
    fn test_opens_new_sheet_when_full() {
        let parts = vec![PartSpec::new("Q", 600.0, 600.0).with_quantity(2)];
        let sheets = vec![StockSheetSpec::new("S", 1000.0, 1000.0)];

        let outcome = pack_units(&expand_parts(&parts), &parts, &sheets, true);
        assert_eq!(outcome.sheets.len(), 2);
        assert_eq!(outcome.sheets[1].instance, 1);
    }

    #[test]
    fn test_cuts_and_offcuts_with_kerf() {
        let parts = vec![
            PartSpec::new("A", 400.0, 300.0),
            PartSpec::new("B", 400.0, 200.0),
        ];
        let sheets = vec![StockSheetSpec::new("S", 1000.0, 1000.0).with_kerf(4.0)];

        let outcome = pack_units(&expand_parts(&parts), &parts, &sheets, false);
        let sheet = &outcome.sheets[0];

        assert_relative_eq!(sheet.placements[1].x, 404.0);

        // Shelf cut, two separation cuts, one trim cut under B
        let horizontal = sheet
            .cuts
            .iter()
            .filter(|c| c.orientation == CutOrientation::Horizontal)
            .count();
        assert_eq!(sheet.cuts.len(), 4);
        assert_eq!(horizontal, 2);
        assert_relative_eq!(sheet.cuts[0].y, 300.0);

        // Trim under B, right of the shelf, below the shelf
        assert_eq!(sheet.offcuts.len(), 3);
        assert!(sheet
            .offcuts
            .contains(&Rect::new(404.0, 204.0, 400.0, 96.0)));
        let offcut_area: f64 = sheet.offcuts.iter().map(Rect::area).sum();
        assert!(offcut_area <= sheet.waste_area());
    }
}
