//! Free-rectangle guillotine packer.
//!
//! Units are placed one at a time, in the order given. For each unit every
//! open sheet, free rectangle and legal orientation is scored with
//! best-short-side-fit, and the globally best combination wins. A new sheet
//! is opened only when nothing open can take the unit.
//!
//! # Algorithm
//!
//! 1. Collect legal orientations (grain, rotation option, preference)
//! 2. Score every (sheet, free rectangle, orientation) combination
//! 3. If none fits, open the first sheet type with stock that accepts the unit
//! 4. Place at the free rectangle's origin and split the remainder in two
//! 5. Record the cuts the split makes

use crate::accounting::{PackOutcome, UnplacedUnit};
use crate::expand::{Orientation, UnitPart};
use crate::free_rect::{FitScore, FreeRectSet};
use crate::stock::StockInventory;
use panelcut_core::geometry::{PartSpec, StockSheetSpec};
use panelcut_core::placement::Placement;
use panelcut_core::result::{Cut, SheetLayout, UnplacedReason};

/// A sheet being filled.
#[derive(Debug, Clone)]
struct OpenSheet {
    sheet_index: usize,
    instance: usize,
    free: FreeRectSet,
    placements: Vec<Placement>,
    cuts: Vec<Cut>,
    used_area: f64,
}

impl OpenSheet {
    fn new(spec: &StockSheetSpec, sheet_index: usize, instance: usize) -> Self {
        Self {
            sheet_index,
            instance,
            free: FreeRectSet::for_sheet(spec.length, spec.width, spec.kerf),
            placements: Vec::new(),
            cuts: Vec::new(),
            used_area: 0.0,
        }
    }

    fn place(&mut self, unit: &UnitPart, part: &PartSpec, rect_index: usize, o: Orientation) {
        let free = std::mem::take(&mut self.free);
        let (free, placed, cuts) = free.place(rect_index, o.width, o.height);
        self.free = free;
        self.cuts.extend(cuts);
        self.used_area += placed.area();
        self.placements.push(Placement::new(
            part.id.clone(),
            unit.part_index,
            unit.instance,
            placed,
            o.rotation,
        ));
    }

    fn finish(self, spec: &StockSheetSpec) -> SheetLayout {
        SheetLayout {
            sheet_id: spec.id.clone(),
            sheet_index: self.sheet_index,
            instance: self.instance,
            length: spec.length,
            width: spec.width,
            kerf: spec.kerf,
            offcuts: self.free.offcuts(),
            placements: self.placements,
            used_area: self.used_area,
            cuts: self.cuts,
        }
    }
}

/// The chosen position for one unit.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    sheet: usize,
    rect: usize,
    orientation: Orientation,
    score: FitScore,
}

/// Best placement over `open` sheets for the given orientations.
fn best_candidate(open: &[OpenSheet], orientations: &[Orientation]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (sheet, s) in open.iter().enumerate() {
        if let Some((rect, o_index, score)) = s.free.best_fit(orientations) {
            if best.map_or(true, |b| score.is_better_than(&b.score)) {
                best = Some(Candidate {
                    sheet,
                    rect,
                    orientation: orientations[o_index],
                    score,
                });
            }
        }
    }
    best
}

/// Honours a rotation preference where it fits, else falls back to the rest.
fn find_candidate(
    open: &[OpenSheet],
    orientations: &[Orientation],
    has_preference: bool,
) -> Option<Candidate> {
    if has_preference && orientations.len() > 1 {
        best_candidate(open, &orientations[..1])
            .or_else(|| best_candidate(open, &orientations[1..]))
    } else {
        best_candidate(open, orientations)
    }
}

/// Packs `units` in the given order.
pub fn pack_units(
    units: &[UnitPart],
    parts: &[PartSpec],
    sheets: &[StockSheetSpec],
    allow_rotation: bool,
) -> PackOutcome {
    let mut stock = StockInventory::new(sheets);
    let mut open: Vec<OpenSheet> = Vec::new();
    let mut unplaced = Vec::new();

    for unit in units {
        let orientations = unit.orientations(allow_rotation);
        let has_preference = unit.preferred.is_some();

        let candidate = match find_candidate(&open, &orientations, has_preference) {
            Some(candidate) => candidate,
            None => match stock.open_for(&orientations) {
                Ok((sheet_index, instance)) => {
                    let fresh = OpenSheet::new(stock.spec(sheet_index), sheet_index, instance);
                    match find_candidate(std::slice::from_ref(&fresh), &orientations, has_preference)
                    {
                        Some(candidate) => {
                            open.push(fresh);
                            Candidate {
                                sheet: open.len() - 1,
                                ..candidate
                            }
                        }
                        None => {
                            log::warn!(
                                "part {} accepted by sheet type {} but fits no free space",
                                unit.part_index,
                                sheet_index
                            );
                            stock.release(sheet_index);
                            unplaced.push(UnplacedUnit {
                                part_index: unit.part_index,
                                reason: UnplacedReason::TooLargeForSheet,
                            });
                            continue;
                        }
                    }
                }
                Err(reason) => {
                    unplaced.push(UnplacedUnit {
                        part_index: unit.part_index,
                        reason,
                    });
                    continue;
                }
            },
        };

        open[candidate.sheet].place(
            unit,
            &parts[unit.part_index],
            candidate.rect,
            candidate.orientation,
        );
    }

    PackOutcome {
        sheets: open
            .into_iter()
            .map(|s| {
                let spec = stock.spec(s.sheet_index);
                s.finish(spec)
            })
            .collect(),
        unplaced,
    }
}
