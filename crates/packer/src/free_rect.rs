//! Per-sheet free space for guillotine placement.
//!
//! Free rectangles live in a kerf-inflated frame: the sheet is treated as
//! `(length + kerf) x (width + kerf)` and every part as `(w + kerf) x (h + kerf)`.
//! A part touching the far sheet edge then loses its trailing kerf strip to
//! the virtual margin, and two neighbouring parts are always one kerf apart.

use crate::expand::Orientation;
use panelcut_core::rect::{Rect, EPSILON};
use panelcut_core::result::Cut;
use std::cmp::Ordering;

/// Best-short-side-fit quality of a placement; lower is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitScore {
    /// Smaller leftover side.
    pub short_side: f64,
    /// Larger leftover side.
    pub long_side: f64,
}

impl FitScore {
    fn new(free: &Rect, width: f64, height: f64) -> Self {
        let dw = free.width - width;
        let dh = free.height - height;
        Self {
            short_side: dw.min(dh),
            long_side: dw.max(dh),
        }
    }

    /// Strictly better than `other`.
    pub fn is_better_than(&self, other: &FitScore) -> bool {
        self.short_side
            .total_cmp(&other.short_side)
            .then(self.long_side.total_cmp(&other.long_side))
            == Ordering::Less
    }
}

/// Axis of the first cut made when splitting a free rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Full-width horizontal cut below the part.
    Horizontal,
    /// Full-height vertical cut right of the part.
    Vertical,
}

/// Free rectangles of one sheet, owned by that sheet.
#[derive(Debug, Clone, Default)]
pub struct FreeRectSet {
    rects: Vec<Rect>,
    kerf: f64,
}

impl FreeRectSet {
    /// Free space of an empty sheet.
    pub fn for_sheet(length: f64, width: f64, kerf: f64) -> Self {
        Self {
            rects: vec![Rect::new(0.0, 0.0, length + kerf, width + kerf)],
            kerf,
        }
    }

    /// Current free rectangles in the inflated frame.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Number of free rectangles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns true when no free space remains.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Best free rectangle and orientation for a part, if any fits.
    ///
    /// Returns `(rectangle index, orientation index, score)`. Ties keep the
    /// earliest rectangle, then the earliest orientation.
    pub fn best_fit(&self, orientations: &[Orientation]) -> Option<(usize, usize, FitScore)> {
        let mut best: Option<(usize, usize, FitScore)> = None;
        for (index, free) in self.rects.iter().enumerate() {
            for (o_index, o) in orientations.iter().enumerate() {
                let (iw, ih) = (o.width + self.kerf, o.height + self.kerf);
                if !free.fits(iw, ih) {
                    continue;
                }
                let score = FitScore::new(free, iw, ih);
                if best.map_or(true, |(_, _, b)| score.is_better_than(&b)) {
                    best = Some((index, o_index, score));
                }
            }
        }
        best
    }

    /// Places a `width` x `height` part at the origin of rectangle `index`.
    ///
    /// Consumes the set and returns the successor together with the placed
    /// rectangle and the cuts the split records.
    pub fn place(mut self, index: usize, width: f64, height: f64) -> (Self, Rect, Vec<Cut>) {
        let free = self.rects.swap_remove(index);
        let placed = Rect::new(free.x, free.y, width, height);
        let (children, cuts) = split(&free, width, height, self.kerf);
        self.rects
            .extend(children.into_iter().flatten().filter(|r| !r.is_degenerate()));
        (self, placed, cuts)
    }

    /// Remaining free space with the trailing kerf removed.
    pub fn offcuts(&self) -> Vec<Rect> {
        self.rects
            .iter()
            .filter_map(|r| r.trim_trailing(self.kerf))
            .collect()
    }
}

/// Chooses the split axis that leaves the largest single leftover region.
///
/// Ties prefer the horizontal split.
pub fn choose_axis(free: &Rect, iw: f64, ih: f64) -> SplitAxis {
    let dw = free.width - iw;
    let dh = free.height - ih;
    // Horizontal: right strip is part height, bottom spans the full width.
    let horizontal = (dw * ih).max(free.width * dh);
    // Vertical: right strip spans the full height, bottom is part width.
    let vertical = (dw * free.height).max(iw * dh);
    if vertical > horizontal {
        SplitAxis::Vertical
    } else {
        SplitAxis::Horizontal
    }
}

/// Splits `free` around a part placed at its origin.
///
/// Returns the right and bottom remainders (inflated frame) and the cuts in
/// the order a saw would make them. A cut is recorded only if material
/// remains on its far side.
pub fn split(free: &Rect, width: f64, height: f64, kerf: f64) -> ([Option<Rect>; 2], Vec<Cut>) {
    let (iw, ih) = (width + kerf, height + kerf);
    let dw = free.width - iw;
    let dh = free.height - ih;
    let right_open = dw > EPSILON;
    let below_open = dh > EPSILON;
    let mut cuts = Vec::with_capacity(2);

    let (right, bottom) = match choose_axis(free, iw, ih) {
        SplitAxis::Horizontal => {
            if below_open {
                cuts.push(Cut::horizontal(free.x, free.y + height, free.width - kerf));
            }
            if right_open {
                cuts.push(Cut::vertical(free.x + width, free.y, height));
            }
            (
                Rect::new(free.x + iw, free.y, dw, ih),
                Rect::new(free.x, free.y + ih, free.width, dh),
            )
        }
        SplitAxis::Vertical => {
            if right_open {
                cuts.push(Cut::vertical(free.x + width, free.y, free.height - kerf));
            }
            if below_open {
                cuts.push(Cut::horizontal(free.x, free.y + height, width));
            }
            (
                Rect::new(free.x + iw, free.y, dw, free.height),
                Rect::new(free.x, free.y + ih, iw, dh),
            )
        }
    };

    (
        [
            Some(right).filter(|_| right_open),
            Some(bottom).filter(|_| below_open),
        ],
        cuts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use panelcut_core::geometry::Rotation;
    use panelcut_core::result::CutOrientation;

    #[test]
    fn test_empty_sheet_is_inflated() {
        let set = FreeRectSet::for_sheet(2750.0, 1830.0, 4.0);
        assert_eq!(set.rects(), &[Rect::new(0.0, 0.0, 2754.0, 1834.0)]);
        assert_eq!(set.offcuts(), vec![Rect::new(0.0, 0.0, 2750.0, 1830.0)]);
    }

    #[test]
    fn test_best_short_side_fit() {
        let set = FreeRectSet {
            rects: vec![
                Rect::new(0.0, 0.0, 500.0, 500.0),
                Rect::new(500.0, 0.0, 310.0, 900.0),
                Rect::new(0.0, 500.0, 100.0, 100.0),
            ],
            kerf: 0.0,
        };
        let upright = Orientation {
            rotation: Rotation::Deg0,
            width: 300.0,
            height: 400.0,
        };
        let turned = Orientation {
            rotation: Rotation::Deg90,
            width: 400.0,
            height: 300.0,
        };

        // 300 x 400 leaves 10 on the short side in the second rectangle
        let (index, o_index, score) = set.best_fit(&[turned, upright]).unwrap();
        assert_eq!((index, o_index), (1, 1));
        assert_relative_eq!(score.short_side, 10.0);

        let huge = Orientation {
            rotation: Rotation::Deg0,
            width: 600.0,
            height: 600.0,
        };
        assert!(set.best_fit(&[huge]).is_none());
    }

    #[test]
    fn test_split_prefers_larger_leftover() {
        // Wide free rect: the full-width bottom strip is the larger leftover
        let wide = Rect::new(0.0, 0.0, 1000.0, 400.0);
        assert_eq!(choose_axis(&wide, 900.0, 100.0), SplitAxis::Horizontal);

        // Tall free rect with a long, thin part: keep the full-height right strip
        let tall = Rect::new(0.0, 0.0, 400.0, 1000.0);
        assert_eq!(choose_axis(&tall, 100.0, 900.0), SplitAxis::Vertical);

        // Symmetric case ties toward horizontal
        let square = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(choose_axis(&square, 50.0, 50.0), SplitAxis::Horizontal);
    }

    #[test]
    fn test_split_with_kerf() {
        let free = Rect::new(0.0, 0.0, 2753.0, 1833.0);
        let ([right, bottom], cuts) = split(&free, 1000.0, 500.0, 3.0);

        // Horizontal split: bottom strip keeps the full width
        assert_eq!(right, Some(Rect::new(1003.0, 0.0, 1750.0, 503.0)));
        assert_eq!(bottom, Some(Rect::new(0.0, 503.0, 2753.0, 1330.0)));

        assert_eq!(cuts.len(), 2);
        assert_eq!(cuts[0].orientation, CutOrientation::Horizontal);
        assert_relative_eq!(cuts[0].y, 500.0);
        assert_relative_eq!(cuts[0].length, 2750.0);
        assert_eq!(cuts[1].orientation, CutOrientation::Vertical);
        assert_relative_eq!(cuts[1].x, 1000.0);
        assert_relative_eq!(cuts[1].length, 500.0);
    }

    #[test]
    fn test_exact_fit_records_no_cuts() {
        let set = FreeRectSet::for_sheet(600.0, 400.0, 3.0);
        let (set, placed, cuts) = set.place(0, 600.0, 400.0);
        assert_eq!(placed, Rect::new(0.0, 0.0, 600.0, 400.0));
        assert!(cuts.is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn test_place_replaces_consumed_rect() {
        let set = FreeRectSet::for_sheet(1000.0, 1000.0, 0.0);
        let (set, _, cuts) = set.place(0, 1000.0, 300.0);
        assert_eq!(set.len(), 1);
        assert_eq!(set.rects()[0], Rect::new(0.0, 300.0, 1000.0, 700.0));
        assert_eq!(cuts.len(), 1);
    }
}
