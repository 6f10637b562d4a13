//! Placement representation for positioned parts.

use crate::geometry::{Rotation, SpecId};
use crate::rect::Rect;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents the placement of one part unit on a sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The ID of the placed part.
    pub part_id: SpecId,

    /// Index of the originating part in the caller's part list.
    pub part_index: usize,

    /// Instance index (0-based) among the part's requested quantity.
    pub instance: usize,

    /// Left edge, along the sheet length.
    pub x: f64,

    /// Top edge, along the sheet width.
    pub y: f64,

    /// Placed extent along the sheet length (post-rotation).
    pub width: f64,

    /// Placed extent along the sheet width (post-rotation).
    pub height: f64,

    /// Rotation applied to the part.
    pub rotation: Rotation,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(
        part_id: SpecId,
        part_index: usize,
        instance: usize,
        rect: Rect,
        rotation: Rotation,
    ) -> Self {
        Self {
            part_id,
            part_index,
            instance,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            rotation,
        }
    }

    /// Returns the occupied rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Returns the placed area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns true if the part was turned by 90°.
    pub fn is_rotated(&self) -> bool {
        self.rotation == Rotation::Deg90
    }
}

/// Placement statistics for a set of placements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Number of placements turned by 90°.
    pub rotated_count: usize,
    /// Placed units per part index.
    pub part_distribution: HashMap<usize, usize>,
    /// Placements per sheet (index into the layout's sheet list).
    pub sheet_distribution: HashMap<usize, usize>,
}

impl PlacementStats {
    /// Computes statistics from placements grouped by sheet.
    pub fn from_sheets<'a>(sheets: impl IntoIterator<Item = &'a [Placement]>) -> Self {
        let mut stats = Self::default();

        for (sheet_idx, placements) in sheets.into_iter().enumerate() {
            stats.count += placements.len();
            for p in placements {
                if p.is_rotated() {
                    stats.rotated_count += 1;
                }
                *stats.part_distribution.entry(p.part_index).or_insert(0) += 1;
            }
            stats.sheet_distribution.insert(sheet_idx, placements.len());
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(part_index: usize, rotation: Rotation) -> Placement {
        Placement::new(
            format!("P{}", part_index),
            part_index,
            0,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            rotation,
        )
    }

    #[test]
    fn test_placement_rect() {
        let p = Placement::new(
            "A".to_string(),
            0,
            1,
            Rect::new(10.0, 20.0, 300.0, 200.0),
            Rotation::Deg90,
        );
        assert_eq!(p.rect(), Rect::new(10.0, 20.0, 300.0, 200.0));
        assert_eq!(p.area(), 60000.0);
        assert!(p.is_rotated());
    }

    #[test]
    fn test_placement_stats() {
        let sheet_a = vec![placement(0, Rotation::Deg0), placement(1, Rotation::Deg90)];
        let sheet_b = vec![placement(0, Rotation::Deg0)];

        let stats = PlacementStats::from_sheets([sheet_a.as_slice(), sheet_b.as_slice()]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.rotated_count, 1);
        assert_eq!(stats.part_distribution.get(&0), Some(&2));
        assert_eq!(stats.part_distribution.get(&1), Some(&1));
        assert_eq!(stats.sheet_distribution.get(&1), Some(&1));
    }
}
