//! Part expansion: one placeable unit per requested copy.

use panelcut_core::geometry::{Grain, PartSpec, Rotation};
use panelcut_core::solver::SortStrategy;

/// A single unit rectangle to place.
///
/// When a part has quantity > 1, it expands into multiple units. Each unit
/// keeps the index of its originating part so unplaced units can be reported
/// against the caller's list.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPart {
    /// Index into the parts array.
    pub part_index: usize,
    /// Instance number within this part's quantity.
    pub instance: usize,
    /// Part length.
    pub length: f64,
    /// Part width.
    pub width: f64,
    /// Grain constraint of the part.
    pub grain: Grain,
    /// Rotation to try first, when legal.
    pub preferred: Option<Rotation>,
}

/// A candidate orientation with its placed extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Rotation applied.
    pub rotation: Rotation,
    /// Extent along the sheet length.
    pub width: f64,
    /// Extent along the sheet width.
    pub height: f64,
}

impl UnitPart {
    /// Area of the unit.
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Returns true if the unit may be turned either way.
    pub fn is_rotatable(&self, allow_rotation: bool) -> bool {
        self.grain.allowed_rotations(allow_rotation).len() > 1
    }

    /// Legal orientations, the preferred one first.
    pub fn orientations(&self, allow_rotation: bool) -> Vec<Orientation> {
        let mut rotations: Vec<Rotation> = self.grain.allowed_rotations(allow_rotation).to_vec();
        if let Some(preferred) = self.preferred {
            if let Some(pos) = rotations.iter().position(|&r| r == preferred) {
                rotations[..=pos].rotate_right(1);
            }
        }
        rotations
            .into_iter()
            .map(|rotation| {
                let (width, height) = match rotation {
                    Rotation::Deg0 => (self.length, self.width),
                    Rotation::Deg90 => (self.width, self.length),
                };
                Orientation {
                    rotation,
                    width,
                    height,
                }
            })
            .collect()
    }

    /// Sort key under `strategy` (larger first).
    pub fn sort_key(&self, strategy: SortStrategy) -> f64 {
        strategy.key(self.length, self.width)
    }
}

/// Expands each part by its quantity, in input order.
///
/// Zero-quantity parts produce no units.
pub fn expand_parts(parts: &[PartSpec]) -> Vec<UnitPart> {
    let total: usize = parts.iter().map(|p| p.quantity).sum();
    let mut units = Vec::with_capacity(total);
    for (part_index, part) in parts.iter().enumerate() {
        for instance in 0..part.quantity {
            units.push(UnitPart {
                part_index,
                instance,
                length: part.length,
                width: part.width,
                grain: part.grain,
                preferred: None,
            });
        }
    }
    units
}

/// Stable descending sort of units by `strategy`.
pub fn sort_units(units: &mut [UnitPart], strategy: SortStrategy) {
    units.sort_by(|a, b| b.sort_key(strategy).total_cmp(&a.sort_key(strategy)));
}
