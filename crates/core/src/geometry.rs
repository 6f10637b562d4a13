//! Part and stock sheet specifications.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a part or sheet type, as supplied by the caller.
pub type SpecId = String;

/// Grain constraint of a part.
///
/// The grain dictates which sheet axis the part's length must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Grain {
    /// No constraint; the part may be rotated if rotation is enabled.
    #[default]
    Any,
    /// Part length runs along the sheet length (always 0°).
    Length,
    /// Part length runs along the sheet width (always 90°).
    Width,
}

/// Rotation of a placed part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// Part length along the sheet length.
    #[default]
    Deg0,
    /// Part length along the sheet width.
    Deg90,
}

impl Rotation {
    /// Returns the rotation angle in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
        }
    }

    /// Returns the other rotation.
    pub fn flipped(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg0,
        }
    }
}

impl Grain {
    /// Rotations legal for this grain, in preference order.
    pub fn allowed_rotations(self, allow_rotation: bool) -> &'static [Rotation] {
        match self {
            Grain::Length => &[Rotation::Deg0],
            Grain::Width => &[Rotation::Deg90],
            Grain::Any if allow_rotation => &[Rotation::Deg0, Rotation::Deg90],
            Grain::Any => &[Rotation::Deg0],
        }
    }
}

/// Lamination class of a part; decides the edge-banding thickness class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LaminationType {
    /// Single board.
    #[default]
    None,
    /// Board laminated onto a backer.
    WithBacker,
    /// Two boards of the same material laminated together.
    SameBoard,
    /// Any other build-up.
    Custom,
}

/// Edge-banding thickness class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BandingClass {
    /// 16mm banding for single boards.
    Mm16,
    /// 32mm banding for laminated boards.
    Mm32,
}

impl LaminationType {
    /// Banding class used for parts of this lamination type.
    pub fn banding_class(self) -> BandingClass {
        match self {
            LaminationType::None => BandingClass::Mm16,
            _ => BandingClass::Mm32,
        }
    }
}

/// Edges of a part that require banding.
///
/// `top` and `bottom` run along the part length, `left` and `right` along
/// the part width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EdgeBanding {
    /// First long edge.
    pub top: bool,
    /// Second long edge.
    pub bottom: bool,
    /// First short edge.
    pub left: bool,
    /// Second short edge.
    pub right: bool,
}

impl EdgeBanding {
    /// No banded edges.
    pub fn none() -> Self {
        Self::default()
    }

    /// All four edges banded.
    pub fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }

    /// Banded length for one part with the given dimensions.
    pub fn banded_length(&self, length: f64, width: f64) -> f64 {
        let long_edges = self.top as u8 + self.bottom as u8;
        let short_edges = self.left as u8 + self.right as u8;
        f64::from(long_edges) * length + f64::from(short_edges) * width
    }

    /// Returns true if any edge is banded.
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// A rectangular part to be cut, with its requested quantity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartSpec {
    /// Caller-supplied identifier.
    pub id: SpecId,
    /// Length (the grain-bearing dimension).
    pub length: f64,
    /// Width.
    pub width: f64,
    /// Number of copies to cut.
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: usize,
    /// Grain constraint.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grain: Grain,
    /// Banded edges.
    #[cfg_attr(feature = "serde", serde(default))]
    pub edge_banding: EdgeBanding,
    /// Lamination class.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lamination: LaminationType,
}

#[cfg(feature = "serde")]
fn default_quantity() -> usize {
    1
}

impl PartSpec {
    /// Creates a part with quantity 1, no grain, banding or lamination.
    pub fn new(id: impl Into<SpecId>, length: f64, width: f64) -> Self {
        Self {
            id: id.into(),
            length,
            width,
            quantity: 1,
            grain: Grain::Any,
            edge_banding: EdgeBanding::none(),
            lamination: LaminationType::None,
        }
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the grain constraint.
    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = grain;
        self
    }

    /// Sets the banded edges.
    pub fn with_edge_banding(mut self, banding: EdgeBanding) -> Self {
        self.edge_banding = banding;
        self
    }

    /// Sets the lamination class.
    pub fn with_lamination(mut self, lamination: LaminationType) -> Self {
        self.lamination = lamination;
        self
    }

    /// Area of one unit.
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Perimeter of one unit.
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.length + self.width)
    }

    /// Placed extent `(along sheet length, along sheet width)` for a rotation.
    pub fn oriented(&self, rotation: Rotation) -> (f64, f64) {
        match rotation {
            Rotation::Deg0 => (self.length, self.width),
            Rotation::Deg90 => (self.width, self.length),
        }
    }

    /// Validates dimensions.
    pub fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(Error::InvalidPart(format!(
                "{}: length must be positive, got {}",
                self.id, self.length
            )));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(Error::InvalidPart(format!(
                "{}: width must be positive, got {}",
                self.id, self.width
            )));
        }
        Ok(())
    }
}

/// A stock sheet type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StockSheetSpec {
    /// Caller-supplied identifier.
    pub id: SpecId,
    /// Length (x axis of a layout).
    pub length: f64,
    /// Width (y axis of a layout).
    pub width: f64,
    /// Available sheets; `None` means unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub quantity: Option<usize>,
    /// Saw blade width.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kerf: f64,
}

impl StockSheetSpec {
    /// Creates an unlimited sheet type with zero kerf.
    pub fn new(id: impl Into<SpecId>, length: f64, width: f64) -> Self {
        Self {
            id: id.into(),
            length,
            width,
            quantity: None,
            kerf: 0.0,
        }
    }

    /// Limits the number of available sheets.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the kerf.
    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = kerf;
        self
    }

    /// Area of one sheet.
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Returns true if the sheet type has stock left to open.
    pub fn is_available(&self) -> bool {
        self.quantity.map_or(true, |q| q > 0)
    }

    /// Returns true if a `width` x `height` placement fits an empty sheet.
    pub fn accepts(&self, width: f64, height: f64) -> bool {
        width <= self.length + crate::rect::EPSILON && height <= self.width + crate::rect::EPSILON
    }

    /// Validates dimensions and kerf.
    pub fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(Error::InvalidSheet(format!(
                "{}: length must be positive, got {}",
                self.id, self.length
            )));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(Error::InvalidSheet(format!(
                "{}: width must be positive, got {}",
                self.id, self.width
            )));
        }
        if !self.kerf.is_finite() || self.kerf < 0.0 {
            return Err(Error::InvalidSheet(format!(
                "{}: kerf must be non-negative, got {}",
                self.id, self.kerf
            )));
        }
        Ok(())
    }
}

/// Validates a packing request.
///
/// Fails fast on malformed dimensions or when no sheet type has stock.
pub fn validate_inputs(parts: &[PartSpec], sheets: &[StockSheetSpec]) -> Result<()> {
    for part in parts {
        part.validate()?;
    }
    for sheet in sheets {
        sheet.validate()?;
    }
    if !sheets.iter().any(StockSheetSpec::is_available) {
        return Err(Error::NoUsableSheet);
    }
    Ok(())
}
