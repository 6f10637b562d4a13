//! Sheet inventory: which sheet type to open next.

use crate::expand::Orientation;
use panelcut_core::geometry::StockSheetSpec;
use panelcut_core::result::UnplacedReason;

/// Remaining stock per sheet type.
#[derive(Debug, Clone)]
pub struct StockInventory<'a> {
    sheets: &'a [StockSheetSpec],
    remaining: Vec<Option<usize>>,
    opened: Vec<usize>,
}

impl<'a> StockInventory<'a> {
    /// Full inventory of the given sheet types.
    pub fn new(sheets: &'a [StockSheetSpec]) -> Self {
        Self {
            sheets,
            remaining: sheets.iter().map(|s| s.quantity).collect(),
            opened: vec![0; sheets.len()],
        }
    }

    /// The sheet type at `index`.
    pub fn spec(&self, index: usize) -> &'a StockSheetSpec {
        &self.sheets[index]
    }

    /// Opens the first sheet type, in declared order, with stock left that
    /// accepts one of `orientations`.
    ///
    /// Returns the sheet type index and the instance number of the new sheet.
    pub fn open_for(&mut self, orientations: &[Orientation]) -> Result<(usize, usize), UnplacedReason> {
        let accepts = |sheet: &StockSheetSpec| {
            orientations
                .iter()
                .any(|o| sheet.accepts(o.width, o.height))
        };

        for (index, sheet) in self.sheets.iter().enumerate() {
            if self.remaining[index] == Some(0) || !accepts(sheet) {
                continue;
            }
            if let Some(left) = self.remaining[index].as_mut() {
                *left -= 1;
            }
            let instance = self.opened[index];
            self.opened[index] += 1;
            return Ok((index, instance));
        }

        if self.sheets.iter().any(accepts) {
            Err(UnplacedReason::InsufficientStock)
        } else {
            Err(UnplacedReason::TooLargeForSheet)
        }
    }

    /// Returns the most recently opened sheet of type `index` to stock.
    ///
    /// Used when an opened sheet ends up holding nothing.
    pub fn release(&mut self, index: usize) {
        if self.opened[index] == 0 {
            return;
        }
        self.opened[index] -= 1;
        if let Some(left) = self.remaining[index].as_mut() {
            *left += 1;
        }
    }

    /// Number of sheets opened so far, per type.
    pub fn opened(&self) -> &[usize] {
        &self.opened
    }
}
