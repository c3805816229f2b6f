//! Key lookup inside a one-dimensional search window
//!
//! Vertical tables keep their sprint keys down one column and the locator
//! returns the row of the hit; horizontal tables keep them along one row and
//! the locator returns the column. Cells compare with
//! [`CellValue::loosely_equals`], and the first match wins.

use std::fmt::{self, Display, Formatter};

use sprintsheet_grid::{CellAddress, CellRange, CellValue, Sheet};

use crate::error::LocateError;
use crate::key::SprintKey;

/// Scan direction of a search window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Keys down a column; a hit yields a row
    Vertical,
    /// Keys along a row; a hit yields a column
    Horizontal,
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertical => "vertically",
            Self::Horizontal => "horizontally",
        })
    }
}

/// Search window checked to be a single row or single column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    range: CellRange,
    axis: Axis,
}

impl Window {
    /// Validate a range for scanning
    ///
    /// A single cell may be scanned either way. Anything wider than one
    /// row and one column is rejected.
    pub fn new(range: CellRange, axis: Axis) -> Result<Self, LocateError> {
        let fits = match axis {
            Axis::Vertical => range.is_single_column(),
            Axis::Horizontal => range.is_single_row(),
        };
        if fits {
            Ok(Self { range, axis })
        } else {
            Err(LocateError::NotOneDimensional(range))
        }
    }

    /// Scanned range
    #[inline]
    #[must_use]
    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Scan direction
    #[inline]
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// First coordinate along the scan direction
    #[inline]
    #[must_use]
    pub fn base(&self) -> u32 {
        match self.axis {
            Axis::Vertical => self.range.start().row(),
            Axis::Horizontal => self.range.start().col(),
        }
    }

    /// Fixed coordinate across the scan direction (the key column or key row)
    #[inline]
    #[must_use]
    pub fn lane(&self) -> u32 {
        match self.axis {
            Axis::Vertical => self.range.start().col(),
            Axis::Horizontal => self.range.start().row(),
        }
    }

    /// Address of the `i`-th cell from the start of the window
    #[must_use]
    pub fn slot(&self, i: u32) -> Option<CellAddress> {
        let start = self.range.start();
        let at = match self.axis {
            Axis::Vertical => start.with_row(start.row().checked_add(i)?)?,
            Axis::Horizontal => start.with_col(start.col().checked_add(i)?)?,
        };
        self.range.contains(at).then_some(at)
    }

    /// Number of cells scanned
    #[inline]
    #[must_use]
    pub fn len(&self) -> u32 {
        match self.axis {
            Axis::Vertical => self.range.height(),
            Axis::Horizontal => self.range.width(),
        }
    }

    /// Always false; a window holds at least one cell
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Column of the first cell in a single-row range equal to `key`
pub fn locate_in_row<S: Sheet + ?Sized>(
    sheet: &S,
    range: CellRange,
    key: &str,
) -> Result<Option<u32>, LocateError> {
    let window = Window::new(range, Axis::Horizontal)?;
    Ok(scan(sheet, &window, key))
}

/// Row of the first cell in a single-column range equal to `key`
pub fn locate_in_column<S: Sheet + ?Sized>(
    sheet: &S,
    range: CellRange,
    key: &str,
) -> Result<Option<u32>, LocateError> {
    let window = Window::new(range, Axis::Vertical)?;
    Ok(scan(sheet, &window, key))
}

/// Absolute row (vertical) or column (horizontal) of the key in the window
pub fn locate<S: Sheet + ?Sized>(sheet: &S, window: &Window, key: &SprintKey) -> Option<u32> {
    scan(sheet, window, key.as_str())
}

fn scan<S: Sheet + ?Sized>(sheet: &S, window: &Window, key: &str) -> Option<u32> {
    let values = sheet.values(window.range());
    let lane: Vec<&CellValue> = match window.axis() {
        Axis::Vertical => values.iter().filter_map(|row| row.first()).collect(),
        Axis::Horizontal => values.first().map(|row| row.iter().collect()).unwrap_or_default(),
    };
    let hit = lane.iter().position(|value| value.loosely_equals(key))?;
    // window length is bounded by the sheet size, so the index fits
    let offset = u32::try_from(hit).ok()?;
    Some(window.base() + offset)
}
