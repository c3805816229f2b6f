//! Cell addressing
//!
//! Provides [`CellAddress`] and [`CellRange`], 1-based coordinates with
//! A1-notation parsing and rendering.

use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Largest column the store accepts (`XFD`)
pub const MAX_COLUMN: u32 = 16_384;

/// Largest row the store accepts
pub const MAX_ROW: u32 = 1_048_576;

/// Position of a single cell
///
/// Rows and columns are 1-based; ordering is row-major.
///
/// # Examples
/// - `(4, 1)` → `A4`
/// - `(3, 29)` → `AC3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellAddress {
    row: u32,
    col: u32,
}

impl CellAddress {
    /// Create address from 1-based row and column
    ///
    /// Returns `None` for a zero coordinate or one past the sheet limits.
    #[inline]
    #[must_use]
    pub fn new(row: u32, col: u32) -> Option<Self> {
        ((1..=MAX_ROW).contains(&row) && (1..=MAX_COLUMN).contains(&col)).then_some(Self { row, col })
    }

    /// Row number (1-based)
    #[inline]
    #[must_use]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column number (1-based)
    #[inline]
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Same column, another row
    #[inline]
    #[must_use]
    pub fn with_row(self, row: u32) -> Option<Self> {
        Self::new(row, self.col)
    }

    /// Same row, another column
    #[inline]
    #[must_use]
    pub fn with_col(self, col: u32) -> Option<Self> {
        Self::new(self.row, col)
    }
}

impl Display for CellAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.col), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean = s.trim().replace('$', "");
        let split = clean
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| GridError::InvalidAddress(s.to_string()))?;
        let (letters, digits) = clean.split_at(split);

        let col = column_index(letters).ok_or_else(|| GridError::InvalidAddress(s.to_string()))?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GridError::InvalidAddress(s.to_string()));
        }
        let row: u32 = digits
            .parse()
            .map_err(|_| GridError::InvalidAddress(s.to_string()))?;

        Self::new(row, col).ok_or_else(|| GridError::InvalidAddress(s.to_string()))
    }
}

impl TryFrom<String> for CellAddress {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellAddress> for String {
    fn from(value: CellAddress) -> Self {
        value.to_string()
    }
}

/// Convert column letters to a 1-based index (`A` → 1, `AC` → 29)
///
/// Case-insensitive. Returns `None` for empty input, non-letters, or a column
/// past [`MAX_COLUMN`].
#[must_use]
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = u32::from(ch.to_ascii_uppercase() as u8 - b'A' + 1);
        col = col.checked_mul(26)?.checked_add(digit)?;
        if col > MAX_COLUMN {
            return None;
        }
    }
    Some(col)
}

/// Convert a 1-based column index to letters (29 → `AC`)
#[must_use]
pub fn column_name(col: u32) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, fits in u8
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Rectangular block of cells, inclusive on both corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    start: CellAddress,
    end: CellAddress,
}

impl CellRange {
    /// Create range from two opposite corners, in any order
    #[must_use]
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress {
                row: a.row.min(b.row),
                col: a.col.min(b.col),
            },
            end: CellAddress {
                row: a.row.max(b.row),
                col: a.col.max(b.col),
            },
        }
    }

    /// Range covering one cell
    #[inline]
    #[must_use]
    pub fn single(at: CellAddress) -> Self {
        Self { start: at, end: at }
    }

    /// Top-left corner
    #[inline]
    #[must_use]
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// Bottom-right corner
    #[inline]
    #[must_use]
    pub fn end(&self) -> CellAddress {
        self.end
    }

    /// Row numbers covered
    #[inline]
    #[must_use]
    pub fn rows(&self) -> RangeInclusive<u32> {
        self.start.row..=self.end.row
    }

    /// Column numbers covered
    #[inline]
    #[must_use]
    pub fn cols(&self) -> RangeInclusive<u32> {
        self.start.col..=self.end.col
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// True when the range spans exactly one row
    #[inline]
    #[must_use]
    pub fn is_single_row(&self) -> bool {
        self.start.row == self.end.row
    }

    /// True when the range spans exactly one column
    #[inline]
    #[must_use]
    pub fn is_single_column(&self) -> bool {
        self.start.col == self.end.col
    }

    /// Check if address lies inside the range
    #[inline]
    #[must_use]
    pub fn contains(&self, at: CellAddress) -> bool {
        self.rows().contains(&at.row) && self.cols().contains(&at.col)
    }

    /// Check if two ranges share at least one cell
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    /// Smallest range covering both
    #[must_use]
    pub fn union(&self, other: &CellRange) -> CellRange {
        CellRange::new(
            CellAddress {
                row: self.start.row.min(other.start.row),
                col: self.start.col.min(other.start.col),
            },
            CellAddress {
                row: self.end.row.max(other.end.row),
                col: self.end.col.max(other.end.col),
            },
        )
    }

    /// Iterate addresses in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> + '_ {
        self.rows()
            .flat_map(move |row| self.cols().map(move |col| CellAddress { row, col }))
    }
}

impl Display for CellRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(GridError::InvalidRange(s.to_string()));
        }

        let bad = |_: GridError| GridError::InvalidRange(s.to_string());
        let a: CellAddress = first.parse().map_err(bad)?;
        let b = match second {
            Some(other) => other.parse().map_err(bad)?,
            None => a,
        };
        Ok(Self::new(a, b))
    }
}

impl From<CellAddress> for CellRange {
    fn from(value: CellAddress) -> Self {
        Self::single(value)
    }
}
