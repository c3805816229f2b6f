//! Sparse sheet storage
//!
//! [`Grid`] keeps only non-blank cells, keyed by address in row-major order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::{CellAddress, CellRange};
use crate::book::Sheet;
use crate::value::{CellValue, Color};

/// Contents and style of one cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Stored scalar
    #[serde(default, skip_serializing_if = "CellValue::is_empty")]
    pub value: CellValue,
    /// Background fill, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

impl Cell {
    /// Cell holding a value with no styling
    #[inline]
    pub fn with_value(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            background: None,
        }
    }

    /// Check if the cell carries neither value nor style
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.background.is_none()
    }
}

/// In-memory sheet
///
/// Serializes as a JSON object keyed by A1 address:
/// `{"A4": {"value": "IR01"}, "B4": {"value": 3, "background": "#fff2cc"}}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: BTreeMap<CellAddress, Cell>,
}

impl Grid {
    /// Create empty grid
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Background at address
    #[inline]
    #[must_use]
    pub fn background(&self, at: CellAddress) -> Option<Color> {
        self.cells.get(&at).and_then(|c| c.background)
    }

    /// Number of non-blank cells
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if grid has no cells
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate non-blank cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &Cell)> {
        self.cells.iter().map(|(at, cell)| (*at, cell))
    }

    /// Builder-style value assignment, for fixtures and scaffolding
    #[must_use]
    pub fn with(mut self, at: CellAddress, value: impl Into<CellValue>) -> Self {
        self.set_value(at, value.into());
        self
    }

    fn update(&mut self, at: CellAddress, f: impl FnOnce(&mut Cell)) {
        let cell = self.cells.entry(at).or_default();
        f(cell);
        if cell.is_blank() {
            self.cells.remove(&at);
        }
    }
}

impl Sheet for Grid {
    fn value(&self, at: CellAddress) -> CellValue {
        self.cells
            .get(&at)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, at: CellAddress, value: CellValue) {
        self.update(at, |cell| cell.value = value);
    }

    fn set_background(&mut self, range: CellRange, color: Color) {
        for at in range.cells() {
            self.update(at, |cell| cell.background = Some(color));
        }
    }
}
