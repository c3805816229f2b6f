//! Error types for the upsert engine
//!
//! - [`LocateError`]: a search window that is not one row or one column
//! - [`LayoutError`]: a rule table that fails its construction checks
//! - [`UpsertError`]: request-time failures of [`crate::Dispatcher::apply`]
//!
//! The `Display` text of [`UpsertError`] is what clients see in the response
//! envelope, so its wording is part of the wire contract.

use sprintsheet_grid::{CellRange, GridError};

use crate::locator::Axis;

/// Window shape error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// Window spans more than one row and more than one column
    #[error("search window {0} is not a single row or column")]
    NotOneDimensional(CellRange),
}

/// Rule table construction error
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A1 literal in the table did not parse
    #[error("bad address in layout: {0}")]
    Address(#[from] GridError),

    /// Window shape rejected by the locator
    #[error("bad search window: {0}")]
    Window(#[from] LocateError),

    /// Window shape disagrees with the declared axis
    #[error("rule {rule}: window {window} cannot be scanned {axis}")]
    AxisMismatch {
        /// Rule name
        rule: &'static str,
        /// Declared window
        window: CellRange,
        /// Declared axis
        axis: Axis,
    },

    /// Rule writes nothing
    #[error("rule {0} has no fields")]
    NoFields(&'static str),

    /// Field target falls off the sheet
    #[error("rule {rule}: field offset {offset} leaves the sheet")]
    OffsetOutOfBounds {
        /// Rule name
        rule: &'static str,
        /// Offending offset
        offset: u32,
    },

    /// Scaffold numbering runs past the largest sprint number
    #[error("sprint numbers starting at {first} overflow after {slots} slots")]
    NumberOverflow {
        /// Requested first number
        first: u64,
        /// Slots in the longest key window
        slots: u32,
    },

    /// Two rules could write the same cell
    #[error("{first} and {second} both write into {overlap}")]
    Overlap {
        /// Earlier rule or group
        first: &'static str,
        /// Later rule or group
        second: &'static str,
        /// Shared region
        overlap: CellRange,
    },
}

/// Upsert failure
#[derive(Debug, thiserror::Error)]
pub enum UpsertError {
    /// Sprint name yields no key; carries the raw name as received
    #[error("Could not parse sprint key (e.g. IR21) from name: {0}")]
    InvalidSprintKey(String),

    /// Target sheet is missing from the workbook
    #[error("Sheet '{0}' not found.")]
    TableNotFound(String),

    /// Store write or flush failed
    #[error("store error: {0}")]
    Store(#[from] GridError),
}
