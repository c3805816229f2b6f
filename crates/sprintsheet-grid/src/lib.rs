//! Sprintsheet Grid
//!
//! Sparse, A1-addressed cell store that the upsert engine writes into.
//!
//! # Core Concepts
//!
//! - [`CellAddress`] / [`CellRange`]: 1-based coordinates with A1 notation
//! - [`CellValue`]: scalar cell contents with host-style loose equality
//! - [`Sheet`] / [`Workbook`]: the store seams
//! - [`MemoryBook`]: in-memory workbook
//! - [`FileBook`]: JSON-file workbook with atomic flush
//!
//! # Example
//!
//! ```rust
//! use sprintsheet_grid::{CellAddress, CellValue, Grid, MemoryBook, Sheet, Workbook};
//!
//! let a4: CellAddress = "A4".parse().unwrap();
//! let mut book = MemoryBook::new().with_sheet("Team Stats", Grid::new().with(a4, "IR01"));
//!
//! let sheet = book.sheet_mut("Team Stats").unwrap();
//! assert!(sheet.value(a4).loosely_equals("IR01"));
//! book.flush().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod address;
mod book;
mod error;
mod file;
mod grid;
mod value;

// Re-exports
pub use address::{column_index, column_name, CellAddress, CellRange, MAX_COLUMN, MAX_ROW};
pub use book::{MemoryBook, Sheet, Workbook};
pub use error::GridError;
pub use file::FileBook;
pub use grid::{Cell, Grid};
pub use value::{parse_loose_number, CellValue, Color};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
