//! Sprintsheet Core
//!
//! Locates a sprint's row or column in the team stats sheet and upserts its
//! metrics there.
//!
//! # Core Concepts
//!
//! - [`SprintKey`]: canonical sprint token parsed from a free-text name
//! - [`locate_in_row`] / [`locate_in_column`]: first-match key lookup in a window
//! - [`Layout`]: ordered rule table plus static writes, checked for overlaps
//! - [`Dispatcher`]: runs a [`Layout`] for one [`SprintRecord`] and flushes
//!
//! # Example
//!
//! ```rust
//! use sprintsheet_core::{Dispatcher, Field, SprintRecord};
//! use sprintsheet_grid::{CellAddress, Grid, MemoryBook};
//!
//! let a10: CellAddress = "A10".parse().unwrap();
//! let mut book = MemoryBook::new().with_sheet("Team Stats", Grid::new().with(a10, "IR07"));
//!
//! let record = SprintRecord::named("Iteration 7").with(Field::Velocity, 8.0);
//! let outcome = Dispatcher::team_stats()?.apply(&mut book, &record)?;
//! assert_eq!(outcome.message(), "Updated stats for IR07");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod dispatch;
mod error;
mod key;
mod locator;
mod record;
mod rules;

// Re-exports
pub use dispatch::{Dispatcher, Outcome, RuleHit};
pub use error::{LayoutError, LocateError, UpsertError};
pub use key::SprintKey;
pub use locator::{locate, locate_in_column, locate_in_row, Axis, Window};
pub use record::{Field, SprintRecord};
pub use rules::{scaffold, FieldSpec, Layout, Scale, StaticGroup, UpdateRule, TEAM_STATS_SHEET};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
