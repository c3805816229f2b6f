//! Sprintsheet Server
//!
//! HTTP export endpoint in front of the upsert engine.
//!
//! # Core Concepts
//!
//! - [`ServerConfig`]: listen address, workbook path, sheet, lock timeout
//! - [`AppState`] / [`router`]: workbook behind a timed lock, served by axum
//! - [`Envelope`]: `{"status", "updated"}` response body
//! - [`export_link`]: the link the dashboard hands to browsers

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod app;
mod config;
mod envelope;
mod error;
mod link;

// Re-exports
pub use app::{apply_payload, export, healthz, reject_post, router, AppState, Health};
pub use config::{ServerConfig, DEFAULT_LOCK_TIMEOUT};
pub use envelope::{Envelope, Status};
pub use error::ApiError;
pub use link::{data_param, export_link, payload_of};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
