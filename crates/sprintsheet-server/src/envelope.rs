//! Response envelope
//!
//! Every `/exec` response, success or failure, is
//! `{"status": "success" | "error", "updated": "<message>"}`.

use serde::{Deserialize, Serialize};

/// Outcome flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Record applied
    Success,
    /// Record rejected
    Error,
}

/// Body returned to the export link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Outcome flag
    pub status: Status,
    /// Human-readable message
    pub updated: String,
}

impl Envelope {
    /// Success envelope
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            updated: message.into(),
        }
    }

    /// Error envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            updated: message.into(),
        }
    }

    /// Check if the record was applied
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
