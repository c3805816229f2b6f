//! Error types for the export endpoint

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sprintsheet_core::UpsertError;

use crate::envelope::Envelope;

/// Request failure, rendered as an error envelope
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No `data` query parameter
    #[error("No data parameter found.")]
    MissingData,

    /// `data` is not a sprint record
    #[error("invalid payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Workbook lock not acquired in time
    #[error("Workbook is busy; lock not acquired within {} ms.", .0.as_millis())]
    Busy(Duration),

    /// Export sent as POST
    #[error("Please use the browser-based Export link (GET request).")]
    WrongMethod,

    /// Upsert rejected or store failed
    #[error(transparent)]
    Upsert(#[from] UpsertError),

    /// Blocking worker panicked or was cancelled
    #[error("update worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// Error envelope carrying this error's message
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::error(self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // status is always 200; the outcome travels in the body
        (StatusCode::OK, Json(self.envelope())).into_response()
    }
}
