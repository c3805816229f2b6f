//! HTTP surface of the export service
//!
//! `GET /exec?data=<json>` applies one sprint record under the workbook lock.
//! The lock is taken with a timeout; the upsert itself, including the flush,
//! runs on the blocking pool while the owned guard is held.
//!
//! The query string is read raw so that no shape of it can fail extraction:
//! the first `data` pair wins and every failure is answered with an envelope.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sprintsheet_core::{Dispatcher, Outcome, SprintRecord};
use sprintsheet_grid::Workbook;
use tokio::sync::Mutex;

use crate::config::DEFAULT_LOCK_TIMEOUT;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::link::data_param;

/// Shared state: the workbook behind its lock, plus the rule table
pub struct AppState<B> {
    book: Arc<Mutex<B>>,
    dispatcher: Arc<Dispatcher>,
    lock_timeout: Duration,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            book: Arc::clone(&self.book),
            dispatcher: Arc::clone(&self.dispatcher),
            lock_timeout: self.lock_timeout,
        }
    }
}

impl<B> AppState<B>
where
    B: Workbook + Send + 'static,
{
    /// Create state owning the workbook
    pub fn new(book: B, dispatcher: Dispatcher) -> Self {
        Self {
            book: Arc::new(Mutex::new(book)),
            dispatcher: Arc::new(dispatcher),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// With lock timeout
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Workbook handle
    #[inline]
    #[must_use]
    pub fn book(&self) -> &Arc<Mutex<B>> {
        &self.book
    }

    /// Apply a raw payload under the workbook lock
    pub async fn export(&self, data: Option<String>) -> Result<Outcome, ApiError> {
        let data = data.filter(|d| !d.is_empty()).ok_or(ApiError::MissingData)?;

        let guard = tokio::time::timeout(self.lock_timeout, Arc::clone(&self.book).lock_owned())
            .await
            .map_err(|_| ApiError::Busy(self.lock_timeout))?;

        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::task::spawn_blocking(move || {
            let mut book = guard;
            apply_payload(&mut *book, &dispatcher, &data)
        })
        .await?
    }
}

/// Decode a payload and apply it
pub fn apply_payload<W: Workbook + ?Sized>(
    book: &mut W,
    dispatcher: &Dispatcher,
    data: &str,
) -> Result<Outcome, ApiError> {
    let record: SprintRecord = serde_json::from_str(data)?;
    Ok(dispatcher.apply(book, &record)?)
}

/// Liveness report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `ok`
    pub status: String,
    /// Server version
    pub version: String,
}

/// Build the service router
pub fn router<B>(state: AppState<B>) -> Router
where
    B: Workbook + Send + 'static,
{
    Router::new()
        .route("/exec", get(export::<B>).post(reject_post))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// `GET /exec`
pub async fn export<B>(
    State(state): State<AppState<B>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Envelope>, ApiError>
where
    B: Workbook + Send + 'static,
{
    let data = query.as_deref().and_then(data_param);
    match state.export(data).await {
        Ok(outcome) => {
            tracing::info!("export applied: {}", outcome.key());
            Ok(Json(Envelope::success(outcome.message())))
        }
        Err(err) => {
            tracing::warn!("export rejected: {}", err);
            Err(err)
        }
    }
}

/// `POST /exec`
pub async fn reject_post() -> ApiError {
    ApiError::WrongMethod
}

/// `GET /healthz`
pub async fn healthz() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}
