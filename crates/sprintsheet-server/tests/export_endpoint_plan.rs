//! Functional tests for the `/exec` export endpoint.
//!
//! These send requests through the router and check the contract the
//! dashboard's export link depends on:
//! - Every outcome comes back as a `{status, updated}` envelope with HTTP 200.
//! - A request that cannot take the workbook lock is turned away untouched.
//! - Applied records reach the workbook file.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use sprintsheet_core::Dispatcher;
use sprintsheet_grid::{CellValue, FileBook, MemoryBook, Sheet, Workbook};
use sprintsheet_server::{export_link, payload_of, router, ApiError, AppState, Envelope, Status};
use sprintsheet_test_utils::{at, sample_payload, team_stats_book};
use tower::ServiceExt;
use url::form_urlencoded;

fn state(book: MemoryBook) -> AppState<MemoryBook> {
    AppState::new(book, Dispatcher::team_stats().unwrap())
}

fn data_query(data: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(data.as_bytes()).collect();
    format!("?data={encoded}")
}

async fn send<B>(state: &AppState<B>, method: Method, uri: &str) -> Envelope
where
    B: Workbook + Send + 'static,
{
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn call<B>(state: &AppState<B>, data: Option<&str>) -> Envelope
where
    B: Workbook + Send + 'static,
{
    let query = data.map(data_query).unwrap_or_default();
    send(state, Method::GET, &format!("/exec{query}")).await
}

/// Tenet: a valid export answers with the success envelope.
///
/// The browser shows the `updated` text verbatim, so it must name the key.
#[tokio::test]
async fn export_answers_success_envelope() {
    let state = state(team_stats_book(1));
    let envelope = call(&state, Some(&sample_payload("Iteration 7"))).await;
    assert_eq!(envelope, Envelope::success("Updated stats for IR07"));

    let book = state.book().lock().await;
    let grid = book.sheet("Team Stats").unwrap();
    assert_eq!(grid.value(at("D10")), CellValue::Number(8.0));
    assert_eq!(grid.value(at("D40")), CellValue::Number(0.5));
}

/// Tenet: request errors come back as error envelopes, not transport errors.
#[tokio::test]
async fn request_errors_are_enveloped() {
    let state = state(team_stats_book(1));

    let missing = call(&state, None).await;
    assert_eq!(missing, Envelope::error("No data parameter found."));

    let bad_key = call(&state, Some(r#"{"sprintName":"Sprint Review"}"#)).await;
    assert_eq!(
        bad_key,
        Envelope::error("Could not parse sprint key (e.g. IR21) from name: Sprint Review")
    );

    let numeric_name = call(&state, Some(r#"{"sprintName":21}"#)).await;
    assert_eq!(
        numeric_name.updated,
        "Could not parse sprint key (e.g. IR21) from name: 21"
    );

    let null_name = call(&state, Some(r#"{"sprintName":null}"#)).await;
    assert_eq!(
        null_name.updated,
        "Could not parse sprint key (e.g. IR21) from name: null"
    );

    let no_name = call(&state, Some("{}")).await;
    assert_eq!(
        no_name.updated,
        "Could not parse sprint key (e.g. IR21) from name: undefined"
    );

    let garbage = call(&state, Some("not json")).await;
    assert_eq!(garbage.status, Status::Error);

    assert_eq!(state.book().lock().await.flush_count(), 0);
}

/// Tenet: a workbook without the target sheet is reported by name.
#[tokio::test]
async fn missing_sheet_is_enveloped() {
    let state = state(MemoryBook::new());
    let envelope = call(&state, Some(&sample_payload("IR07"))).await;
    assert_eq!(envelope, Envelope::error("Sheet 'Team Stats' not found."));
}

/// Tenet: POST is refused with a pointer to the export link.
#[tokio::test]
async fn post_is_refused() {
    let state = state(team_stats_book(1));
    let uri = format!("/exec{}", data_query(&sample_payload("IR07")));
    let envelope = send(&state, Method::POST, &uri).await;
    assert_eq!(
        envelope,
        Envelope::error("Please use the browser-based Export link (GET request).")
    );
    assert_eq!(state.book().lock().await.flush_count(), 0);
}

/// Tenet: any query string shape still yields an envelope.
///
/// A link carrying `data` twice applies the first value; a link with no
/// `data` at all, or one with stray parameters, is answered in the body.
#[tokio::test]
async fn odd_query_strings_are_enveloped() {
    let state = state(team_stats_book(1));

    let first = data_query(&sample_payload("Iteration 7"));
    let twice = send(&state, Method::GET, &format!("/exec{first}&data=x")).await;
    assert_eq!(twice, Envelope::success("Updated stats for IR07"));

    let stray = send(&state, Method::GET, "/exec?team=core&data").await;
    assert_eq!(stray, Envelope::error("No data parameter found."));

    let garbled = send(&state, Method::GET, "/exec?data=%ZZ").await;
    assert_eq!(garbled.status, Status::Error);

    assert_eq!(state.book().lock().await.flush_count(), 1);
}

/// Tenet: a percent field sent as null lands as zero, an absent one as blank.
#[tokio::test]
async fn null_percent_writes_zero() {
    let state = state(team_stats_book(7));
    let envelope = call(&state, Some(r#"{"sprintName":"IR07","carryover":null}"#)).await;
    assert!(envelope.is_success());

    let book = state.book().lock().await;
    let grid = book.sheet("Team Stats").unwrap();
    assert_eq!(grid.value(at("D34")), CellValue::Number(0.0));
    assert_eq!(grid.value(at("B34")), CellValue::Empty);
}

/// Tenet: a request that cannot take the lock in time never touches the book.
///
/// While another holder keeps the workbook locked, the export must give up
/// after the configured timeout and answer with the busy envelope.
#[tokio::test]
async fn busy_workbook_rejects_request() {
    let state = state(team_stats_book(1)).with_lock_timeout(Duration::from_millis(50));
    let held = state.book().clone().lock_owned().await;

    let result = state.export(Some(sample_payload("Iteration 7"))).await;
    assert!(matches!(result, Err(ApiError::Busy(t)) if t == Duration::from_millis(50)));

    drop(held);
    assert_eq!(state.book().lock().await.flush_count(), 0);

    let retry = call(&state, Some(&sample_payload("Iteration 7"))).await;
    assert!(retry.is_success());
}

/// Tenet: concurrent exports are serialized, not lost.
#[tokio::test]
async fn concurrent_exports_all_apply() {
    let state = state(team_stats_book(1));
    let tasks: Vec<_> = (1..=5)
        .map(|n| {
            let state = state.clone();
            tokio::spawn(async move { state.export(Some(sample_payload(&format!("IR0{n}")))).await })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }
    assert_eq!(state.book().lock().await.flush_count(), 5);
}

/// Tenet: exports against a file workbook are durable once answered.
#[tokio::test]
async fn file_workbook_is_flushed_per_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");
    FileBook::create(&path, team_stats_book(1)).unwrap();

    let state = AppState::new(FileBook::open(&path).unwrap(), Dispatcher::team_stats().unwrap());
    let envelope = call(&state, Some(&sample_payload("Iteration 7"))).await;
    assert!(envelope.is_success());

    let reopened = FileBook::open(&path).unwrap();
    let grid = reopened.book().sheet("Team Stats").unwrap();
    assert_eq!(grid.value(at("B62")), CellValue::Number(40.0));
    assert_eq!(grid.value(at("M9")), CellValue::Number(0.85));
}

/// Tenet: the export link carries the payload the endpoint decodes.
#[tokio::test]
async fn export_link_feeds_endpoint() {
    let webhook = url::Url::parse("https://stats.example.com/exec").unwrap();
    let payload: serde_json::Value = serde_json::from_str(&sample_payload("Iteration 7")).unwrap();
    let link = export_link(&webhook, &payload).unwrap();

    let state = state(team_stats_book(1));
    let envelope = call(&state, payload_of(&link).as_deref()).await;
    assert_eq!(envelope, Envelope::success("Updated stats for IR07"));
}
