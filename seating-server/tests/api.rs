//! HTTP-level tests: the full router against a temporary SQLite database

use axum::Router;
use axum::body::Body;
use chrono::{Datelike, Local, Weekday};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use seating_server::{Config, ServerState, build_app};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

async fn test_app() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize(&config).await.unwrap();
    (dir, build_app(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// First `weekday` strictly after today
fn next(weekday: Weekday) -> String {
    let mut day = Local::now().date_naive().succ_opt().unwrap();
    while day.weekday() != weekday {
        day = day.succ_opt().unwrap();
    }
    day.format("%Y-%m-%d").to_string()
}

fn reservation_body(date: &str, people: i64) -> Value {
    json!({
        "data": {
            "first_name": "Rick",
            "last_name": "Sanchez",
            "mobile_number": "(202) 555-0164",
            "reservation_date": date,
            "reservation_time": "13:30",
            "people": people
        }
    })
}

async fn create_reservation(app: &Router, people: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/reservations",
        Some(reservation_body(&next(Weekday::Wed), people)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["reservation_id"].as_i64().unwrap()
}

async fn create_table(app: &Router, name: &str, capacity: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/tables",
        Some(json!({ "data": { "table_name": name, "capacity": capacity } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["table_id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_seat_and_clear_lifecycle() {
    let (_dir, app) = test_app().await;
    let reservation_id = create_reservation(&app, 4).await;
    let table_id = create_table(&app, "#1", 6).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/tables/{table_id}/seat"),
        Some(json!({ "data": { "reservation_id": reservation_id } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["reservation"]["status"], "seated");
    assert_eq!(body["data"]["table"]["reservation_id"], reservation_id);

    let (_, body) = send(&app, "GET", &format!("/reservations/{reservation_id}"), None).await;
    assert_eq!(body["data"]["status"], "seated");

    let (_, body) = send(&app, "GET", "/tables?available=true", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, body) = send(&app, "DELETE", &format!("/tables/{table_id}/seat"), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["reservation"]["status"], "finished");
    assert!(body["data"]["table"]["reservation_id"].is_null());

    // finished reservations drop out of the day view
    let date = next(Weekday::Wed);
    let (status, _) = send(&app, "GET", &format!("/reservations?date={date}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &format!("/tables/{table_id}/seat"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "table is not occupied");
}

#[tokio::test]
async fn test_tuesday_reservation_rejected() {
    let (_dir, app) = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/reservations",
        Some(reservation_body(&next(Weekday::Tue), 2)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Restaurant is closed on Tuesdays.");
}

#[tokio::test]
async fn test_party_larger_than_table_rejected() {
    let (_dir, app) = test_app().await;
    let reservation_id = create_reservation(&app, 7).await;
    let table_id = create_table(&app, "#2", 6).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/tables/{table_id}/seat"),
        Some(json!({ "data": { "reservation_id": reservation_id } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "number of people exceeds table capacity");

    let (_, body) = send(&app, "GET", &format!("/tables/{table_id}"), None).await;
    assert!(body["data"]["reservation_id"].is_null());
}

#[tokio::test]
async fn test_status_endpoint() {
    let (_dir, app) = test_app().await;
    let reservation_id = create_reservation(&app, 2).await;
    let table_id = create_table(&app, "#3", 2).await;
    let status_uri = format!("/reservations/{reservation_id}/status");

    let (status, body) = send(
        &app,
        "PUT",
        &status_uri,
        Some(json!({ "data": { "status": "unknown" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "status unknown is invalid");

    send(
        &app,
        "PUT",
        &format!("/tables/{table_id}/seat"),
        Some(json!({ "data": { "reservation_id": reservation_id } })),
    )
    .await;
    let (status, body) = send(
        &app,
        "PUT",
        &status_uri,
        Some(json!({ "data": { "status": "finished" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "finished");

    let (status, body) = send(
        &app,
        "PUT",
        &status_uri,
        Some(json!({ "data": { "status": "finished" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "a finished reservation cannot be updated");

    // editing is closed too
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/reservations/{reservation_id}"),
        Some(reservation_body(&next(Weekday::Wed), 2)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "a finished reservation cannot be updated");

    let (_, body) = send(&app, "GET", &format!("/reservations/{reservation_id}"), None).await;
    assert_eq!(body["data"]["status"], "finished");
}

#[tokio::test]
async fn test_update_and_search() {
    let (_dir, app) = test_app().await;
    let reservation_id = create_reservation(&app, 2).await;

    let mut body = reservation_body(&next(Weekday::Thu), 5);
    body["data"]["reservation_time"] = json!("7:45pm");
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/reservations/{reservation_id}"),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["data"]["people"], 5);
    assert_eq!(updated["data"]["reservation_time"], "19:45:00");
    assert_eq!(updated["data"]["status"], "booked");

    let (status, found) = send(&app, "GET", "/reservations?mobile_number=555-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/reservations?mobile_number=999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut seated = reservation_body(&next(Weekday::Thu), 5);
    seated["data"]["status"] = json!("seated");
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/reservations/{reservation_id}"),
        Some(seated),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_errors() {
    let (_dir, app) = test_app().await;

    let (status, body) = send(&app, "POST", "/tables", Some(json!({ "table_name": "#9" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Body must have data property");

    let (status, body) = send(
        &app,
        "POST",
        "/tables",
        Some(json!({ "data": { "table_name": "X", "capacity": 2 } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "table_name");

    let (status, body) = send(&app, "GET", "/reservations/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "reservation_id 999 not found.");

    let (status, _) = send(&app, "GET", "/tables/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PATCH", "/tables", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, body) = send(&app, "GET", "/nowhere", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["code"], 9);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_bad_query_and_unknown_status_target() {
    let (_dir, app) = test_app().await;

    let (status, body) = send(&app, "GET", "/tables?available=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    let (status, body) = send(&app, "GET", "/reservations?date=2030-01-09&date=x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    // unknown reservation wins over a body without data
    let (status, body) = send(&app, "PUT", "/reservations/999/status", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "reservation_id 999 not found.");
}
