//! End-to-end tests through the full router against an in-memory database

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use campus_server::db::{create_memory_pool, migrations};
use campus_server::{build_app, App, AppState, TokenKeys, DEFAULT_TOKEN_TTL};

const DAY: &str = "2099-06-01";

async fn app() -> App {
    let pool = create_memory_pool().await.unwrap();
    migrations::run(&pool).await.unwrap();
    let state = AppState::new(pool, TokenKeys::new("integration-secret", DEFAULT_TOKEN_TTL));
    build_app(state, false)
}

async fn send(
    app: &App,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn signup(app: &App, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": name, "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {}", body);
    body["jwtToken"].as_str().unwrap().to_string()
}

/// Decode the `userId` claim without verifying; the server already did.
fn user_id(token: &str) -> i64 {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let payload = token.split('.').nth(1).unwrap();
    let claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
    claims["userId"].as_i64().unwrap()
}

async fn create_room(app: &App, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/resources",
        Some(token),
        Some(json!({ "name": name, "type": "Room", "capacity": 20, "image_url": null })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["resource_id"].as_i64().unwrap()
}

async fn book(app: &App, token: &str, resource_id: i64, start: &str, end: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/bookings",
        Some(token),
        Some(json!({
            "resource_id": resource_id,
            "date": DAY,
            "start_time": start,
            "end_time": end
        })),
    )
    .await
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn signup_login_flow() {
    let app = app().await;
    signup(&app, "Alice", "Alice@Example.com").await;

    // Duplicate email, case-insensitive
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Other", "email": "alice@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Incorrect password");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User not found");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["jwtToken"].as_str().is_some());
}

#[tokio::test]
async fn signup_rejects_invalid_input() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": "Bob", "email": "not-an-email", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/resources", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid JWT Token");

    let (status, _) = send(&app, "GET", "/api/resources", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let other = TokenKeys::new("another-secret", DEFAULT_TOKEN_TTL).issue(1);
    let (status, _) = send(&app, "GET", "/api/analytics/usage", Some(&other), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn resource_crud() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;

    let id = create_room(&app, &token, "Seminar Room").await;

    // Alias path creates too
    let (status, _) = send(
        &app,
        "POST",
        "/api/resources/book",
        Some(&token),
        Some(json!({ "name": "Main Hall", "type": "Hall", "capacity": 300 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/api/resources", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/resources/{}/update", id),
        Some(&token),
        Some(json!({ "capacity": 35 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacity"], 35);
    assert_eq!(body["name"], "Seminar Room");
    assert_eq!(body["type"], "Room");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/resources/{}/update", id),
        Some(&token),
        Some(json!({ "capacity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/resources/search?query=semi", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/resources/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/resources/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/resources/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overlapping_booking_is_rejected() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let room = create_room(&app, &token, "Lab 1").await;

    let (status, body) = book(&app, &token, room, "09:00", "10:00").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "booked");

    let (status, body) = book(&app, &token, room, "09:30", "11:00").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("overlaps"));

    // Back-to-back is fine: intervals are half-open
    let (status, _) = book(&app, &token, room, "10:00", "11:00").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = book(&app, &token, room, "12:00", "11:00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = book(&app, &token, 999, "12:00", "13:00").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_in_the_past_is_rejected() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let room = create_room(&app, &token, "Lab 1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(&token),
        Some(json!({
            "resource_id": room,
            "date": "2000-01-01",
            "start_time": "09:00",
            "end_time": "10:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bookings_are_owner_only() {
    let app = app().await;
    let alice = signup(&app, "Alice", "alice@example.com").await;
    let bob = signup(&app, "Bob", "bob@example.com").await;
    let room = create_room(&app, &alice, "Lab 1").await;

    let (_, body) = book(&app, &alice, room, "09:00", "10:00").await;
    let booking = body["booking_id"].as_i64().unwrap();

    let (status, _) = send(&app, "GET", &format!("/api/bookings/{}", booking), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", &format!("/api/bookings/{}/cancel", booking), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/users/{}/bookings", user_id(&alice)),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/users/{}/bookings", user_id(&alice)),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["resource_name"], "Lab 1");
    assert_eq!(list[0]["resource_type"], "Room");
}

#[tokio::test]
async fn booking_status_transitions() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let room = create_room(&app, &token, "Lab 1").await;

    let (_, body) = book(&app, &token, room, "09:00", "10:00").await;
    let booking = body["booking_id"].as_i64().unwrap();

    let (status, body) = send(&app, "PUT", &format!("/api/bookings/{}/complete", booking), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    // Terminal states do not move
    let (status, _) = send(&app, "PUT", &format!("/api/bookings/{}/cancel", booking), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = book(&app, &token, room, "11:00", "12:00").await;
    let second = body["booking_id"].as_i64().unwrap();
    let (status, body) = send(&app, "PUT", &format!("/api/bookings/{}/cancel", second), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    // The cancelled slot is free again
    let (status, _) = book(&app, &token, room, "11:00", "12:00").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn cancelled_resource_refuses_bookings() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let room = create_room(&app, &token, "Lab 1").await;
    book(&app, &token, room, "09:00", "10:00").await;

    let (status, body) = send(&app, "PUT", &format!("/api/resources/{}/cancel", room), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cancelled_bookings"], 1);

    let (status, _) = book(&app, &token, room, "13:00", "14:00").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/resources/{}/availability?date={}", room, DAY),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["free"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, "PUT", &format!("/api/resources/{}/restore", room), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "available");

    let (status, _) = book(&app, &token, room, "13:00", "14:00").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn availability_lists_free_windows() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let room = create_room(&app, &token, "Lab 1").await;
    book(&app, &token, room, "10:00", "12:00").await;
    book(&app, &token, room, "14:00", "15:30").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/resources/{}/availability?date={}", room, DAY),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["open"], "08:00");
    assert_eq!(body["close"], "22:00");
    assert_eq!(body["booked"].as_array().unwrap().len(), 2);

    let free: Vec<(String, String)> = body["free"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| {
            (
                w["start_time"].as_str().unwrap().to_string(),
                w["end_time"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        free,
        vec![
            ("08:00".to_string(), "10:00".to_string()),
            ("12:00".to_string(), "14:00".to_string()),
            ("15:30".to_string(), "22:00".to_string()),
        ]
    );

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/resources/{}/availability?date=tomorrow", room),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn filter_and_sort_join_bookings() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let lab = create_room(&app, &token, "Lab 1").await;
    create_room(&app, &token, "Annex").await;
    book(&app, &token, lab, "09:00", "10:00").await;

    let (status, body) = send(&app, "GET", "/api/resources/filter?status=booked", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["resource_id"], lab);

    let (status, _) = send(&app, "GET", "/api/resources/filter?status=maybe", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/resources/sort?by=name", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Annex", "Lab 1"]);

    let (status, _) = send(&app, "GET", "/api/resources/sort?by=colour", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analytics_count_live_bookings() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let busy = create_room(&app, &token, "Busy Room").await;
    let quiet = create_room(&app, &token, "Quiet Room").await;
    book(&app, &token, busy, "09:00", "10:00").await;
    book(&app, &token, busy, "10:00", "11:00").await;
    let (_, body) = book(&app, &token, quiet, "09:00", "10:00").await;
    let cancelled = body["booking_id"].as_i64().unwrap();
    send(&app, "PUT", &format!("/api/bookings/{}/cancel", cancelled), Some(&token), None).await;

    let (status, body) = send(&app, "GET", "/api/analytics/usage", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let usage = body.as_array().unwrap();
    assert_eq!(usage.len(), 2);
    assert_eq!(usage[0]["total_bookings"], 2);
    assert_eq!(usage[1]["total_bookings"], 0);

    let (status, body) = send(&app, "GET", "/api/analytics/top-rooms?limit=1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let top = body.as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["name"], "Busy Room");
}

#[tokio::test]
async fn trailing_slash_paths_are_routed() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let room = create_room(&app, &token, "Lab 1").await;
    book(&app, &token, room, "09:00", "10:00").await;

    let (status, body) = send(&app, "GET", "/api/resources/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/users/{}/bookings/", user_id(&token)),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/analytics/top-rooms/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["total_bookings"], 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login/",
        None,
        Some(json!({ "email": "alice@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn blank_image_url_clears_image() {
    let app = app().await;
    let token = signup(&app, "Alice", "alice@example.com").await;
    let room = create_room(&app, &token, "Lab 1").await;
    let uri = format!("/api/resources/{}/update", room);

    let (_, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "image_url": "https://img.example/lab.png" })),
    )
    .await;
    assert_eq!(body["image_url"], "https://img.example/lab.png");

    let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "image_url": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["image_url"].is_null());
}
