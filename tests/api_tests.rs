//! API integration tests
//!
//! Drive the full router in-process with in-memory storage and a clock frozen
//! on Saturday 2024-06-01.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use slotbook_server::{
    config::AppConfig,
    create_router,
    models::{Role, UserClaims},
    repository::{MemoryPersistence, Repository},
    scheduling::FixedClock,
    services::Services,
    AppState,
};

const SECRET: &str = "integration-test-secret";

async fn app() -> Router {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = SECRET.to_string();
    config.database.url = "memory".to_string();

    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let repository = Repository::load(
        Arc::new(MemoryPersistence::default()),
        Arc::new(clock),
        &config.scheduling,
    )
    .await
    .expect("Failed to load repository");
    let services = Services::new(repository, &config.scheduling);

    create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

fn token(sub: &str, role: Role) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: sub.to_string(),
        role,
        name: None,
        exp: now + 3600,
        iat: now,
    }
    .create_token(SECRET)
    .expect("Failed to sign token")
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
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

/// Create a venue with Monday slots 09:00-10:00 and 10:00-11:00 at 500 each
async fn seed(app: &Router, admin: &str) -> (String, String) {
    let (status, venue) = send(
        app,
        Method::POST,
        "/api/v1/venues",
        Some(admin),
        Some(json!({
            "name": "Downtown Nets",
            "location": "Pune",
            "capacity": 10,
            "units": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let venue_id = venue["id"].as_str().unwrap().to_string();

    let (status, generated) = send(
        app,
        Method::POST,
        &format!("/api/v1/venues/{}/slots/generate", venue_id),
        Some(admin),
        Some(json!({
            "days": ["monday"],
            "start_time": "09:00",
            "end_time": "11:00",
            "interval_minutes": 60,
            "price": "500"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(generated["created"], 2);

    let ten = generated["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["start_time"] == "10:00")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();
    (venue_id, ten)
}

fn booking_body(slot_id: &str, date: &str) -> Value {
    json!({
        "slot_id": slot_id,
        "date": date,
        "customer": { "name": "Asha", "phone": "9800000000" },
        "number_of_people": 2
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_authentication_required() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/venues", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");

    let (status, _) = send(&app, Method::GET, "/api/v1/venues", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let customer = token("cust-1", Role::Customer);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/venues",
        Some(&customer),
        Some(json!({ "name": "X", "location": "Y", "capacity": 1, "units": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_booking_conflict_and_rebook_after_cancel() {
    let app = app().await;
    let admin = token("admin-1", Role::Admin);
    let customer = token("cust-asha", Role::Customer);
    let (venue_id, ten) = seed(&app, &admin).await;

    let (status, first) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(&customer),
        Some(booking_body(&ten, "2024-06-03")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "confirmed");
    assert_eq!(first["payment_status"], "pending");
    assert_eq!(first["customer_id"], "cust-asha");
    assert_eq!(first["total_amount"], "1000");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(&customer),
        Some(booking_body(&ten, "2024-06-03")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "SlotTaken");

    let (status, day) = send(
        &app,
        Method::GET,
        &format!("/api/v1/venues/{}/availability?date=2024-06-03", venue_id),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["weekday"], "monday");
    assert_eq!(day["available"], 1);
    assert_eq!(day["booked"], 1);
    assert_eq!(day["slots"][1]["state"], "booked");

    // another customer may not cancel it
    let stranger = token("cust-other", Role::Customer);
    let booking_id = first["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/bookings/{}/cancel", booking_id),
        Some(&stranger),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, cancelled) = send(
        &app,
        Method::POST,
        &format!("/api/v1/bookings/{}/cancel", booking_id),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(&customer),
        Some(booking_body(&ten, "2024-06-03")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, mine) = send(&app, Method::GET, "/api/v1/bookings/mine", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_holiday_hides_slots() {
    let app = app().await;
    let admin = token("admin-1", Role::Admin);
    let (venue_id, ten) = seed(&app, &admin).await;

    let (status, day) = send(
        &app,
        Method::PUT,
        "/api/v1/calendar/2024-06-10",
        Some(&admin),
        Some(json!({ "status": "holiday", "note": "Festival" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["status"], "holiday");

    let (status, availability) = send(
        &app,
        Method::GET,
        &format!("/api/v1/venues/{}/availability?date=2024-06-10", venue_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(availability["day_status"], "holiday");
    assert_eq!(availability["slots"].as_array().unwrap().len(), 0);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(&admin),
        Some(booking_body(&ten, "2024-06-10")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/calendar/2024-06-10", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, view) = send(&app, Method::GET, "/api/v1/calendar/2024-06-10", Some(&admin), None).await;
    assert_eq!(view["status"], "available");
    assert_eq!(view["is_override"], false);
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let app = app().await;
    let admin = token("admin-1", Role::Admin);
    let (venue_id, _) = seed(&app, &admin).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/venues/{}/availability?date=03-06-2024", venue_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidArgument");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/venues/{}/slots/generate", venue_id),
        Some(&admin),
        Some(json!({
            "days": ["tuesday"],
            "start_time": "11:00",
            "end_time": "09:00",
            "interval_minutes": 60,
            "price": "500"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidRange");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/venues/{}/slots", venue_id),
        Some(&admin),
        Some(json!({
            "day": "monday",
            "start_time": "10:30",
            "end_time": "11:30",
            "price": "600"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "SlotOverlap");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/venues/00000000-0000-0000-0000-000000000001",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchVenue");
}

#[tokio::test]
async fn test_payment_history_and_venue_delete() {
    let app = app().await;
    let admin = token("admin-1", Role::Admin);
    let (venue_id, ten) = seed(&app, &admin).await;

    let (_, booking) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(&admin),
        Some(booking_body(&ten, "2024-06-03")),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap();
    assert!(booking["customer_id"].is_null());

    let (status, paid) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/bookings/{}/payment", booking_id),
        Some(&admin),
        Some(json!({ "payment_status": "paid", "payment_method": "upi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["payment_status"], "paid");

    let (status, history) = send(
        &app,
        Method::GET,
        &format!("/api/v1/venues/{}/payments", venue_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["bookings"].as_array().unwrap().len(), 1);
    assert_eq!(history["total"], "1000");

    let (status, report) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/venues/{}", venue_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["slots"], 2);
    assert_eq!(report["bookings"], 1);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/bookings/{}", booking_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivated_venue_refuses_bookings() {
    let app = app().await;
    let admin = token("admin-1", Role::Admin);
    let customer = token("cust-asha", Role::Customer);
    let (venue_id, ten) = seed(&app, &admin).await;

    let (status, venue) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/venues/{}", venue_id),
        Some(&admin),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(venue["is_active"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        Some(&customer),
        Some(booking_body(&ten, "2024-06-03")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidArgument");

    let (status, day) = send(
        &app,
        Method::GET,
        &format!("/api/v1/venues/{}/availability?date=2024-06-03", venue_id),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["venue_active"], false);
    assert_eq!(day["slots"].as_array().unwrap().len(), 0);

    let (_, listed) = send(&app, Method::GET, "/api/v1/venues?active_only=true", Some(&customer), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}
