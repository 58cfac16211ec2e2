//! Slotbook scheduling server
//!
//! REST JSON API over a slot scheduling engine for bookable venues: weekly
//! slot generation, holiday calendars, per-date availability, bookings and
//! revenue reporting.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Venues
        .route("/venues", get(api::venues::list_venues).post(api::venues::create_venue))
        .route(
            "/venues/:id",
            get(api::venues::get_venue)
                .put(api::venues::update_venue)
                .delete(api::venues::delete_venue),
        )
        // Slots
        .route("/venues/:id/slots", get(api::slots::list_slots).post(api::slots::create_slot))
        .route("/venues/:id/slots/generate", post(api::slots::generate_slots))
        .route(
            "/slots/:id",
            get(api::slots::get_slot)
                .put(api::slots::update_slot)
                .delete(api::slots::delete_slot),
        )
        // Availability
        .route("/venues/:id/availability", get(api::availability::get_availability))
        // Bookings
        .route("/bookings", post(api::bookings::create_booking))
        .route("/bookings/mine", get(api::bookings::my_bookings))
        .route("/bookings/:id", get(api::bookings::get_booking))
        .route("/bookings/:id/cancel", post(api::bookings::cancel_booking))
        .route("/bookings/:id/confirm", post(api::bookings::confirm_booking))
        .route("/bookings/:id/complete", post(api::bookings::complete_booking))
        .route("/bookings/:id/payment", put(api::bookings::update_payment))
        .route("/venues/:id/bookings", get(api::bookings::venue_bookings))
        // Calendar
        .route("/calendar", get(api::calendar::list_days))
        .route(
            "/calendar/:date",
            get(api::calendar::get_day)
                .put(api::calendar::set_day)
                .delete(api::calendar::clear_day),
        )
        // Reports
        .route("/venues/:id/overview", get(api::reports::venue_overview))
        .route("/venues/:id/bookings/today", get(api::reports::todays_bookings))
        .route("/venues/:id/payments", get(api::reports::payment_history))
        .route("/reports/utilization", get(api::reports::utilization))
        .route("/reports/analytics", get(api::reports::analytics))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
