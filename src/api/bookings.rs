//! Bookings API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        booking::{Booking, BookingQuery, CreateBooking, UpdatePayment},
        BookingStatus, PaymentStatus,
    },
};

use super::AuthenticatedUser;

/// Book a slot for one date
///
/// Customers always create a confirmed booking with pending payment, linked to
/// their account. Admins may record walk-in bookings with any initial state.
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid booking", body = crate::error::ErrorResponse),
        (status = 404, description = "Slot not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot already booked for the date", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(mut data): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    data.validate()?;
    let customer_id = if claims.is_admin() {
        None
    } else {
        data.status = Some(BookingStatus::Confirmed);
        data.payment_status = Some(PaymentStatus::Pending);
        Some(claims.sub.clone())
    };
    let booking = state.services.bookings.create(data, customer_id).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Bookings of the current customer
#[utoipa::path(
    get,
    path = "/bookings/mine",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own bookings, most recent first", body = Vec<Booking>)
    )
)]
pub async fn my_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.services.bookings.for_customer(&claims.sub).await?;
    Ok(Json(bookings))
}

/// Get booking by ID
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = Booking),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get_by_id(id).await?;
    claims.require_owner_or_admin(booking.customer_id.as_deref())?;
    Ok(Json(booking))
}

/// List the bookings of a venue
#[utoipa::path(
    get,
    path = "/venues/{id}/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID"), BookingQuery),
    responses(
        (status = 200, description = "Venue bookings by date and start time", body = Vec<Booking>)
    )
)]
pub async fn venue_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(venue_id): Path<Uuid>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    claims.require_admin()?;
    let bookings = state.services.bookings.for_venue(venue_id, &query).await?;
    Ok(Json(bookings))
}

/// Cancel a booking, releasing its slot for the date
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 400, description = "Booking cannot be cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get_by_id(id).await?;
    claims.require_owner_or_admin(booking.customer_id.as_deref())?;
    let booking = state.services.bookings.cancel(id).await?;
    Ok(Json(booking))
}

/// Confirm a pending booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/confirm",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = Booking)
    )
)]
pub async fn confirm_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    claims.require_admin()?;
    let booking = state.services.bookings.confirm(id).await?;
    Ok(Json(booking))
}

/// Mark a confirmed booking as completed
#[utoipa::path(
    post,
    path = "/bookings/{id}/complete",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking completed", body = Booking),
        (status = 400, description = "Booking date not reached", body = crate::error::ErrorResponse)
    )
)]
pub async fn complete_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    claims.require_admin()?;
    let booking = state.services.bookings.complete(id).await?;
    Ok(Json(booking))
}

/// Record a payment status change
#[utoipa::path(
    put,
    path = "/bookings/{id}/payment",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdatePayment,
    responses(
        (status = 200, description = "Payment updated", body = Booking)
    )
)]
pub async fn update_payment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePayment>,
) -> AppResult<Json<Booking>> {
    claims.require_admin()?;
    let booking = state.services.bookings.update_payment(id, data).await?;
    Ok(Json(booking))
}
