//! Time slot API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::time_slot::{CreateTimeSlot, GenerateTimeSlots, TimeSlot, UpdateTimeSlot},
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct GeneratedSlotsResponse {
    pub created: usize,
    pub slots: Vec<TimeSlot>,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteSlotResponse {
    /// Bookings removed together with the slot
    pub bookings_removed: usize,
}

/// List the weekly slots of a venue
#[utoipa::path(
    get,
    path = "/venues/{id}/slots",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Slots ordered by weekday and start time", body = Vec<TimeSlot>)
    )
)]
pub async fn list_slots(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(venue_id): Path<Uuid>,
) -> AppResult<Json<Vec<TimeSlot>>> {
    let slots = state.services.slots.list(venue_id).await?;
    Ok(Json(slots))
}

/// Get slot by ID
#[utoipa::path(
    get,
    path = "/slots/{id}",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot details", body = TimeSlot),
        (status = 404, description = "Slot not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TimeSlot>> {
    let slot = state.services.slots.get_by_id(id).await?;
    Ok(Json(slot))
}

/// Create one slot by hand
#[utoipa::path(
    post,
    path = "/venues/{id}/slots",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    request_body = CreateTimeSlot,
    responses(
        (status = 201, description = "Slot created", body = TimeSlot),
        (status = 409, description = "Overlaps an existing slot", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(venue_id): Path<Uuid>,
    Json(data): Json<CreateTimeSlot>,
) -> AppResult<(StatusCode, Json<TimeSlot>)> {
    claims.require_admin()?;
    data.validate()?;
    let slot = state.services.slots.create(venue_id, data).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// Generate weekly slots from a recurrence rule
#[utoipa::path(
    post,
    path = "/venues/{id}/slots/generate",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    request_body = GenerateTimeSlots,
    responses(
        (status = 201, description = "Slots generated", body = GeneratedSlotsResponse),
        (status = 400, description = "Invalid rule", body = crate::error::ErrorResponse),
        (status = 409, description = "Generated slots overlap existing ones", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_slots(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(venue_id): Path<Uuid>,
    Json(data): Json<GenerateTimeSlots>,
) -> AppResult<(StatusCode, Json<GeneratedSlotsResponse>)> {
    claims.require_admin()?;
    data.validate()?;
    let slots = state.services.slots.generate(venue_id, data).await?;
    Ok((
        StatusCode::CREATED,
        Json(GeneratedSlotsResponse {
            created: slots.len(),
            slots,
        }),
    ))
}

/// Edit a slot's time range, price or details
#[utoipa::path(
    put,
    path = "/slots/{id}",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    request_body = UpdateTimeSlot,
    responses(
        (status = 200, description = "Slot updated", body = TimeSlot),
        (status = 409, description = "Overlaps an existing slot", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTimeSlot>,
) -> AppResult<Json<TimeSlot>> {
    claims.require_admin()?;
    data.validate()?;
    let slot = state.services.slots.update(id, data).await?;
    Ok(Json(slot))
}

/// Delete a slot and its bookings
#[utoipa::path(
    delete,
    path = "/slots/{id}",
    tag = "slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot deleted", body = DeleteSlotResponse)
    )
)]
pub async fn delete_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteSlotResponse>> {
    claims.require_admin()?;
    let bookings_removed = state.services.slots.delete(id).await?;
    Ok(Json(DeleteSlotResponse { bookings_removed }))
}
