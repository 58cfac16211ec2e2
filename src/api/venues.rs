//! Venues API endpoints (cricket centers and theaters)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::venue::{CreateVenue, UpdateVenue, Venue, VenueQuery},
    scheduling::CascadeReport,
};

use super::AuthenticatedUser;

/// List venues
#[utoipa::path(
    get,
    path = "/venues",
    tag = "venues",
    security(("bearer_auth" = [])),
    params(VenueQuery),
    responses(
        (status = 200, description = "Venues list", body = Vec<Venue>)
    )
)]
pub async fn list_venues(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<VenueQuery>,
) -> AppResult<Json<Vec<Venue>>> {
    let venues = state.services.venues.list(query.kind, query.active_only).await?;
    Ok(Json(venues))
}

/// Get venue by ID
#[utoipa::path(
    get,
    path = "/venues/{id}",
    tag = "venues",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue details", body = Venue),
        (status = 404, description = "Venue not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Venue>> {
    let venue = state.services.venues.get_by_id(id).await?;
    Ok(Json(venue))
}

/// Create a venue
#[utoipa::path(
    post,
    path = "/venues",
    tag = "venues",
    security(("bearer_auth" = [])),
    request_body = CreateVenue,
    responses(
        (status = 201, description = "Venue created", body = Venue),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateVenue>,
) -> AppResult<(StatusCode, Json<Venue>)> {
    claims.require_admin()?;
    data.validate()?;
    let venue = state.services.venues.create(data).await?;
    Ok((StatusCode::CREATED, Json(venue)))
}

/// Update a venue
#[utoipa::path(
    put,
    path = "/venues/{id}",
    tag = "venues",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    request_body = UpdateVenue,
    responses(
        (status = 200, description = "Venue updated", body = Venue)
    )
)]
pub async fn update_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateVenue>,
) -> AppResult<Json<Venue>> {
    claims.require_admin()?;
    data.validate()?;
    let venue = state.services.venues.update(id, data).await?;
    Ok(Json(venue))
}

/// Delete a venue together with its slots, bookings and calendar overrides
#[utoipa::path(
    delete,
    path = "/venues/{id}",
    tag = "venues",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue deleted", body = CascadeReport)
    )
)]
pub async fn delete_venue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CascadeReport>> {
    claims.require_admin()?;
    let report = state.services.venues.delete(id).await?;
    Ok(Json(report))
}
