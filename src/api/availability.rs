//! Availability API endpoint

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{error::AppResult, scheduling::DayAvailability};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    /// Date to resolve (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

/// Slot states of a venue on one date
#[utoipa::path(
    get,
    path = "/venues/{id}/availability",
    tag = "availability",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID"), AvailabilityQuery),
    responses(
        (status = 200, description = "Availability for the date", body = DayAvailability),
        (status = 400, description = "Malformed date", body = crate::error::ErrorResponse),
        (status = 404, description = "Venue not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(venue_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<DayAvailability>> {
    let availability = state
        .services
        .availability
        .resolve(venue_id, query.date.as_deref())
        .await?;
    Ok(Json(availability))
}
