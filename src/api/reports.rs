//! Reporting API endpoints (dashboards, payments, analytics)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::AppResult,
    scheduling::{
        reports::{AnalyticsSummary, PeriodUtilization, VenueOverview},
        time::parse_date,
    },
    services::reports::{PaymentHistory, TodaysBookings},
};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UtilizationQuery {
    /// Restrict to one venue
    pub venue_id: Option<Uuid>,
    /// Restrict to the slots and bookings of one date (YYYY-MM-DD)
    pub date: Option<String>,
}

/// Today's dashboard for a venue
#[utoipa::path(
    get,
    path = "/venues/{id}/overview",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue overview", body = VenueOverview)
    )
)]
pub async fn venue_overview(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(venue_id): Path<Uuid>,
) -> AppResult<Json<VenueOverview>> {
    claims.require_admin()?;
    let overview = state.services.reports.overview(venue_id).await?;
    Ok(Json(overview))
}

/// Today's bookings of a venue
#[utoipa::path(
    get,
    path = "/venues/{id}/bookings/today",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Bookings dated today", body = TodaysBookings)
    )
)]
pub async fn todays_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(venue_id): Path<Uuid>,
) -> AppResult<Json<TodaysBookings>> {
    claims.require_admin()?;
    let today = state.services.reports.todays_bookings(venue_id).await?;
    Ok(Json(today))
}

/// Paid bookings of a venue, most recent first
#[utoipa::path(
    get,
    path = "/venues/{id}/payments",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Payment history", body = PaymentHistory)
    )
)]
pub async fn payment_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(venue_id): Path<Uuid>,
) -> AppResult<Json<PaymentHistory>> {
    claims.require_admin()?;
    let history = state.services.reports.payment_history(venue_id).await?;
    Ok(Json(history))
}

/// Slot utilization per time-of-day bucket
#[utoipa::path(
    get,
    path = "/reports/utilization",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(UtilizationQuery),
    responses(
        (status = 200, description = "Utilization by period", body = Vec<PeriodUtilization>)
    )
)]
pub async fn utilization(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UtilizationQuery>,
) -> AppResult<Json<Vec<PeriodUtilization>>> {
    claims.require_admin()?;
    let date = query.date.as_deref().map(parse_date).transpose()?;
    let periods = state.services.reports.utilization(query.venue_id, date).await?;
    Ok(Json(periods))
}

/// Revenue, booking and customer analytics across venues
#[utoipa::path(
    get,
    path = "/reports/analytics",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Analytics summary", body = AnalyticsSummary)
    )
)]
pub async fn analytics(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AnalyticsSummary>> {
    claims.require_admin()?;
    let summary = state.services.reports.analytics().await?;
    Ok(Json(summary))
}
