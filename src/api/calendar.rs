//! Calendar API endpoints (holidays, blocked days)

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::calendar::{CalendarDay, CalendarQuery, CalendarScopeQuery, DayStatusView, SetDayStatus},
    scheduling::time::parse_date,
};

use super::AuthenticatedUser;

/// List calendar overrides
#[utoipa::path(
    get,
    path = "/calendar",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(CalendarQuery),
    responses(
        (status = 200, description = "Overrides sorted by date", body = Vec<CalendarDay>)
    )
)]
pub async fn list_days(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<Vec<CalendarDay>>> {
    let days = state.services.calendar.list(&query).await?;
    Ok(Json(days))
}

/// Status in effect on a date
#[utoipa::path(
    get,
    path = "/calendar/{date}",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)"), CalendarScopeQuery),
    responses(
        (status = 200, description = "Day status", body = DayStatusView)
    )
)]
pub async fn get_day(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(date): Path<String>,
    Query(scope): Query<CalendarScopeQuery>,
) -> AppResult<Json<DayStatusView>> {
    let date = parse_date(&date)?;
    let view = state.services.calendar.get(scope.venue_id, date).await?;
    Ok(Json(view))
}

/// Set the status of a date
#[utoipa::path(
    put,
    path = "/calendar/{date}",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    request_body = SetDayStatus,
    responses(
        (status = 200, description = "Override stored", body = CalendarDay)
    )
)]
pub async fn set_day(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(date): Path<String>,
    Json(data): Json<SetDayStatus>,
) -> AppResult<Json<CalendarDay>> {
    claims.require_admin()?;
    let date = parse_date(&date)?;
    let day = state.services.calendar.set(date, data).await?;
    Ok(Json(day))
}

/// Remove the override of a date
#[utoipa::path(
    delete,
    path = "/calendar/{date}",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)"), CalendarScopeQuery),
    responses(
        (status = 200, description = "Override removed", body = CalendarDay),
        (status = 404, description = "No override for the date", body = crate::error::ErrorResponse)
    )
)]
pub async fn clear_day(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(date): Path<String>,
    Query(scope): Query<CalendarScopeQuery>,
) -> AppResult<Json<CalendarDay>> {
    claims.require_admin()?;
    let date = parse_date(&date)?;
    let day = state.services.calendar.clear(scope.venue_id, date).await?;
    Ok(Json(day))
}
