//! Calendar day-status overrides (holidays, blocked days)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::enums::DayStatus;

/// Status override for one date, global or scoped to one venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// `None` for the global calendar
    pub venue_id: Option<Uuid>,
    pub status: DayStatus,
    pub note: Option<String>,
}

/// Set day status request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetDayStatus {
    pub status: DayStatus,
    pub note: Option<String>,
    /// Scope the override to one venue (per-venue calendars only)
    pub venue_id: Option<Uuid>,
}

/// Effective status of a date
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayStatusView {
    pub date: NaiveDate,
    pub venue_id: Option<Uuid>,
    pub status: DayStatus,
    pub note: Option<String>,
    /// False when no override exists and the configured default applies
    pub is_override: bool,
}

/// Query parameters for calendar listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    /// From this date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Until this date (YYYY-MM-DD)
    pub end_date: Option<String>,
    pub status: Option<DayStatus>,
    pub venue_id: Option<Uuid>,
}

/// Venue scope for single-date calendar calls
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CalendarScopeQuery {
    pub venue_id: Option<Uuid>,
}
