//! Time slot model: a recurring weekly template for one venue

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::Weekday;

/// A bookable weekly interval (day + time range + price)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeSlot {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub day: Weekday,
    /// Start time (HH:MM, 24h)
    pub start_time: String,
    /// End time (HH:MM, 24h)
    pub end_time: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub max_capacity: Option<i32>,
    pub is_special_event: bool,
    pub notes: Option<String>,
}

/// Create a single slot by hand
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTimeSlot {
    pub day: Weekday,
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[validate(range(min = 1, message = "Max capacity must be positive"))]
    pub max_capacity: Option<i32>,
    #[serde(default)]
    pub is_special_event: bool,
    pub notes: Option<String>,
}

/// Edit a slot (time range, price and display fields only)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTimeSlot {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 1, message = "Max capacity must be positive"))]
    pub max_capacity: Option<i32>,
    pub is_special_event: Option<bool>,
    pub notes: Option<String>,
}

/// Bulk generation request: one rule expanded over several weekdays
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateTimeSlots {
    #[validate(length(min = 1, message = "At least one day is required"))]
    pub days: Vec<Weekday>,
    /// First slot start (HH:MM)
    pub start_time: String,
    /// Latest slot end (HH:MM)
    pub end_time: String,
    /// Slot length in minutes
    pub interval_minutes: i64,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[validate(range(min = 1, message = "Max capacity must be positive"))]
    pub max_capacity: Option<i32>,
    pub notes: Option<String>,
    /// Persist even when generated slots overlap existing ones
    #[serde(default)]
    pub allow_overlap: bool,
}
