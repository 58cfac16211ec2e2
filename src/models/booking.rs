//! Booking model: a slot pinned to one calendar date for one customer

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{BookingStatus, PaymentMethod, PaymentStatus};

/// Booking record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub venue_id: Uuid,
    /// Identity of the customer account that made the booking, if any
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    /// Date the slot is booked for
    pub date: NaiveDate,
    pub number_of_people: i32,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    /// Creation timestamp
    pub booking_time: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Customer details supplied with a booking
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CustomerInfo {
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub name: String,
    #[validate(length(min = 5, max = 32, message = "Phone number is required"))]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Create booking request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBooking {
    pub slot_id: Uuid,
    /// Booking date (YYYY-MM-DD)
    pub date: String,
    #[validate(nested)]
    pub customer: CustomerInfo,
    #[validate(range(min = 1, message = "At least 1 person required"))]
    pub number_of_people: i32,
    /// Initial status; defaults to confirmed
    pub status: Option<BookingStatus>,
    /// Initial payment status; defaults to pending
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

/// Validated booking input handed to the engine
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub slot_id: Uuid,
    pub date: NaiveDate,
    pub customer_id: Option<String>,
    pub customer: CustomerInfo,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

/// Payment update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePayment {
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
}

/// Query parameters for venue booking lists
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookingQuery {
    /// Only bookings on this date (YYYY-MM-DD)
    pub date: Option<String>,
    pub status: Option<BookingStatus>,
}
