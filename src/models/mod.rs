//! Data models for Slotbook

pub mod booking;
pub mod calendar;
pub mod enums;
pub mod time_slot;
pub mod user;
pub mod venue;

// Re-export commonly used types
pub use booking::{Booking, CustomerInfo, NewBooking};
pub use calendar::CalendarDay;
pub use enums::{BookingStatus, DayStatus, PaymentMethod, PaymentStatus, VenueKind, Weekday};
pub use time_slot::TimeSlot;
pub use user::{Role, UserClaims};
pub use venue::Venue;
