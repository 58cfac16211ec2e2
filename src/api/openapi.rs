//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{availability, bookings, calendar, health, reports, slots, venues};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Slotbook API",
        version = "0.3.0",
        description = "Venue slot scheduling, availability and booking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Venues
        venues::list_venues,
        venues::get_venue,
        venues::create_venue,
        venues::update_venue,
        venues::delete_venue,
        // Slots
        slots::list_slots,
        slots::get_slot,
        slots::create_slot,
        slots::generate_slots,
        slots::update_slot,
        slots::delete_slot,
        // Availability
        availability::get_availability,
        // Bookings
        bookings::create_booking,
        bookings::my_bookings,
        bookings::get_booking,
        bookings::venue_bookings,
        bookings::cancel_booking,
        bookings::confirm_booking,
        bookings::complete_booking,
        bookings::update_payment,
        // Calendar
        calendar::list_days,
        calendar::get_day,
        calendar::set_day,
        calendar::clear_day,
        // Reports
        reports::venue_overview,
        reports::todays_bookings,
        reports::payment_history,
        reports::utilization,
        reports::analytics,
    ),
    components(
        schemas(
            // Venues
            crate::models::venue::Venue,
            crate::models::venue::CreateVenue,
            crate::models::venue::UpdateVenue,
            crate::models::venue::VenueQuery,
            crate::models::VenueKind,
            crate::scheduling::CascadeReport,
            // Slots
            crate::models::time_slot::TimeSlot,
            crate::models::time_slot::CreateTimeSlot,
            crate::models::time_slot::UpdateTimeSlot,
            crate::models::time_slot::GenerateTimeSlots,
            crate::models::Weekday,
            slots::GeneratedSlotsResponse,
            slots::DeleteSlotResponse,
            // Availability
            crate::scheduling::DayAvailability,
            crate::scheduling::SlotAvailability,
            crate::scheduling::SlotState,
            availability::AvailabilityQuery,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::CustomerInfo,
            crate::models::booking::CreateBooking,
            crate::models::booking::UpdatePayment,
            crate::models::booking::BookingQuery,
            crate::models::BookingStatus,
            crate::models::PaymentStatus,
            crate::models::PaymentMethod,
            // Calendar
            crate::models::calendar::CalendarDay,
            crate::models::calendar::SetDayStatus,
            crate::models::calendar::DayStatusView,
            crate::models::calendar::CalendarQuery,
            crate::models::DayStatus,
            // Reports
            crate::scheduling::reports::VenueOverview,
            crate::scheduling::reports::PeriodUtilization,
            crate::scheduling::reports::AnalyticsSummary,
            crate::scheduling::reports::VenueRevenue,
            crate::scheduling::reports::MonthlyRevenue,
            crate::scheduling::reports::StatEntry,
            crate::scheduling::reports::TimeBucket,
            crate::services::reports::PaymentHistory,
            crate::services::reports::TodaysBookings,
            reports::UtilizationQuery,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "venues", description = "Venue management"),
        (name = "slots", description = "Weekly time slot management"),
        (name = "availability", description = "Slot availability by date"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "calendar", description = "Holidays and blocked days"),
        (name = "reports", description = "Dashboards and analytics")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
