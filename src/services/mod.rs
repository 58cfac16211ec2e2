//! Business logic services

pub mod availability;
pub mod bookings;
pub mod calendar;
pub mod reports;
pub mod slots;
pub mod venues;

use crate::{config::SchedulingConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub venues: venues::VenuesService,
    pub slots: slots::SlotsService,
    pub availability: availability::AvailabilityService,
    pub bookings: bookings::BookingsService,
    pub calendar: calendar::CalendarService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, settings: &SchedulingConfig) -> Self {
        Self {
            venues: venues::VenuesService::new(repository.clone()),
            slots: slots::SlotsService::new(repository.clone()),
            availability: availability::AvailabilityService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            calendar: calendar::CalendarService::new(repository.clone()),
            reports: reports::ReportsService::new(
                repository.clone(),
                settings.utilization_buckets.clone(),
                settings.analytics_months,
            ),
            repository,
        }
    }
}
