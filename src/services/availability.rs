//! Availability service

use uuid::Uuid;

use crate::{
    error::AppResult,
    repository::Repository,
    scheduling::{time::parse_date, DayAvailability},
};

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Slot states of a venue on `date` (YYYY-MM-DD), today when omitted
    pub async fn resolve(&self, venue_id: Uuid, date: Option<&str>) -> AppResult<DayAvailability> {
        let date = match date {
            Some(value) => parse_date(value)?,
            None => self.repository.today(),
        };
        self.repository
            .read(|s| s.resolve_availability(venue_id, date))
            .await
    }
}
