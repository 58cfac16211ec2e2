//! Calendar service (holidays and blocked days)

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        calendar::{CalendarQuery, DayStatusView, SetDayStatus},
        CalendarDay,
    },
    repository::{Collection, Repository},
    scheduling::time::parse_date,
};

#[derive(Clone)]
pub struct CalendarService {
    repository: Repository,
}

impl CalendarService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Stored overrides, sorted by date
    pub async fn list(&self, query: &CalendarQuery) -> AppResult<Vec<CalendarDay>> {
        let start = query.start_date.as_deref().map(parse_date).transpose()?;
        let end = query.end_date.as_deref().map(parse_date).transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AppError::InvalidRange(format!("{} is after {}", start, end)));
            }
        }
        let status = query.status;
        let venue_id = query.venue_id;
        self.repository
            .read(|s| Ok(s.calendar().list(start, end, status, venue_id)))
            .await
    }

    /// Status in effect on a date, stored or default
    pub async fn get(&self, venue_id: Option<Uuid>, date: NaiveDate) -> AppResult<DayStatusView> {
        self.repository.read(|s| Ok(s.day_status(venue_id, date))).await
    }

    /// Upsert the override for a date
    pub async fn set(&self, date: NaiveDate, data: SetDayStatus) -> AppResult<CalendarDay> {
        self.repository
            .write(&[Collection::Calendar], |s| {
                s.set_day_status(data.venue_id, date, data.status, data.note)
            })
            .await
    }

    /// Remove the override for a date
    pub async fn clear(&self, venue_id: Option<Uuid>, date: NaiveDate) -> AppResult<CalendarDay> {
        self.repository
            .write(&[Collection::Calendar], |s| s.clear_day_status(venue_id, date))
            .await
    }
}
