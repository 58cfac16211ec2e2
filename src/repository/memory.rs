//! In-memory backend, selected with `database.url = "memory"`

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Collection, Persistence};
use crate::{
    error::AppResult,
    models::{Booking, CalendarDay, TimeSlot, Venue},
    scheduling::Schedule,
};

#[derive(Default)]
pub struct MemoryPersistence {
    venues: RwLock<Vec<Venue>>,
    slots: RwLock<Vec<TimeSlot>>,
    bookings: RwLock<Vec<Booking>>,
    calendar: RwLock<Vec<CalendarDay>>,
}

impl MemoryPersistence {
    /// Seed the backend with existing records
    pub fn with_records(
        venues: Vec<Venue>,
        slots: Vec<TimeSlot>,
        bookings: Vec<Booking>,
        calendar: Vec<CalendarDay>,
    ) -> Self {
        Self {
            venues: RwLock::new(venues),
            slots: RwLock::new(slots),
            bookings: RwLock::new(bookings),
            calendar: RwLock::new(calendar),
        }
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn load_venues(&self) -> AppResult<Vec<Venue>> {
        Ok(self.venues.read().await.clone())
    }

    async fn load_slots(&self) -> AppResult<Vec<TimeSlot>> {
        Ok(self.slots.read().await.clone())
    }

    async fn load_bookings(&self) -> AppResult<Vec<Booking>> {
        Ok(self.bookings.read().await.clone())
    }

    async fn load_calendar(&self) -> AppResult<Vec<CalendarDay>> {
        Ok(self.calendar.read().await.clone())
    }

    async fn save(&self, _before: &Schedule, after: &Schedule, touched: &[Collection]) -> AppResult<()> {
        for collection in Collection::in_order(touched) {
            match collection {
                Collection::Venues => *self.venues.write().await = after.venues().to_vec(),
                Collection::Slots => *self.slots.write().await = after.slots().to_vec(),
                Collection::Bookings => *self.bookings.write().await = after.bookings().to_vec(),
                Collection::Calendar => *self.calendar.write().await = after.calendar().days(),
            }
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
