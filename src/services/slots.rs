//! Time slots service (manual slots and weekly generation)

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        time_slot::{CreateTimeSlot, GenerateTimeSlots, UpdateTimeSlot},
        TimeSlot,
    },
    repository::{Collection, Repository},
    scheduling::SlotRule,
};

#[derive(Clone)]
pub struct SlotsService {
    repository: Repository,
}

impl SlotsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Slots of a venue, by weekday then start time
    pub async fn list(&self, venue_id: Uuid) -> AppResult<Vec<TimeSlot>> {
        self.repository.read(|s| s.venue_slots(venue_id)).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<TimeSlot> {
        self.repository.read(|s| s.slot(id).cloned()).await
    }

    pub async fn create(&self, venue_id: Uuid, data: CreateTimeSlot) -> AppResult<TimeSlot> {
        self.repository
            .write(&[Collection::Slots], |s| s.create_slot(venue_id, data))
            .await
    }

    /// Expand a weekly rule into slots and store them
    pub async fn generate(&self, venue_id: Uuid, data: GenerateTimeSlots) -> AppResult<Vec<TimeSlot>> {
        let allow_overlap = data.allow_overlap;
        let rule = SlotRule {
            venue_id,
            days: data.days,
            start_time: data.start_time,
            end_time: data.end_time,
            interval_minutes: data.interval_minutes,
            price: data.price,
            max_capacity: data.max_capacity,
            notes: data.notes,
        };
        self.repository
            .write(&[Collection::Slots], move |s| s.add_generated_slots(&rule, allow_overlap))
            .await
    }

    pub async fn update(&self, id: Uuid, data: UpdateTimeSlot) -> AppResult<TimeSlot> {
        self.repository
            .write(&[Collection::Slots], |s| s.update_slot(id, data))
            .await
    }

    /// Delete a slot and its bookings, returning the number of bookings removed
    pub async fn delete(&self, id: Uuid) -> AppResult<usize> {
        self.repository
            .write(&[Collection::Slots, Collection::Bookings], |s| s.delete_slot(id))
            .await
    }
}
