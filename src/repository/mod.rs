//! Repository layer: the authoritative in-process schedule and its persistence
//!
//! Every write locks the schedule, applies the mutation, saves the touched
//! collections in one backend call and only then releases the lock. A failed
//! save restores the state captured before the mutation.

pub mod memory;
pub mod postgres;

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    config::SchedulingConfig,
    error::AppResult,
    models::{Booking, CalendarDay, TimeSlot, Venue},
    scheduling::{CalendarStore, Clock, Schedule},
};

pub use memory::MemoryPersistence;
pub use postgres::PgPersistence;

/// Storage backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn load_venues(&self) -> AppResult<Vec<Venue>>;
    async fn load_slots(&self) -> AppResult<Vec<TimeSlot>>;
    async fn load_bookings(&self) -> AppResult<Vec<Booking>>;
    async fn load_calendar(&self) -> AppResult<Vec<CalendarDay>>;

    /// Store the `touched` collections of `after`, all or nothing.
    /// `before` is the last saved state, for backends that write only changes.
    async fn save(&self, before: &Schedule, after: &Schedule, touched: &[Collection]) -> AppResult<()>;

    /// Backend health check
    async fn ping(&self) -> AppResult<()>;
}

/// Collections a write may touch, saved in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Venues,
    Slots,
    Bookings,
    Calendar,
}

impl Collection {
    const ORDER: [Collection; 4] = [
        Collection::Venues,
        Collection::Slots,
        Collection::Bookings,
        Collection::Calendar,
    ];

    /// Touched collections in save order, without duplicates
    pub fn in_order(touched: &[Collection]) -> Vec<Collection> {
        Self::ORDER
            .iter()
            .copied()
            .filter(|c| touched.contains(c))
            .collect()
    }
}

/// Rows added or modified between two states, and ids no longer present
#[derive(Debug)]
pub struct Changes<'a, T> {
    pub upserted: Vec<&'a T>,
    pub removed: Vec<Uuid>,
}

impl<T> Changes<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.upserted.is_empty() && self.removed.is_empty()
    }
}

pub fn changes<'a, T, F>(before: &[T], after: &'a [T], id: F) -> Changes<'a, T>
where
    T: PartialEq,
    F: Fn(&T) -> Uuid,
{
    let previous: HashMap<Uuid, &T> = before.iter().map(|row| (id(row), row)).collect();
    let current: HashSet<Uuid> = after.iter().map(|row| id(row)).collect();

    let mut upserted = Vec::new();
    for row in after {
        match previous.get(&id(row)) {
            Some(old) if *old == row => {}
            _ => upserted.push(row),
        }
    }
    let removed = before
        .iter()
        .map(|row| id(row))
        .filter(|key| !current.contains(key))
        .collect();

    Changes { upserted, removed }
}

/// Shared handle to the schedule, its backend and the clock
#[derive(Clone)]
pub struct Repository {
    schedule: Arc<Mutex<Schedule>>,
    store: Arc<dyn Persistence>,
    clock: Arc<dyn Clock>,
}

impl Repository {
    /// Load every collection from the backend
    pub async fn load(
        store: Arc<dyn Persistence>,
        clock: Arc<dyn Clock>,
        settings: &SchedulingConfig,
    ) -> AppResult<Self> {
        let venues = store.load_venues().await?;
        let slots = store.load_slots().await?;
        let bookings = store.load_bookings().await?;
        let days = store.load_calendar().await?;

        tracing::info!(
            "Loaded {} venues, {} slots, {} bookings, {} calendar days",
            venues.len(),
            slots.len(),
            bookings.len(),
            days.len()
        );

        let calendar = CalendarStore::from_days(settings.calendar_scope, settings.default_day_status, days);
        let schedule = Schedule::from_records(venues, slots, bookings, calendar, settings.pricing_policy);

        Ok(Self {
            schedule: Arc::new(Mutex::new(schedule)),
            store,
            clock,
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Run a read-only query against the current schedule
    pub async fn read<T, F>(&self, query: F) -> AppResult<T>
    where
        F: FnOnce(&Schedule) -> AppResult<T> + Send,
        T: Send,
    {
        let schedule = self.schedule.lock().await;
        query(&schedule)
    }

    /// Apply a mutation and persist the collections it touches.
    /// On any error the schedule is left exactly as it was.
    pub async fn write<T, F>(&self, touched: &[Collection], mutation: F) -> AppResult<T>
    where
        F: FnOnce(&mut Schedule) -> AppResult<T> + Send,
        T: Send,
    {
        let mut schedule = self.schedule.lock().await;
        let snapshot = schedule.clone();

        let value = match mutation(&mut schedule) {
            Ok(value) => value,
            Err(e) => {
                *schedule = snapshot;
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&snapshot, &schedule, touched).await {
            tracing::error!("Persisting {:?} failed, rolling back: {}", touched, e);
            *schedule = snapshot;
            return Err(e);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{venue::CreateVenue, VenueKind},
        scheduling::{FixedClock, SlotRule},
    };
    use rust_decimal::Decimal;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
    }

    fn new_venue(name: &str) -> CreateVenue {
        CreateVenue {
            kind: VenueKind::Theater,
            name: name.to_string(),
            location: "Mumbai".to_string(),
            capacity: 80,
            units: 3,
            amenities: Vec::new(),
            is_active: None,
            description: None,
            contact_number: None,
            address: None,
            image_url: None,
        }
    }

    fn evening_rule(venue_id: Uuid) -> SlotRule {
        SlotRule {
            venue_id,
            days: vec![crate::models::Weekday::Friday],
            start_time: "18:00".to_string(),
            end_time: "21:00".to_string(),
            interval_minutes: 90,
            price: Decimal::from(250),
            max_capacity: None,
            notes: None,
        }
    }

    fn empty_mock() -> MockPersistence {
        let mut store = MockPersistence::new();
        store.expect_load_venues().returning(|| Ok(Vec::new()));
        store.expect_load_slots().returning(|| Ok(Vec::new()));
        store.expect_load_bookings().returning(|| Ok(Vec::new()));
        store.expect_load_calendar().returning(|| Ok(Vec::new()));
        store
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back() {
        let mut store = empty_mock();
        store
            .expect_save()
            .times(1)
            .returning(|_, _, _| Err(AppError::Internal("disk full".to_string())));

        let repo = Repository::load(Arc::new(store), clock(), &SchedulingConfig::default())
            .await
            .unwrap();
        let now = repo.now();
        let result = repo
            .write(&[Collection::Venues], |s| Ok(s.add_venue(new_venue("Galaxy"), now)))
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        let count = repo.read(|s| Ok(s.venues().len())).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_failed_mutation_saves_nothing() {
        let store = empty_mock();
        let repo = Repository::load(Arc::new(store), clock(), &SchedulingConfig::default())
            .await
            .unwrap();

        // no save expectation is set: a save call would panic the mock
        let result = repo
            .write(&[Collection::Venues], |s| s.delete_venue(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(..))));
    }

    #[tokio::test]
    async fn test_cascade_delete_is_one_save() {
        let mut store = empty_mock();
        store
            .expect_save()
            .withf(|_, _, touched| touched.len() < 4)
            .times(2)
            .returning(|_, _, _| Ok(()));
        // the whole cascade reaches the backend as a single call, which fails
        store
            .expect_save()
            .withf(|before, after, touched| {
                Collection::in_order(touched) == Collection::ORDER.to_vec()
                    && before.venues().len() == 1
                    && before.slots().len() == 2
                    && after.venues().is_empty()
                    && after.slots().is_empty()
            })
            .times(1)
            .returning(|_, _, _| Err(AppError::Internal("connection reset".to_string())));

        let repo = Repository::load(Arc::new(store), clock(), &SchedulingConfig::default())
            .await
            .unwrap();
        let now = repo.now();
        let venue = repo
            .write(&[Collection::Venues], |s| Ok(s.add_venue(new_venue("Galaxy"), now)))
            .await
            .unwrap();
        repo.write(&[Collection::Slots], |s| s.add_generated_slots(&evening_rule(venue.id), false))
            .await
            .unwrap();

        let result = repo
            .write(&Collection::ORDER, |s| s.delete_venue(venue.id))
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));

        let (venues, slots) = repo
            .read(|s| Ok((s.venues().len(), s.slots().len())))
            .await
            .unwrap();
        assert_eq!((venues, slots), (1, 2));
    }

    #[tokio::test]
    async fn test_write_persists_touched_collections() {
        let store = Arc::new(MemoryPersistence::default());
        let repo = Repository::load(store.clone(), clock(), &SchedulingConfig::default())
            .await
            .unwrap();
        let now = repo.now();
        repo.write(&[Collection::Venues], |s| Ok(s.add_venue(new_venue("Galaxy"), now)))
            .await
            .unwrap();

        assert_eq!(store.load_venues().await.unwrap().len(), 1);

        // a fresh repository sees the saved venue
        let reloaded = Repository::load(store, clock(), &SchedulingConfig::default())
            .await
            .unwrap();
        let names = reloaded
            .read(|s| Ok(s.venues().iter().map(|v| v.name.clone()).collect::<Vec<_>>()))
            .await
            .unwrap();
        assert_eq!(names, vec!["Galaxy".to_string()]);
    }

    #[test]
    fn test_changes_lists_only_modified_rows() {
        let mut schedule = Schedule::new(
            CalendarStore::new(Default::default(), Default::default()),
            Default::default(),
        );
        let now = FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).now();
        let kept = schedule.add_venue(new_venue("Galaxy"), now);
        let renamed = schedule.add_venue(new_venue("Regal"), now);
        let dropped = schedule.add_venue(new_venue("Plaza"), now);
        let before = schedule.clone();

        schedule
            .update_venue(
                renamed.id,
                crate::models::venue::UpdateVenue {
                    name: Some("Regal IMAX".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        schedule.delete_venue(dropped.id).unwrap();
        let added = schedule.add_venue(new_venue("Metro"), now);

        let diff = changes(before.venues(), schedule.venues(), |v| v.id);
        let upserted: Vec<Uuid> = diff.upserted.iter().map(|v| v.id).collect();
        assert_eq!(upserted, vec![renamed.id, added.id]);
        assert_eq!(diff.removed, vec![dropped.id]);
        assert!(!upserted.contains(&kept.id));

        assert!(changes(schedule.venues(), schedule.venues(), |v| v.id).is_empty());
    }

    #[test]
    fn test_collections_in_save_order() {
        let order = Collection::in_order(&[Collection::Calendar, Collection::Venues, Collection::Calendar]);
        assert_eq!(order, vec![Collection::Venues, Collection::Calendar]);
    }
}
