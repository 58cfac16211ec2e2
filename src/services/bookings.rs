//! Bookings service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        booking::{BookingQuery, CreateBooking, UpdatePayment},
        Booking, BookingStatus, NewBooking, PaymentStatus,
    },
    repository::{Collection, Repository},
    scheduling::time::parse_date,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Book a slot for one date, stamped with the current time.
    /// `customer_id` links the booking to a customer account.
    pub async fn create(&self, data: CreateBooking, customer_id: Option<String>) -> AppResult<Booking> {
        let request = NewBooking {
            slot_id: data.slot_id,
            date: parse_date(&data.date)?,
            customer_id,
            customer: data.customer,
            number_of_people: data.number_of_people,
            status: data.status.unwrap_or(BookingStatus::Confirmed),
            payment_status: data.payment_status.unwrap_or(PaymentStatus::Pending),
            payment_method: data.payment_method,
            notes: data.notes,
        };
        let now = self.repository.now();
        self.repository
            .write(&[Collection::Bookings], move |s| s.create_booking(request, now))
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Booking> {
        self.repository.read(|s| s.booking(id).cloned()).await
    }

    pub async fn cancel(&self, id: Uuid) -> AppResult<Booking> {
        self.repository
            .write(&[Collection::Bookings], |s| s.cancel_booking(id))
            .await
    }

    pub async fn confirm(&self, id: Uuid) -> AppResult<Booking> {
        self.repository
            .write(&[Collection::Bookings], |s| s.confirm_booking(id))
            .await
    }

    pub async fn complete(&self, id: Uuid) -> AppResult<Booking> {
        let today = self.repository.today();
        self.repository
            .write(&[Collection::Bookings], |s| s.complete_booking(id, today))
            .await
    }

    pub async fn update_payment(&self, id: Uuid, data: UpdatePayment) -> AppResult<Booking> {
        self.repository
            .write(&[Collection::Bookings], |s| {
                s.update_payment(id, data.payment_status, data.payment_method)
            })
            .await
    }

    /// Bookings of one customer account, most recent date first
    pub async fn for_customer(&self, customer_id: &str) -> AppResult<Vec<Booking>> {
        self.repository.read(|s| Ok(s.customer_bookings(customer_id))).await
    }

    /// Bookings of a venue, optionally on one date and in one status
    pub async fn for_venue(&self, venue_id: Uuid, query: &BookingQuery) -> AppResult<Vec<Booking>> {
        let date = query.date.as_deref().map(parse_date).transpose()?;
        let status = query.status;
        self.repository
            .read(|s| s.venue_bookings(venue_id, date, status))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        config::SchedulingConfig,
        error::AppError,
        models::{time_slot::GenerateTimeSlots, venue::CreateVenue, CustomerInfo, VenueKind, Weekday},
        repository::MemoryPersistence,
        scheduling::FixedClock,
        services::{slots::SlotsService, venues::VenuesService},
    };

    fn booking(slot_id: Uuid, n: usize) -> CreateBooking {
        CreateBooking {
            slot_id,
            date: "2024-06-07".to_string(),
            customer: CustomerInfo {
                name: format!("Guest {}", n),
                phone: format!("98000{:05}", n),
                email: None,
            },
            number_of_people: 1,
            status: None,
            payment_status: None,
            payment_method: None,
            notes: None,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_yield_one_booking() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let repository = Repository::load(
            Arc::new(MemoryPersistence::default()),
            Arc::new(clock),
            &SchedulingConfig::default(),
        )
        .await
        .unwrap();

        let venue = VenuesService::new(repository.clone())
            .create(CreateVenue {
                kind: VenueKind::Theater,
                name: "Galaxy".to_string(),
                location: "Mumbai".to_string(),
                capacity: 80,
                units: 1,
                amenities: Vec::new(),
                is_active: None,
                description: None,
                contact_number: None,
                address: None,
                image_url: None,
            })
            .await
            .unwrap();
        let slots = SlotsService::new(repository.clone())
            .generate(
                venue.id,
                GenerateTimeSlots {
                    days: vec![Weekday::Friday],
                    start_time: "18:00".to_string(),
                    end_time: "21:00".to_string(),
                    interval_minutes: 180,
                    price: Decimal::from(300),
                    max_capacity: None,
                    notes: None,
                    allow_overlap: false,
                },
            )
            .await
            .unwrap();
        let slot_id = slots[0].id;

        let service = BookingsService::new(repository.clone());
        let handles: Vec<_> = (0..32)
            .map(|n| {
                let service = service.clone();
                tokio::spawn(async move { service.create(booking(slot_id, n), None).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 31);

        let active = repository
            .read(|s| Ok(s.bookings().iter().filter(|b| b.status.is_active()).count()))
            .await
            .unwrap();
        assert_eq!(active, 1);
    }
}
