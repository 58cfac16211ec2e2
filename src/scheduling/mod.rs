//! Slot scheduling engine
//!
//! Synchronous core shared by every service: time arithmetic, weekly slot
//! generation, the day-status calendar, availability resolution and booking
//! aggregates. [`Schedule`] owns the records and applies every mutation;
//! persistence and locking live in the repository layer.

pub mod availability;
pub mod calendar;
pub mod clock;
pub mod generator;
pub mod reports;
pub mod time;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub use availability::{DayAvailability, SlotAvailability, SlotState};
pub use calendar::{CalendarScope, CalendarStore};
pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::SlotRule;
pub use reports::TimeBucket;

use crate::{
    error::{AppError, AppResult, Missing},
    models::{
        calendar::DayStatusView,
        time_slot::{CreateTimeSlot, UpdateTimeSlot},
        venue::{CreateVenue, UpdateVenue},
        Booking, BookingStatus, CalendarDay, DayStatus, NewBooking, PaymentMethod, PaymentStatus,
        TimeSlot, Venue, Weekday,
    },
};
use reports::{AnalyticsSummary, PeriodUtilization, VenueOverview};

/// How a booking total is derived from the slot price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPolicy {
    /// Slot price times number of people
    #[default]
    PerPerson,
    /// Slot price once, whatever the party size
    Flat,
}

impl PricingPolicy {
    pub fn total(&self, price: Decimal, people: i32) -> Decimal {
        match self {
            PricingPolicy::PerPerson => price * Decimal::from(people),
            PricingPolicy::Flat => price,
        }
    }
}

/// Records removed together with a venue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CascadeReport {
    pub slots: usize,
    pub bookings: usize,
    pub calendar_days: usize,
}

/// The authoritative set of venues, slots, bookings and calendar overrides
#[derive(Debug, Clone)]
pub struct Schedule {
    venues: Vec<Venue>,
    slots: Vec<TimeSlot>,
    bookings: Vec<Booking>,
    calendar: CalendarStore,
    pricing: PricingPolicy,
}

impl Schedule {
    pub fn new(calendar: CalendarStore, pricing: PricingPolicy) -> Self {
        Self::from_records(Vec::new(), Vec::new(), Vec::new(), calendar, pricing)
    }

    pub fn from_records(
        venues: Vec<Venue>,
        slots: Vec<TimeSlot>,
        bookings: Vec<Booking>,
        calendar: CalendarStore,
        pricing: PricingPolicy,
    ) -> Self {
        Self {
            venues,
            slots,
            bookings,
            calendar,
            pricing,
        }
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn calendar(&self) -> &CalendarStore {
        &self.calendar
    }

    pub fn pricing(&self) -> PricingPolicy {
        self.pricing
    }

    // ---- Venues ----

    pub fn venue(&self, id: Uuid) -> AppResult<&Venue> {
        self.venues
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| AppError::not_found(Missing::Venue, id))
    }

    pub fn add_venue(&mut self, data: CreateVenue, now: DateTime<Utc>) -> Venue {
        let venue = Venue::from_request(data, now);
        tracing::info!("Venue {} created ({})", venue.id, venue.name);
        self.venues.push(venue.clone());
        venue
    }

    pub fn update_venue(&mut self, id: Uuid, data: UpdateVenue) -> AppResult<Venue> {
        let venue = self
            .venues
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| AppError::not_found(Missing::Venue, id))?;
        venue.apply(data);
        Ok(venue.clone())
    }

    /// Delete a venue with its slots, their bookings and its calendar overrides
    pub fn delete_venue(&mut self, id: Uuid) -> AppResult<CascadeReport> {
        self.venue(id)?;

        let slot_ids: Vec<Uuid> = self
            .slots
            .iter()
            .filter(|s| s.venue_id == id)
            .map(|s| s.id)
            .collect();

        let bookings_before = self.bookings.len();
        self.bookings
            .retain(|b| b.venue_id != id && !slot_ids.contains(&b.slot_id));
        self.slots.retain(|s| s.venue_id != id);
        self.venues.retain(|v| v.id != id);

        let report = CascadeReport {
            slots: slot_ids.len(),
            bookings: bookings_before - self.bookings.len(),
            calendar_days: self.calendar.remove_venue(id),
        };
        tracing::info!(
            "Venue {} deleted with {} slots, {} bookings, {} calendar days",
            id,
            report.slots,
            report.bookings,
            report.calendar_days
        );
        Ok(report)
    }

    // ---- Slots ----

    pub fn slot(&self, id: Uuid) -> AppResult<&TimeSlot> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found(Missing::Slot, id))
    }

    /// Slots of a venue ordered by weekday then start time
    pub fn venue_slots(&self, venue_id: Uuid) -> AppResult<Vec<TimeSlot>> {
        self.venue(venue_id)?;
        Ok(generator::group_slots_by_day(&self.slots)
            .into_values()
            .flatten()
            .filter(|s| s.venue_id == venue_id)
            .collect())
    }

    /// Expand a rule and store the result.
    ///
    /// Unless `allow_overlap` is set, nothing is stored when any generated slot
    /// overlaps an existing slot of the venue.
    pub fn add_generated_slots(&mut self, rule: &SlotRule, allow_overlap: bool) -> AppResult<Vec<TimeSlot>> {
        self.venue(rule.venue_id)?;
        let generated = generator::generate_slots(rule)?;

        if !allow_overlap {
            for slot in &generated {
                let range = (time::to_minutes(&slot.start_time)?, time::to_minutes(&slot.end_time)?);
                if let Some(existing) =
                    generator::find_overlap(&self.slots, rule.venue_id, slot.day, range, None)?
                {
                    tracing::warn!(
                        "Generated slot {} {}-{} overlaps slot {}",
                        slot.day,
                        slot.start_time,
                        slot.end_time,
                        existing.id
                    );
                    return Err(AppError::Overlap(format!(
                        "{} {}-{} overlaps existing slot {}-{}",
                        slot.day, slot.start_time, slot.end_time, existing.start_time, existing.end_time
                    )));
                }
            }
        }

        tracing::info!("Generated {} slots for venue {}", generated.len(), rule.venue_id);
        self.slots.extend(generated.iter().cloned());
        Ok(generated)
    }

    pub fn create_slot(&mut self, venue_id: Uuid, data: CreateTimeSlot) -> AppResult<TimeSlot> {
        self.venue(venue_id)?;
        let range = time::parse_range(&data.start_time, &data.end_time)?;
        check_price(data.price)?;
        self.check_overlap(venue_id, data.day, range, None)?;

        let slot = TimeSlot {
            id: Uuid::new_v4(),
            venue_id,
            day: data.day,
            start_time: time::to_time_string(range.0),
            end_time: time::to_time_string(range.1),
            price: data.price,
            max_capacity: data.max_capacity,
            is_special_event: data.is_special_event,
            notes: data.notes,
        };
        tracing::info!("Slot {} created for venue {}", slot.id, venue_id);
        self.slots.push(slot.clone());
        Ok(slot)
    }

    /// Edit time range, price and display fields of a slot
    pub fn update_slot(&mut self, id: Uuid, data: UpdateTimeSlot) -> AppResult<TimeSlot> {
        let current = self.slot(id)?.clone();
        let start = data.start_time.as_deref().unwrap_or(&current.start_time);
        let end = data.end_time.as_deref().unwrap_or(&current.end_time);
        let range = time::parse_range(start, end)?;
        if let Some(price) = data.price {
            check_price(price)?;
        }
        self.check_overlap(current.venue_id, current.day, range, Some(id))?;

        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found(Missing::Slot, id))?;
        slot.start_time = time::to_time_string(range.0);
        slot.end_time = time::to_time_string(range.1);
        if let Some(price) = data.price {
            slot.price = price;
        }
        if data.max_capacity.is_some() {
            slot.max_capacity = data.max_capacity;
        }
        if let Some(special) = data.is_special_event {
            slot.is_special_event = special;
        }
        if data.notes.is_some() {
            slot.notes = data.notes;
        }
        Ok(slot.clone())
    }

    /// Delete a slot and its bookings, returning the number of bookings removed
    pub fn delete_slot(&mut self, id: Uuid) -> AppResult<usize> {
        self.slot(id)?;
        let before = self.bookings.len();
        self.bookings.retain(|b| b.slot_id != id);
        self.slots.retain(|s| s.id != id);
        let removed = before - self.bookings.len();
        tracing::info!("Slot {} deleted with {} bookings", id, removed);
        Ok(removed)
    }

    fn check_overlap(
        &self,
        venue_id: Uuid,
        day: Weekday,
        range: (u32, u32),
        ignore: Option<Uuid>,
    ) -> AppResult<()> {
        match generator::find_overlap(&self.slots, venue_id, day, range, ignore)? {
            Some(existing) => Err(AppError::Overlap(format!(
                "{} {}-{} overlaps existing slot {}-{}",
                day,
                time::to_time_string(range.0),
                time::to_time_string(range.1),
                existing.start_time,
                existing.end_time
            ))),
            None => Ok(()),
        }
    }

    // ---- Availability ----

    /// Slot states of a venue on `date`. A deactivated venue lists no slots.
    pub fn resolve_availability(&self, venue_id: Uuid, date: NaiveDate) -> AppResult<DayAvailability> {
        let venue = self.venue(venue_id)?;
        let day_status = self.calendar.get_status(Some(venue_id), date);
        if !venue.is_active {
            let mut availability = DayAvailability::new(venue_id, date, day_status, Vec::new());
            availability.venue_active = false;
            return Ok(availability);
        }
        let slots = availability::resolve(&self.slots, &self.bookings, &self.calendar, venue_id, date)?;
        Ok(DayAvailability::new(venue_id, date, day_status, slots))
    }

    // ---- Bookings ----

    pub fn booking(&self, id: Uuid) -> AppResult<&Booking> {
        self.bookings
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(Missing::Booking, id))
    }

    /// Book a slot for one date.
    ///
    /// Fails with `Conflict` when the slot already holds a non-cancelled
    /// booking for that date.
    pub fn create_booking(&mut self, request: NewBooking, now: DateTime<Utc>) -> AppResult<Booking> {
        let slot = self.slot(request.slot_id)?;
        let venue = self.venue(slot.venue_id)?;
        let today = now.date_naive();

        if !venue.is_active {
            return Err(AppError::InvalidArgument(format!(
                "{} is not accepting bookings",
                venue.name
            )));
        }
        if request.date < today {
            return Err(AppError::InvalidArgument(format!(
                "Cannot book {} which is in the past",
                request.date
            )));
        }
        let weekday = time::weekday_of(request.date);
        if weekday != slot.day {
            return Err(AppError::InvalidArgument(format!(
                "Slot runs on {} but {} is a {}",
                slot.day, request.date, weekday
            )));
        }
        let day_status = self.calendar.get_status(Some(venue.id), request.date);
        if day_status.is_closed() {
            return Err(AppError::InvalidArgument(format!(
                "{} is closed on {} ({})",
                venue.name, request.date, day_status
            )));
        }

        let max_people = slot.max_capacity.unwrap_or(venue.capacity);
        if request.number_of_people < 1 || request.number_of_people > max_people {
            return Err(AppError::InvalidArgument(format!(
                "Number of people must be between 1 and {}",
                max_people
            )));
        }
        if !request.status.is_active() || request.status == BookingStatus::Completed {
            return Err(AppError::InvalidArgument(format!(
                "A new booking cannot start as {}",
                request.status
            )));
        }

        if let Some(existing) = self
            .bookings
            .iter()
            .find(|b| b.slot_id == slot.id && b.date == request.date && b.status.is_active())
        {
            tracing::warn!(
                "Slot {} on {} already held by booking {}",
                slot.id,
                request.date,
                existing.id
            );
            return Err(AppError::Conflict(format!(
                "Slot {}-{} on {} is already booked",
                slot.start_time, slot.end_time, request.date
            )));
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            slot_id: slot.id,
            venue_id: venue.id,
            customer_id: request.customer_id,
            customer_name: request.customer.name.trim().to_string(),
            customer_phone: request.customer.phone.trim().to_string(),
            customer_email: request.customer.email,
            date: request.date,
            number_of_people: request.number_of_people,
            total_amount: self.pricing.total(slot.price, request.number_of_people),
            status: request.status,
            payment_status: request.payment_status,
            payment_method: request.payment_method,
            booking_time: now,
            notes: request.notes,
        };
        tracing::info!(
            "Booking {} created for slot {} on {} ({} people)",
            booking.id,
            booking.slot_id,
            booking.date,
            booking.number_of_people
        );
        self.bookings.push(booking.clone());
        Ok(booking)
    }

    /// Cancel a booking, releasing its slot for the date
    pub fn cancel_booking(&mut self, id: Uuid) -> AppResult<Booking> {
        self.transition(id, BookingStatus::Cancelled)
    }

    pub fn confirm_booking(&mut self, id: Uuid) -> AppResult<Booking> {
        self.transition(id, BookingStatus::Confirmed)
    }

    /// Mark a confirmed booking as completed once its date has arrived
    pub fn complete_booking(&mut self, id: Uuid, today: NaiveDate) -> AppResult<Booking> {
        let date = self.booking(id)?.date;
        if date > today {
            return Err(AppError::InvalidArgument(format!(
                "Booking {} cannot be completed before {}",
                id, date
            )));
        }
        self.transition(id, BookingStatus::Completed)
    }

    pub fn update_payment(
        &mut self,
        id: Uuid,
        status: PaymentStatus,
        method: Option<PaymentMethod>,
    ) -> AppResult<Booking> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(Missing::Booking, id))?;
        if booking.payment_status != status && !booking.payment_status.can_transition_to(status) {
            return Err(AppError::InvalidArgument(format!(
                "Payment of booking {} cannot go from {} to {}",
                id, booking.payment_status, status
            )));
        }
        booking.payment_status = status;
        if method.is_some() {
            booking.payment_method = method;
        }
        tracing::info!("Booking {} payment is now {}", id, status);
        Ok(booking.clone())
    }

    fn transition(&mut self, id: Uuid, next: BookingStatus) -> AppResult<Booking> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(Missing::Booking, id))?;
        if !booking.status.can_transition_to(next) {
            return Err(AppError::InvalidArgument(format!(
                "Booking {} cannot go from {} to {}",
                id, booking.status, next
            )));
        }
        booking.status = next;
        tracing::info!("Booking {} is now {}", id, next);
        Ok(booking.clone())
    }

    // ---- Calendar ----

    pub fn set_day_status(
        &mut self,
        venue_id: Option<Uuid>,
        date: NaiveDate,
        status: DayStatus,
        note: Option<String>,
    ) -> AppResult<CalendarDay> {
        if let Some(venue_id) = venue_id {
            self.venue(venue_id)?;
        }
        let day = self.calendar.set_status(venue_id, date, status, note);
        tracing::info!("Day {} set to {}", date, status);
        Ok(day)
    }

    pub fn clear_day_status(&mut self, venue_id: Option<Uuid>, date: NaiveDate) -> AppResult<CalendarDay> {
        self.calendar
            .clear_status(venue_id, date)
            .ok_or_else(|| AppError::not_found(Missing::CalendarDay, date))
    }

    pub fn day_status(&self, venue_id: Option<Uuid>, date: NaiveDate) -> DayStatusView {
        self.calendar.view(venue_id, date)
    }

    // ---- Reports ----

    /// Bookings of a venue, by date then start time
    pub fn venue_bookings(
        &self,
        venue_id: Uuid,
        date: Option<NaiveDate>,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        self.venue(venue_id)?;
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.venue_id == venue_id)
            .filter(|b| date.map_or(true, |d| b.date == d))
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        let start_of = |b: &Booking| {
            self.slots
                .iter()
                .find(|s| s.id == b.slot_id)
                .and_then(|s| time::to_minutes(&s.start_time).ok())
                .unwrap_or(u32::MAX)
        };
        bookings.sort_by_key(|b| (b.date, start_of(b)));
        Ok(bookings)
    }

    pub fn todays_bookings(&self, venue_id: Uuid, today: NaiveDate) -> AppResult<Vec<Booking>> {
        self.venue(venue_id)?;
        Ok(reports::todays_bookings(&self.bookings, venue_id, today))
    }

    pub fn payment_history(&self, venue_id: Uuid) -> AppResult<Vec<Booking>> {
        self.venue(venue_id)?;
        Ok(reports::payment_history(&self.bookings, venue_id))
    }

    pub fn customer_bookings(&self, customer_id: &str) -> Vec<Booking> {
        reports::customer_bookings(&self.bookings, customer_id)
    }

    pub fn overview(&self, venue_id: Uuid, today: NaiveDate) -> AppResult<VenueOverview> {
        let venue = self.venue(venue_id)?;
        let todays = reports::todays_bookings(&self.bookings, venue_id, today);
        let venue_bookings: Vec<&Booking> = self.bookings.iter().filter(|b| b.venue_id == venue_id).collect();
        Ok(VenueOverview {
            venue_id,
            name: venue.name.clone(),
            todays_revenue: reports::paid_revenue(&todays),
            total_revenue: reports::paid_revenue(venue_bookings.iter().copied()),
            todays_bookings: todays,
            availability: self.resolve_availability(venue_id, today)?,
        })
    }

    /// Utilization per time-of-day bucket, optionally limited to one venue
    /// and to the slots running on one date
    pub fn utilization(
        &self,
        venue_id: Option<Uuid>,
        date: Option<NaiveDate>,
        buckets: &[TimeBucket],
    ) -> AppResult<Vec<PeriodUtilization>> {
        if let Some(venue_id) = venue_id {
            self.venue(venue_id)?;
        }
        let weekday = date.map(time::weekday_of);
        let slots: Vec<TimeSlot> = self
            .slots
            .iter()
            .filter(|s| venue_id.map_or(true, |v| s.venue_id == v))
            .filter(|s| weekday.map_or(true, |w| s.day == w))
            .cloned()
            .collect();
        let bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| date.map_or(true, |d| b.date == d))
            .cloned()
            .collect();
        reports::utilization_by_period(&slots, &bookings, buckets)
    }

    pub fn analytics(&self, today: NaiveDate, months: u32) -> AnalyticsSummary {
        reports::analytics(&self.venues, &self.bookings, today, months)
    }
}

fn check_price(price: Decimal) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::InvalidArgument("Price cannot be negative".to_string()));
    }
    Ok(())
}
