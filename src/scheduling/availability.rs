//! Reconciles slot templates, calendar overrides and bookings for one date

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    calendar::CalendarStore,
    time::{to_minutes, weekday_of},
};
use crate::{
    error::{AppError, AppResult},
    models::{Booking, BookingStatus, DayStatus, TimeSlot, Weekday},
};

/// Display state of a slot on a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Available,
    /// Held by a confirmed booking
    Booked,
    Pending,
    Completed,
}

impl From<BookingStatus> for SlotState {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Confirmed => SlotState::Booked,
            BookingStatus::Pending => SlotState::Pending,
            BookingStatus::Completed => SlotState::Completed,
            // cancelled bookings never reach the resolver
            BookingStatus::Cancelled => SlotState::Available,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SlotAvailability {
    pub slot: TimeSlot,
    pub state: SlotState,
    /// The booking holding the slot, if any
    pub booking: Option<Booking>,
}

/// Availability of one venue on one date
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayAvailability {
    pub venue_id: Uuid,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub day_status: DayStatus,
    /// False when the venue is deactivated; its slots are then not listed
    pub venue_active: bool,
    pub slots: Vec<SlotAvailability>,
    pub available: usize,
    pub booked: usize,
    pub pending: usize,
}

impl DayAvailability {
    pub fn new(venue_id: Uuid, date: NaiveDate, day_status: DayStatus, slots: Vec<SlotAvailability>) -> Self {
        let count = |state: SlotState| slots.iter().filter(|s| s.state == state).count();
        Self {
            venue_id,
            date,
            weekday: weekday_of(date),
            day_status,
            venue_active: true,
            available: count(SlotState::Available),
            booked: count(SlotState::Booked) + count(SlotState::Completed),
            pending: count(SlotState::Pending),
            slots,
        }
    }
}

/// Classify each of the venue's slots for `date`.
///
/// Holiday and blocked dates yield no slots at all. More than one active
/// booking for the same slot and date is reported as an integrity error.
pub fn resolve(
    slots: &[TimeSlot],
    bookings: &[Booking],
    calendar: &CalendarStore,
    venue_id: Uuid,
    date: NaiveDate,
) -> AppResult<Vec<SlotAvailability>> {
    let weekday = weekday_of(date);
    let day_status = calendar.get_status(Some(venue_id), date);
    if day_status.is_closed() {
        tracing::debug!("Venue {} closed on {} ({})", venue_id, date, day_status);
        return Ok(Vec::new());
    }

    let mut candidates: Vec<&TimeSlot> = slots
        .iter()
        .filter(|s| s.venue_id == venue_id && s.day == weekday)
        .collect();
    candidates.sort_by_key(|s| to_minutes(&s.start_time).unwrap_or(u32::MAX));

    let mut active: HashMap<Uuid, Vec<&Booking>> = HashMap::new();
    for booking in bookings {
        if booking.date == date && booking.status.is_active() {
            active.entry(booking.slot_id).or_default().push(booking);
        }
    }

    let mut result = Vec::with_capacity(candidates.len());
    for slot in candidates {
        let holders = active.get(&slot.id).map(Vec::as_slice).unwrap_or(&[]);
        let entry = match holders {
            [] => SlotAvailability {
                slot: slot.clone(),
                state: SlotState::Available,
                booking: None,
            },
            [booking] => SlotAvailability {
                slot: slot.clone(),
                state: SlotState::from(booking.status),
                booking: Some((*booking).clone()),
            },
            many => {
                let ids: Vec<String> = many.iter().map(|b| b.id.to_string()).collect();
                tracing::error!(
                    "Slot {} has {} active bookings on {}: {}",
                    slot.id,
                    many.len(),
                    date,
                    ids.join(", ")
                );
                return Err(AppError::Integrity(format!(
                    "Slot {} has {} active bookings on {}",
                    slot.id,
                    many.len(),
                    date
                )));
            }
        };
        result.push(entry);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::PaymentStatus,
        scheduling::calendar::CalendarScope,
    };
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn slot(venue_id: Uuid, day: Weekday, start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            id: Uuid::new_v4(),
            venue_id,
            day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            price: Decimal::from(500),
            max_capacity: None,
            is_special_event: false,
            notes: None,
        }
    }

    fn booking(slot: &TimeSlot, on: NaiveDate, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            slot_id: slot.id,
            venue_id: slot.venue_id,
            customer_id: None,
            customer_name: "Asha".to_string(),
            customer_phone: "9800000000".to_string(),
            customer_email: None,
            date: on,
            number_of_people: 2,
            total_amount: Decimal::from(1000),
            status,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            booking_time: Utc::now(),
            notes: None,
        }
    }

    fn calendar() -> CalendarStore {
        CalendarStore::new(CalendarScope::Global, DayStatus::Available)
    }

    #[test]
    fn test_reconciles_bookings() {
        let venue = Uuid::new_v4();
        let ten = slot(venue, Weekday::Monday, "10:00", "11:00");
        let nine = slot(venue, Weekday::Monday, "09:00", "10:00");
        let eleven = slot(venue, Weekday::Monday, "11:00", "12:00");
        let tuesday = slot(venue, Weekday::Tuesday, "09:00", "10:00");
        let monday = date("2024-06-03");
        let slots = vec![ten.clone(), nine.clone(), eleven.clone(), tuesday];
        let bookings = vec![
            booking(&ten, monday, BookingStatus::Confirmed),
            booking(&eleven, monday, BookingStatus::Pending),
            booking(&nine, monday, BookingStatus::Cancelled),
            booking(&nine, date("2024-06-10"), BookingStatus::Confirmed),
        ];

        let result = resolve(&slots, &bookings, &calendar(), venue, monday).unwrap();
        let states: Vec<(&str, SlotState)> = result
            .iter()
            .map(|r| (r.slot.start_time.as_str(), r.state))
            .collect();
        assert_eq!(
            states,
            vec![
                ("09:00", SlotState::Available),
                ("10:00", SlotState::Booked),
                ("11:00", SlotState::Pending),
            ]
        );
        assert!(result[0].booking.is_none());
        assert_eq!(result[1].booking.as_ref().unwrap().slot_id, ten.id);

        let summary = DayAvailability::new(venue, monday, DayStatus::Available, result);
        assert_eq!((summary.available, summary.booked, summary.pending), (1, 1, 1));
        assert_eq!(summary.weekday, Weekday::Monday);
    }

    #[test]
    fn test_holiday_hides_all_slots() {
        let venue = Uuid::new_v4();
        let slots = vec![slot(venue, Weekday::Monday, "09:00", "10:00")];
        let mut cal = calendar();
        cal.set_status(None, date("2024-06-10"), DayStatus::Holiday, None);

        let result = resolve(&slots, &[], &cal, venue, date("2024-06-10")).unwrap();
        assert!(result.is_empty());

        cal.set_status(None, date("2024-06-10"), DayStatus::Blocked, None);
        assert!(resolve(&slots, &[], &cal, venue, date("2024-06-10")).unwrap().is_empty());

        // the following Monday is unaffected
        assert_eq!(resolve(&slots, &[], &cal, venue, date("2024-06-17")).unwrap().len(), 1);
    }

    #[test]
    fn test_double_booking_is_integrity_error() {
        let venue = Uuid::new_v4();
        let s = slot(venue, Weekday::Monday, "09:00", "10:00");
        let monday = date("2024-06-03");
        let bookings = vec![
            booking(&s, monday, BookingStatus::Confirmed),
            booking(&s, monday, BookingStatus::Pending),
        ];
        let result = resolve(&[s], &bookings, &calendar(), venue, monday);
        assert!(matches!(result, Err(AppError::Integrity(_))));
    }

    #[test]
    fn test_other_venues_excluded() {
        let venue = Uuid::new_v4();
        let other = Uuid::new_v4();
        let slots = vec![
            slot(venue, Weekday::Monday, "09:00", "10:00"),
            slot(other, Weekday::Monday, "09:00", "10:00"),
        ];
        let result = resolve(&slots, &[], &calendar(), venue, date("2024-06-03")).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].slot.venue_id, venue);
    }
}
