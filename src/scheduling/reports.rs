//! Booking aggregates for dashboards: today's bookings, payments, revenue, utilization

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{availability::DayAvailability, time::to_minutes};
use crate::{
    error::AppResult,
    models::{Booking, BookingStatus, PaymentMethod, PaymentStatus, TimeSlot, Venue},
};

/// Bookings of a venue whose date is `today`
pub fn todays_bookings(bookings: &[Booking], venue_id: Uuid, today: NaiveDate) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|b| b.venue_id == venue_id && b.date == today)
        .cloned()
        .collect()
}

/// Paid bookings of a venue, most recent `booking_time` first.
/// Ties keep their stored order.
pub fn payment_history(bookings: &[Booking], venue_id: Uuid) -> Vec<Booking> {
    let mut paid: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.venue_id == venue_id && b.payment_status == PaymentStatus::Paid)
        .cloned()
        .collect();
    paid.sort_by(|a, b| b.booking_time.cmp(&a.booking_time));
    paid
}

/// Bookings made by one customer account, most recent date first
pub fn customer_bookings(bookings: &[Booking], customer_id: &str) -> Vec<Booking> {
    let mut mine: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.customer_id.as_deref() == Some(customer_id))
        .cloned()
        .collect();
    mine.sort_by(|a, b| b.date.cmp(&a.date).then(b.booking_time.cmp(&a.booking_time)));
    mine
}

/// Sum of `total_amount` over the given bookings
pub fn revenue<'a, I>(bookings: I) -> Decimal
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings.into_iter().map(|b| b.total_amount).sum()
}

/// Revenue counting paid bookings only
pub fn paid_revenue<'a, I>(bookings: I) -> Decimal
where
    I: IntoIterator<Item = &'a Booking>,
{
    revenue(
        bookings
            .into_iter()
            .filter(|b| b.payment_status == PaymentStatus::Paid),
    )
}

// ---------------------------------------------------------------------------
// Utilization
// ---------------------------------------------------------------------------

/// Time-of-day bucket, `[start, end)`. A bucket whose end is not after its
/// start wraps past midnight (e.g. 21:00-06:00).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeBucket {
    pub label: String,
    pub start: String,
    pub end: String,
}

impl TimeBucket {
    pub fn new(label: &str, start: &str, end: &str) -> Self {
        Self {
            label: label.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    fn contains(&self, minute: u32) -> AppResult<bool> {
        let start = to_minutes(&self.start)?;
        let end = to_minutes(&self.end)?;
        Ok(if start < end {
            minute >= start && minute < end
        } else {
            minute >= start || minute < end
        })
    }
}

/// Morning / afternoon / evening / night
pub fn default_buckets() -> Vec<TimeBucket> {
    vec![
        TimeBucket::new("morning", "06:00", "12:00"),
        TimeBucket::new("afternoon", "12:00", "17:00"),
        TimeBucket::new("evening", "17:00", "21:00"),
        TimeBucket::new("night", "21:00", "06:00"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PeriodUtilization {
    pub label: String,
    pub total_slots: usize,
    pub occupied_slots: usize,
    /// occupied / total, 0 when the bucket has no slots
    pub rate: f64,
}

/// Count slots per bucket (by start time, first matching bucket) and how many of
/// them hold at least one non-cancelled booking in `bookings`.
pub fn utilization_by_period(
    slots: &[TimeSlot],
    bookings: &[Booking],
    buckets: &[TimeBucket],
) -> AppResult<Vec<PeriodUtilization>> {
    let occupied: HashSet<Uuid> = bookings
        .iter()
        .filter(|b| b.status.is_active())
        .map(|b| b.slot_id)
        .collect();

    let mut totals = vec![(0usize, 0usize); buckets.len()];
    for slot in slots {
        let minute = to_minutes(&slot.start_time)?;
        for (idx, bucket) in buckets.iter().enumerate() {
            if bucket.contains(minute)? {
                totals[idx].0 += 1;
                if occupied.contains(&slot.id) {
                    totals[idx].1 += 1;
                }
                break;
            }
        }
    }

    Ok(buckets
        .iter()
        .zip(totals)
        .map(|(bucket, (total, used))| PeriodUtilization {
            label: bucket.label.clone(),
            total_slots: total,
            occupied_slots: used,
            rate: if total == 0 { 0.0 } else { used as f64 / total as f64 },
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Analytics rollups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatEntry {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VenueRevenue {
    pub venue_id: Uuid,
    pub name: String,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub bookings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyRevenue {
    /// YYYY-MM
    pub month: String,
    #[schema(value_type = String)]
    pub revenue: Decimal,
    pub bookings: usize,
}

/// Paid revenue per venue, in venue order
pub fn revenue_by_venue(venues: &[Venue], bookings: &[Booking]) -> Vec<VenueRevenue> {
    venues
        .iter()
        .map(|venue| {
            let paid: Vec<&Booking> = bookings
                .iter()
                .filter(|b| b.venue_id == venue.id && b.payment_status == PaymentStatus::Paid)
                .collect();
            VenueRevenue {
                venue_id: venue.id,
                name: venue.name.clone(),
                revenue: revenue(paid.iter().copied()),
                bookings: paid.len(),
            }
        })
        .collect()
}

/// Paid revenue per calendar month of `booking_time`, for the `months` months
/// ending with the month of `today`, oldest first. Empty months are included.
pub fn monthly_revenue(bookings: &[Booking], today: NaiveDate, months: u32) -> Vec<MonthlyRevenue> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..months as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            let (year, month) = (index.div_euclid(12), index.rem_euclid(12) as u32 + 1);
            let in_month: Vec<&Booking> = bookings
                .iter()
                .filter(|b| b.payment_status == PaymentStatus::Paid)
                .filter(|b| b.booking_time.year() == year && b.booking_time.month() == month)
                .collect();
            MonthlyRevenue {
                month: format!("{:04}-{:02}", year, month),
                revenue: revenue(in_month.iter().copied()),
                bookings: in_month.len(),
            }
        })
        .collect()
}

pub fn status_breakdown(bookings: &[Booking]) -> Vec<StatEntry> {
    [
        BookingStatus::Confirmed,
        BookingStatus::Pending,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ]
    .into_iter()
    .map(|status| StatEntry {
        label: status.to_string(),
        value: bookings.iter().filter(|b| b.status == status).count() as i64,
    })
    .collect()
}

pub fn payment_method_breakdown(bookings: &[Booking]) -> Vec<StatEntry> {
    [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Upi,
        PaymentMethod::Online,
        PaymentMethod::Wallet,
    ]
    .into_iter()
    .map(|method| StatEntry {
        label: method.to_string(),
        value: bookings
            .iter()
            .filter(|b| b.payment_method == Some(method))
            .count() as i64,
    })
    .collect()
}

/// Distinct customers, identified by phone number
pub fn unique_customers(bookings: &[Booking]) -> usize {
    bookings
        .iter()
        .map(|b| b.customer_phone.trim())
        .collect::<HashSet<_>>()
        .len()
}

/// Dashboard view of one venue for today
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueOverview {
    pub venue_id: Uuid,
    pub name: String,
    pub todays_bookings: Vec<Booking>,
    /// Paid revenue of today's bookings
    #[schema(value_type = String)]
    pub todays_revenue: Decimal,
    /// Paid revenue over all bookings of the venue
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub availability: DayAvailability,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyticsSummary {
    /// Paid revenue across all venues
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
    pub total_bookings: usize,
    pub confirmed_bookings: usize,
    pub unique_customers: usize,
    pub revenue_by_venue: Vec<VenueRevenue>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub by_status: Vec<StatEntry>,
    pub by_payment_method: Vec<StatEntry>,
}

pub fn analytics(venues: &[Venue], bookings: &[Booking], today: NaiveDate, months: u32) -> AnalyticsSummary {
    AnalyticsSummary {
        total_revenue: paid_revenue(bookings),
        total_bookings: bookings.len(),
        confirmed_bookings: bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .count(),
        unique_customers: unique_customers(bookings),
        revenue_by_venue: revenue_by_venue(venues, bookings),
        monthly_revenue: monthly_revenue(bookings, today, months),
        by_status: status_breakdown(bookings),
        by_payment_method: payment_method_breakdown(bookings),
    }
}
