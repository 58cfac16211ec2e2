//! PostgreSQL backend
//!
//! A save runs in one transaction covering every touched collection. Venues,
//! slots and bookings write only the rows that changed since the previous
//! state; the calendar is rewritten in full.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use super::{changes, Changes, Collection, Persistence};
use crate::{
    error::AppResult,
    models::{Booking, CalendarDay, TimeSlot, Venue},
    scheduling::Schedule,
};

#[derive(Clone)]
pub struct PgPersistence {
    pool: Pool<Postgres>,
}

impl PgPersistence {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Persistence for PgPersistence {
    async fn load_venues(&self) -> AppResult<Vec<Venue>> {
        let rows = sqlx::query_as::<_, Venue>("SELECT * FROM venues ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn load_slots(&self) -> AppResult<Vec<TimeSlot>> {
        let rows = sqlx::query_as::<_, TimeSlot>(
            r#"
            SELECT id, venue_id, day, start_time, end_time, price,
                   max_capacity, is_special_event, notes
            FROM time_slots
            ORDER BY venue_id, day_index, start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn load_bookings(&self) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY booking_time, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn load_calendar(&self) -> AppResult<Vec<CalendarDay>> {
        let rows = sqlx::query_as::<_, CalendarDay>(
            "SELECT date, venue_id, status, note FROM calendar_days ORDER BY date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn save(&self, before: &Schedule, after: &Schedule, touched: &[Collection]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        for collection in Collection::in_order(touched) {
            match collection {
                Collection::Venues => {
                    save_venues(&mut tx, changes(before.venues(), after.venues(), |v| v.id)).await?
                }
                Collection::Slots => {
                    save_slots(&mut tx, changes(before.slots(), after.slots(), |s| s.id)).await?
                }
                Collection::Bookings => {
                    save_bookings(&mut tx, changes(before.bookings(), after.bookings(), |b| b.id)).await?
                }
                Collection::Calendar => save_calendar(&mut tx, &after.calendar().days()).await?,
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

async fn delete_rows(tx: &mut Transaction<'_, Postgres>, table: &str, ids: &[Uuid]) -> AppResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let removed = sqlx::query(&format!("DELETE FROM {} WHERE id = ANY($1)", table))
        .bind(ids)
        .execute(&mut **tx)
        .await?
        .rows_affected();
    Ok(removed)
}

async fn save_venues(tx: &mut Transaction<'_, Postgres>, changes: Changes<'_, Venue>) -> AppResult<()> {
    // slots, bookings and venue calendar rows follow through ON DELETE CASCADE
    let removed = delete_rows(tx, "venues", &changes.removed).await?;

    for venue in &changes.upserted {
        sqlx::query(
            r#"
            INSERT INTO venues (
                id, kind, name, location, capacity, units, amenities, is_active,
                description, contact_number, address, image_url, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                kind = EXCLUDED.kind,
                name = EXCLUDED.name,
                location = EXCLUDED.location,
                capacity = EXCLUDED.capacity,
                units = EXCLUDED.units,
                amenities = EXCLUDED.amenities,
                is_active = EXCLUDED.is_active,
                description = EXCLUDED.description,
                contact_number = EXCLUDED.contact_number,
                address = EXCLUDED.address,
                image_url = EXCLUDED.image_url
            "#,
        )
        .bind(venue.id)
        .bind(venue.kind)
        .bind(&venue.name)
        .bind(&venue.location)
        .bind(venue.capacity)
        .bind(venue.units)
        .bind(&venue.amenities)
        .bind(venue.is_active)
        .bind(&venue.description)
        .bind(&venue.contact_number)
        .bind(&venue.address)
        .bind(&venue.image_url)
        .bind(venue.created_at)
        .execute(&mut **tx)
        .await?;
    }

    tracing::debug!("Saved {} venues, removed {}", changes.upserted.len(), removed);
    Ok(())
}

async fn save_slots(tx: &mut Transaction<'_, Postgres>, changes: Changes<'_, TimeSlot>) -> AppResult<()> {
    let removed = delete_rows(tx, "time_slots", &changes.removed).await?;

    for slot in &changes.upserted {
        sqlx::query(
            r#"
            INSERT INTO time_slots (
                id, venue_id, day, day_index, start_time, end_time, price,
                max_capacity, is_special_event, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                price = EXCLUDED.price,
                max_capacity = EXCLUDED.max_capacity,
                is_special_event = EXCLUDED.is_special_event,
                notes = EXCLUDED.notes
            "#,
        )
        .bind(slot.id)
        .bind(slot.venue_id)
        .bind(slot.day)
        .bind(slot.day.index() as i16)
        .bind(&slot.start_time)
        .bind(&slot.end_time)
        .bind(slot.price)
        .bind(slot.max_capacity)
        .bind(slot.is_special_event)
        .bind(&slot.notes)
        .execute(&mut **tx)
        .await?;
    }

    tracing::debug!("Saved {} slots, removed {}", changes.upserted.len(), removed);
    Ok(())
}

async fn save_bookings(tx: &mut Transaction<'_, Postgres>, mut changes: Changes<'_, Booking>) -> AppResult<()> {
    let removed = delete_rows(tx, "bookings", &changes.removed).await?;

    // Cancellations first, so a replacement booking for the same slot and
    // date never meets the active-booking unique index
    changes.upserted.sort_by_key(|b| b.status.is_active());

    for booking in &changes.upserted {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, slot_id, venue_id, customer_id, customer_name, customer_phone,
                customer_email, date, number_of_people, total_amount, status,
                payment_status, payment_method, booking_time, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                payment_status = EXCLUDED.payment_status,
                payment_method = EXCLUDED.payment_method,
                notes = EXCLUDED.notes
            "#,
        )
        .bind(booking.id)
        .bind(booking.slot_id)
        .bind(booking.venue_id)
        .bind(&booking.customer_id)
        .bind(&booking.customer_name)
        .bind(&booking.customer_phone)
        .bind(&booking.customer_email)
        .bind(booking.date)
        .bind(booking.number_of_people)
        .bind(booking.total_amount)
        .bind(booking.status)
        .bind(booking.payment_status)
        .bind(booking.payment_method)
        .bind(booking.booking_time)
        .bind(&booking.notes)
        .execute(&mut **tx)
        .await?;
    }

    tracing::debug!("Saved {} bookings, removed {}", changes.upserted.len(), removed);
    Ok(())
}

async fn save_calendar(tx: &mut Transaction<'_, Postgres>, days: &[CalendarDay]) -> AppResult<()> {
    sqlx::query("DELETE FROM calendar_days")
        .execute(&mut **tx)
        .await?;
    for day in days {
        sqlx::query("INSERT INTO calendar_days (date, venue_id, status, note) VALUES ($1, $2, $3, $4)")
            .bind(day.date)
            .bind(day.venue_id)
            .bind(day.status)
            .bind(&day.note)
            .execute(&mut **tx)
            .await?;
    }

    tracing::debug!("Saved {} calendar days", days.len());
    Ok(())
}
