//! Weekly slot generation from a recurrence rule

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::time::{parse_range, ranges_overlap, to_minutes, to_time_string};
use crate::{
    error::{AppError, AppResult},
    models::{TimeSlot, Weekday},
};

/// Recurrence rule: every `interval_minutes` between `start_time` and `end_time`
/// on each of `days`.
#[derive(Debug, Clone)]
pub struct SlotRule {
    pub venue_id: Uuid,
    pub days: Vec<Weekday>,
    pub start_time: String,
    pub end_time: String,
    pub interval_minutes: i64,
    pub price: Decimal,
    pub max_capacity: Option<i32>,
    pub notes: Option<String>,
}

/// Expand a rule into full-length slots, grouped by day in rule order.
///
/// A trailing remainder shorter than the interval is dropped rather than
/// emitted as a short slot. Existing slots of the venue are not consulted.
pub fn generate_slots(rule: &SlotRule) -> AppResult<Vec<TimeSlot>> {
    if rule.days.is_empty() {
        return Err(AppError::InvalidArgument("At least one day is required".to_string()));
    }
    let (start, end) = parse_range(&rule.start_time, &rule.end_time)?;
    if rule.interval_minutes <= 0 {
        return Err(AppError::InvalidInterval(format!(
            "Interval must be positive, got {}",
            rule.interval_minutes
        )));
    }
    if rule.price < Decimal::ZERO {
        return Err(AppError::InvalidArgument("Price cannot be negative".to_string()));
    }

    // An interval longer than the range simply yields no slots
    let interval = u32::try_from(rule.interval_minutes).unwrap_or(u32::MAX);

    let mut days: Vec<Weekday> = Vec::with_capacity(rule.days.len());
    for day in &rule.days {
        if !days.contains(day) {
            days.push(*day);
        }
    }

    let per_day = ((end - start) / interval.max(1)) as usize;
    let mut slots = Vec::with_capacity(per_day * days.len());

    for day in days {
        let mut current = start;
        while current.saturating_add(interval) <= end {
            slots.push(TimeSlot {
                id: Uuid::new_v4(),
                venue_id: rule.venue_id,
                day,
                start_time: to_time_string(current),
                end_time: to_time_string(current + interval),
                price: rule.price,
                max_capacity: rule.max_capacity,
                is_special_event: false,
                notes: rule.notes.clone(),
            });
            current += interval;
        }
    }

    Ok(slots)
}

/// Group slots by weekday, each group sorted by start time
pub fn group_slots_by_day(slots: &[TimeSlot]) -> BTreeMap<Weekday, Vec<TimeSlot>> {
    let mut groups: BTreeMap<Weekday, Vec<TimeSlot>> = BTreeMap::new();
    for slot in slots {
        groups.entry(slot.day).or_default().push(slot.clone());
    }
    for group in groups.values_mut() {
        group.sort_by_key(|s| to_minutes(&s.start_time).unwrap_or(u32::MAX));
    }
    groups
}

/// First slot of `venue_id` on `day` whose range overlaps `range`, skipping `ignore`
pub fn find_overlap<'a>(
    existing: &'a [TimeSlot],
    venue_id: Uuid,
    day: Weekday,
    range: (u32, u32),
    ignore: Option<Uuid>,
) -> AppResult<Option<&'a TimeSlot>> {
    for slot in existing {
        if slot.venue_id != venue_id || slot.day != day || Some(slot.id) == ignore {
            continue;
        }
        let other = (to_minutes(&slot.start_time)?, to_minutes(&slot.end_time)?);
        if ranges_overlap(range, other) {
            return Ok(Some(slot));
        }
    }
    Ok(None)
}
