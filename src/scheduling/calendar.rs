//! Day-status store: holiday / blocked overrides keyed by date

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    calendar::{CalendarDay, DayStatusView},
    DayStatus,
};

/// Whether one calendar governs every venue or each venue has its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarScope {
    #[default]
    Global,
    /// Venue entries take precedence; global entries still apply as fallback
    PerVenue,
}

type EntryKey = (NaiveDate, Option<Uuid>);

#[derive(Debug, Clone)]
pub struct CalendarStore {
    scope: CalendarScope,
    default_status: DayStatus,
    entries: BTreeMap<EntryKey, CalendarDay>,
}

impl CalendarStore {
    pub fn new(scope: CalendarScope, default_status: DayStatus) -> Self {
        Self {
            scope,
            default_status,
            entries: BTreeMap::new(),
        }
    }

    /// Build a store from persisted rows. Later rows for the same key win.
    pub fn from_days(scope: CalendarScope, default_status: DayStatus, days: Vec<CalendarDay>) -> Self {
        let mut store = Self::new(scope, default_status);
        for day in days {
            store.entries.insert((day.date, day.venue_id), day);
        }
        store
    }

    pub fn scope(&self) -> CalendarScope {
        self.scope
    }

    pub fn default_status(&self) -> DayStatus {
        self.default_status
    }

    fn scope_key(&self, venue_id: Option<Uuid>) -> Option<Uuid> {
        match self.scope {
            CalendarScope::Global => None,
            CalendarScope::PerVenue => venue_id,
        }
    }

    /// Upsert the override for a date, replacing any previous entry
    pub fn set_status(
        &mut self,
        venue_id: Option<Uuid>,
        date: NaiveDate,
        status: DayStatus,
        note: Option<String>,
    ) -> CalendarDay {
        let venue_id = self.scope_key(venue_id);
        let day = CalendarDay {
            date,
            venue_id,
            status,
            note,
        };
        self.entries.insert((date, venue_id), day.clone());
        day
    }

    /// Remove the override, reverting the date to the default status
    pub fn clear_status(&mut self, venue_id: Option<Uuid>, date: NaiveDate) -> Option<CalendarDay> {
        let key = (date, self.scope_key(venue_id));
        self.entries.remove(&key)
    }

    /// Override in effect for a venue on a date
    pub fn entry(&self, venue_id: Option<Uuid>, date: NaiveDate) -> Option<&CalendarDay> {
        match self.scope_key(venue_id) {
            Some(venue) => self
                .entries
                .get(&(date, Some(venue)))
                .or_else(|| self.entries.get(&(date, None))),
            None => self.entries.get(&(date, None)),
        }
    }

    pub fn get_status(&self, venue_id: Option<Uuid>, date: NaiveDate) -> DayStatus {
        self.entry(venue_id, date)
            .map(|day| day.status)
            .unwrap_or(self.default_status)
    }

    pub fn is_closed(&self, venue_id: Option<Uuid>, date: NaiveDate) -> bool {
        self.get_status(venue_id, date).is_closed()
    }

    pub fn view(&self, venue_id: Option<Uuid>, date: NaiveDate) -> DayStatusView {
        match self.entry(venue_id, date) {
            Some(day) => DayStatusView {
                date,
                venue_id: day.venue_id,
                status: day.status,
                note: day.note.clone(),
                is_override: true,
            },
            None => DayStatusView {
                date,
                venue_id: self.scope_key(venue_id),
                status: self.default_status,
                note: None,
                is_override: false,
            },
        }
    }

    /// Stored overrides, sorted by date, optionally filtered
    pub fn list(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        status: Option<DayStatus>,
        venue_id: Option<Uuid>,
    ) -> Vec<CalendarDay> {
        let venue_id = self.scope_key(venue_id);
        self.entries
            .values()
            .filter(|d| start.map_or(true, |s| d.date >= s))
            .filter(|d| end.map_or(true, |e| d.date <= e))
            .filter(|d| status.map_or(true, |s| d.status == s))
            .filter(|d| match venue_id {
                Some(venue) => d.venue_id.is_none() || d.venue_id == Some(venue),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Drop every override scoped to a deleted venue
    pub fn remove_venue(&mut self, venue_id: Uuid) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, venue), _| *venue != Some(venue_id));
        before - self.entries.len()
    }

    /// All stored entries, for persistence
    pub fn days(&self) -> Vec<CalendarDay> {
        self.entries.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_default_status_applies_without_entry() {
        let available = CalendarStore::new(CalendarScope::Global, DayStatus::Available);
        assert_eq!(available.get_status(None, date("2024-06-10")), DayStatus::Available);

        let blocked = CalendarStore::new(CalendarScope::Global, DayStatus::Blocked);
        assert_eq!(blocked.get_status(None, date("2024-06-10")), DayStatus::Blocked);
        assert!(!blocked.view(None, date("2024-06-10")).is_override);
    }

    #[test]
    fn test_set_is_last_write_wins() {
        let mut store = CalendarStore::new(CalendarScope::Global, DayStatus::Available);
        store.set_status(None, date("2024-06-10"), DayStatus::Holiday, Some("Festival".into()));
        store.set_status(None, date("2024-06-10"), DayStatus::Blocked, None);

        assert_eq!(store.get_status(None, date("2024-06-10")), DayStatus::Blocked);
        assert_eq!(store.days().len(), 1);
        assert_eq!(store.entry(None, date("2024-06-10")).unwrap().note, None);
    }

    #[test]
    fn test_clear_reverts_to_default() {
        let mut store = CalendarStore::new(CalendarScope::Global, DayStatus::Available);
        store.set_status(None, date("2024-06-10"), DayStatus::Holiday, None);
        assert!(store.clear_status(None, date("2024-06-10")).is_some());
        assert_eq!(store.get_status(None, date("2024-06-10")), DayStatus::Available);
        assert!(store.clear_status(None, date("2024-06-10")).is_none());
    }

    #[test]
    fn test_global_scope_ignores_venue() {
        let venue = Uuid::new_v4();
        let mut store = CalendarStore::new(CalendarScope::Global, DayStatus::Available);
        let day = store.set_status(Some(venue), date("2024-06-10"), DayStatus::Holiday, None);
        assert_eq!(day.venue_id, None);
        assert_eq!(store.get_status(Some(Uuid::new_v4()), date("2024-06-10")), DayStatus::Holiday);
    }

    #[test]
    fn test_per_venue_scope() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut store = CalendarStore::new(CalendarScope::PerVenue, DayStatus::Available);
        store.set_status(Some(a), date("2024-06-10"), DayStatus::Blocked, None);
        store.set_status(None, date("2024-06-11"), DayStatus::Holiday, None);
        store.set_status(Some(b), date("2024-06-11"), DayStatus::Available, None);

        assert_eq!(store.get_status(Some(a), date("2024-06-10")), DayStatus::Blocked);
        assert_eq!(store.get_status(Some(b), date("2024-06-10")), DayStatus::Available);
        // global entry is the fallback, venue entry overrides it
        assert_eq!(store.get_status(Some(a), date("2024-06-11")), DayStatus::Holiday);
        assert_eq!(store.get_status(Some(b), date("2024-06-11")), DayStatus::Available);

        assert_eq!(store.remove_venue(a), 1);
        assert_eq!(store.get_status(Some(a), date("2024-06-10")), DayStatus::Available);
    }

    #[test]
    fn test_list_sorted_and_filtered() {
        let mut store = CalendarStore::new(CalendarScope::Global, DayStatus::Available);
        store.set_status(None, date("2024-12-25"), DayStatus::Holiday, None);
        store.set_status(None, date("2024-01-01"), DayStatus::Holiday, None);
        store.set_status(None, date("2024-06-01"), DayStatus::Blocked, None);

        let holidays = store.list(None, None, Some(DayStatus::Holiday), None);
        let dates: Vec<NaiveDate> = holidays.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date("2024-01-01"), date("2024-12-25")]);

        let first_half = store.list(Some(date("2024-01-01")), Some(date("2024-06-30")), None, None);
        assert_eq!(first_half.len(), 2);
    }
}
