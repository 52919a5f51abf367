//! Append-only audit log of applied transitions.
//!
//! Entries are immutable values. The log never deduplicates, bounds or deletes.

use super::action::Action;
use super::pet::PetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of one applied transition.
///
/// The timestamp is the same instant written to the pet's `last_updated`.
///
/// # Example
///
/// ```rust
/// use petsim::core::{Action, HistoryEntry};
/// use chrono::Utc;
///
/// let entry = HistoryEntry::new(1, Action::Feed, Utc::now());
/// assert_eq!(entry.description(), "Fed the pet");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The pet this entry refers to
    pub pet_id: PetId,
    /// Which transition was applied
    pub action: Action,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(pet_id: PetId, action: Action, timestamp: DateTime<Utc>) -> Self {
        Self {
            pet_id,
            action,
            timestamp,
        }
    }

    pub fn description(&self) -> &'static str {
        self.action.description()
    }
}

/// Ordered log of history entries.
///
/// The log is immutable. `record` returns a new log with the entry added.
///
/// # Example
///
/// ```rust
/// use petsim::core::{Action, HistoryEntry, HistoryLog};
/// use chrono::Utc;
///
/// let log = HistoryLog::new();
/// let log = log.record(HistoryEntry::new(1, Action::Feed, Utc::now()));
/// let log = log.record(HistoryEntry::new(1, Action::Play, Utc::now()));
///
/// let actions: Vec<_> = log.entries().iter().map(|e| e.action).collect();
/// assert_eq!(actions, vec![Action::Feed, Action::Play]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry, returning a new log.
    ///
    /// The existing log is left unchanged.
    pub fn record(&self, entry: HistoryEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self { entries }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries for one pet, ordered by timestamp ascending.
    ///
    /// Ties keep their insertion order.
    pub fn for_pet(&self, pet_id: PetId) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.pet_id == pet_id)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.timestamp);
        entries
    }

    /// Time between the first and last entry.
    ///
    /// Returns `None` for an empty log, or if the last entry precedes the first.
    pub fn span(&self) -> Option<Duration> {
        let (first, last) = (self.entries.first()?, self.entries.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn new_log_is_empty() {
        let log = HistoryLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.span().is_none());
    }

    #[test]
    fn record_adds_entry() {
        let log = HistoryLog::new().record(HistoryEntry::new(1, Action::Feed, at(0)));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].action, Action::Feed);
    }

    #[test]
    fn record_is_immutable() {
        let log = HistoryLog::new();
        let next = log.record(HistoryEntry::new(1, Action::Train, at(0)));

        assert_eq!(log.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn record_keeps_duplicates() {
        let entry = HistoryEntry::new(1, Action::Play, at(0));
        let log = HistoryLog::new().record(entry.clone()).record(entry);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn for_pet_filters_and_orders_by_timestamp() {
        let log = HistoryLog::new()
            .record(HistoryEntry::new(1, Action::Feed, at(20)))
            .record(HistoryEntry::new(2, Action::Play, at(5)))
            .record(HistoryEntry::new(1, Action::Decay, at(10)))
            .record(HistoryEntry::new(1, Action::Train, at(20)));

        let entries = log.for_pet(1);
        let actions: Vec<_> = entries.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![Action::Decay, Action::Feed, Action::Train]);
        assert!(log.for_pet(3).is_empty());
    }

    #[test]
    fn span_measures_first_to_last() {
        let log = HistoryLog::new()
            .record(HistoryEntry::new(1, Action::Feed, at(0)))
            .record(HistoryEntry::new(1, Action::Play, at(90)));

        assert_eq!(log.span(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn single_entry_has_zero_span() {
        let log = HistoryLog::new().record(HistoryEntry::new(1, Action::Feed, at(0)));
        assert_eq!(log.span(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn log_serializes_correctly() {
        let log = HistoryLog::new().record(HistoryEntry::new(7, Action::Misbehave, at(3)));
        let json = serde_json::to_string(&log).unwrap();
        let deserialized: HistoryLog = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.entries(), log.entries());
    }
}
