//! Daily usage quota tracking.
//!
//! A [`QuotaTracker`] enforces a fixed cap on generation attempts per
//! calendar day. The count survives restarts within the same day through a
//! single persisted JSON record; a record from an earlier day reads as zero
//! and is replaced on the next write. Day rollover is detected lazily at
//! access time, so no timer is needed.
//!
//! Callers reserve before generating and roll back on failure:
//!
//! ```
//! use logoforge::quota::{MemoryStore, QuotaTracker, SystemClock};
//!
//! let tracker = QuotaTracker::new(MemoryStore::new(), SystemClock, 5);
//! if tracker.try_reserve() {
//!     // ... attempt generation; on failure:
//!     tracker.rollback();
//! }
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Storage key for the single usage record slot. With a [`FileStore`] this
/// becomes `usage.json` inside the store's directory.
const USAGE_KEY: &str = "usage";

/// Default number of generation attempts allowed per day.
pub const DEFAULT_DAILY_LIMIT: u32 = 5;

/// The persisted state of the tracker: one record for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Calendar date the count applies to (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Attempts recorded for `date`.
    pub count: u32,
}

/// Key-value storage for the usage record.
///
/// The tracker is the only writer of its slot; implementations just move
/// strings. Errors are tolerated by the tracker (treated as an absent
/// record on read, logged and dropped on write).
pub trait UsageStore {
    /// Reads the value stored under `key`, if any.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Source of the current calendar date.
pub trait Clock {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// In-memory store, used in tests and as a fallback when no usage file
/// location is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a value, for tests.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.slots.borrow_mut().insert(key.into(), value.into());
        store
    }
}

impl UsageStore for MemoryStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.slots.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }
}

/// File-backed store: each key is one JSON file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl UsageStore for FileStore {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)
    }
}

/// Enforces the per-day generation cap against a single storage slot.
///
/// All operations are synchronous and assume a single logical caller; the
/// slot is not shared with concurrent writers.
pub struct QuotaTracker<S, C> {
    store: S,
    clock: C,
    daily_limit: u32,
}

impl<S: UsageStore, C: Clock> QuotaTracker<S, C> {
    /// Creates a tracker with the given store, clock and daily limit.
    ///
    /// `daily_limit` must be positive; zero is coerced to
    /// [`DEFAULT_DAILY_LIMIT`].
    pub fn new(store: S, clock: C, daily_limit: u32) -> Self {
        let daily_limit = if daily_limit == 0 {
            tracing::warn!("daily limit of 0 requested, using default");
            DEFAULT_DAILY_LIMIT
        } else {
            daily_limit
        };
        Self {
            store,
            clock,
            daily_limit,
        }
    }

    /// The configured daily limit.
    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Number of attempts recorded for today. Pure read: a stale, malformed
    /// or unreadable record counts as zero and storage is left untouched.
    pub fn current_count(&self) -> u32 {
        match self.load() {
            Some(record) if record.date == self.clock.today() => record.count,
            _ => 0,
        }
    }

    /// Attempts remaining today, clamped at zero even if storage somehow
    /// holds an over-limit count.
    pub fn remaining(&self) -> u32 {
        self.daily_limit.saturating_sub(self.current_count())
    }

    /// Reserves one attempt for today.
    ///
    /// Returns `false` without mutating anything when the limit is already
    /// reached; otherwise records the attempt and returns `true`. A granted
    /// reservation must be paired with either success (keep it) or exactly
    /// one [`rollback`](Self::rollback).
    pub fn try_reserve(&self) -> bool {
        let today = self.clock.today();
        let count = self.current_count();
        if count >= self.daily_limit {
            tracing::debug!(count, limit = self.daily_limit, "daily limit reached");
            return false;
        }
        self.save(&UsageRecord {
            date: today,
            count: count + 1,
        });
        true
    }

    /// Reverts a granted reservation, flooring the count at zero.
    ///
    /// Only the record for the current date is touched: if the day rolled
    /// over since the reservation, the stale record already reads as zero
    /// and is left for the next reserve to replace, so yesterday's rollback
    /// can never decrement today's counter.
    pub fn rollback(&self) {
        let today = self.clock.today();
        match self.load() {
            Some(record) if record.date == today => {
                self.save(&UsageRecord {
                    date: today,
                    count: record.count.saturating_sub(1),
                });
            }
            _ => {
                tracing::debug!("rollback with no record for today, nothing to revert");
            }
        }
    }

    fn load(&self) -> Option<UsageRecord> {
        let raw = match self.store.read(USAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("failed to read usage record: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                // Malformed state is normalized to "absent", never surfaced.
                tracing::debug!("discarding malformed usage record: {e}");
                None
            }
        }
    }

    fn save(&self, record: &UsageRecord) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize usage record: {e}");
                return;
            }
        };
        if let Err(e) = self.store.write(USAGE_KEY, &json) {
            // Degrade to an unpersisted counter rather than failing the
            // caller's generation attempt.
            tracing::warn!("failed to persist usage record: {e}");
        }
    }
}

impl QuotaTracker<FileStore, SystemClock> {
    /// Convenience constructor for a file-backed tracker on the real clock.
    pub fn file_backed(dir: impl AsRef<Path>, daily_limit: u32) -> Self {
        Self::new(FileStore::new(dir.as_ref()), SystemClock, daily_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock pinned to a settable date.
    struct FixedClock(RefCell<NaiveDate>);

    impl FixedClock {
        fn at(date: NaiveDate) -> Self {
            Self(RefCell::new(date))
        }

        fn advance_days(&self, days: i64) {
            let next = *self.0.borrow() + chrono::Duration::days(days);
            *self.0.borrow_mut() = next;
        }
    }

    impl Clock for &FixedClock {
        fn today(&self) -> NaiveDate {
            *self.0.borrow()
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_fresh_tracker_counts_from_zero() {
        let clock = FixedClock::at(day("2024-06-10"));
        let tracker = QuotaTracker::new(MemoryStore::new(), &clock, 5);
        assert_eq!(tracker.current_count(), 0);
        assert_eq!(tracker.remaining(), 5);
    }

    #[test]
    fn test_reserve_until_limit() {
        let clock = FixedClock::at(day("2024-06-10"));
        let tracker = QuotaTracker::new(MemoryStore::new(), &clock, 5);

        for i in 1..=5 {
            assert!(tracker.try_reserve(), "reservation {i} should succeed");
            assert_eq!(tracker.current_count(), i);
        }
        assert!(!tracker.try_reserve(), "sixth reservation must be rejected");
        assert_eq!(tracker.current_count(), 5, "rejection must not mutate");
        assert_eq!(tracker.remaining(), 0);
    }

    #[test]
    fn test_rollback_restores_pre_reservation_count() {
        let clock = FixedClock::at(day("2024-06-10"));
        let tracker = QuotaTracker::new(MemoryStore::new(), &clock, 5);

        assert!(tracker.try_reserve());
        assert!(tracker.try_reserve());
        assert_eq!(tracker.current_count(), 2);

        tracker.rollback();
        assert_eq!(tracker.current_count(), 1);
    }

    #[test]
    fn test_rollback_floors_at_zero() {
        let clock = FixedClock::at(day("2024-06-10"));
        let store = MemoryStore::with_value(USAGE_KEY, r#"{"date":"2024-06-10","count":0}"#);
        let tracker = QuotaTracker::new(store, &clock, 5);

        tracker.rollback();
        assert_eq!(tracker.current_count(), 0);
    }

    #[test]
    fn test_stale_record_reads_as_zero_and_is_replaced() {
        let clock = FixedClock::at(day("2024-06-11"));
        let store = MemoryStore::with_value(USAGE_KEY, r#"{"date":"2024-06-10","count":5}"#);
        let tracker = QuotaTracker::new(store, &clock, 5);

        assert_eq!(tracker.current_count(), 0);
        assert!(tracker.try_reserve());
        assert_eq!(tracker.current_count(), 1);

        // The slot now holds today's record.
        let raw = tracker.store.read(USAGE_KEY).unwrap().unwrap();
        let record: UsageRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.date, day("2024-06-11"));
        assert_eq!(record.count, 1);
    }

    #[test]
    fn test_malformed_record_reads_as_zero() {
        let clock = FixedClock::at(day("2024-06-10"));
        let store = MemoryStore::with_value(USAGE_KEY, "not json at all");
        let tracker = QuotaTracker::new(store, &clock, 5);

        assert_eq!(tracker.current_count(), 0);
        assert!(tracker.try_reserve());
        assert_eq!(tracker.current_count(), 1);
    }

    #[test]
    fn test_remaining_clamps_over_limit_count() {
        let clock = FixedClock::at(day("2024-06-10"));
        let store = MemoryStore::with_value(USAGE_KEY, r#"{"date":"2024-06-10","count":99}"#);
        let tracker = QuotaTracker::new(store, &clock, 5);

        assert_eq!(tracker.remaining(), 0);
        assert!(!tracker.try_reserve());
    }

    #[test]
    fn test_rollback_after_midnight_does_not_touch_new_day() {
        let clock = FixedClock::at(day("2024-06-10"));
        let tracker = QuotaTracker::new(MemoryStore::new(), &clock, 5);

        assert!(tracker.try_reserve());
        clock.advance_days(1);

        // The reservation's record is now stale; rollback is a no-op.
        tracker.rollback();
        assert_eq!(tracker.current_count(), 0);
        assert!(tracker.try_reserve());
        assert_eq!(tracker.current_count(), 1);
    }

    #[test]
    fn test_count_persists_across_tracker_instances() {
        let clock = FixedClock::at(day("2024-06-10"));
        let dir = tempfile::tempdir().unwrap();

        {
            let tracker = QuotaTracker::new(FileStore::new(dir.path()), &clock, 5);
            assert!(tracker.try_reserve());
            assert!(tracker.try_reserve());
        }

        let tracker = QuotaTracker::new(FileStore::new(dir.path()), &clock, 5);
        assert_eq!(tracker.current_count(), 2);
        assert_eq!(tracker.remaining(), 3);
    }

    #[test]
    fn test_file_backed_tracker_writes_usage_json() {
        let clock = FixedClock::at(day("2024-06-10"));
        let dir = tempfile::tempdir().unwrap();

        let tracker = QuotaTracker::new(FileStore::new(dir.path()), &clock, 5);
        assert!(tracker.try_reserve());

        assert!(dir.path().join("usage.json").is_file());
    }

    #[test]
    fn test_file_store_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.read(USAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_zero_limit_coerced_to_default() {
        let clock = FixedClock::at(day("2024-06-10"));
        let tracker = QuotaTracker::new(MemoryStore::new(), &clock, 0);
        assert_eq!(tracker.daily_limit(), DEFAULT_DAILY_LIMIT);
    }

    #[test]
    fn test_record_json_layout() {
        let record = UsageRecord {
            date: day("2024-06-10"),
            count: 3,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"date":"2024-06-10","count":3}"#);
    }
}
