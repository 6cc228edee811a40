//! Locker progress that survives a restart.
//!
//! Only used when `locker.persist_progress` is on. Both keys hold epoch
//! milliseconds as decimal strings.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::StorageError;
use crate::storage::{KeyValueStore, FIRST_SEEN_KEY, UNLOCKED_UNTIL_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockerProgress {
    /// Reference instant of the first countdown.
    pub first_seen_at: Option<DateTime<Utc>>,
    /// Instant the locker opens (or opened).
    pub unlocked_until: Option<DateTime<Utc>>,
}

impl LockerProgress {
    pub fn load(storage: &dyn KeyValueStore) -> Result<Self, StorageError> {
        Ok(Self {
            first_seen_at: read_instant(storage, FIRST_SEEN_KEY)?,
            unlocked_until: read_instant(storage, UNLOCKED_UNTIL_KEY)?,
        })
    }

    /// Whether the stored deadline has already passed at `now`.
    pub fn is_unlocked_at(&self, now: DateTime<Utc>) -> bool {
        self.unlocked_until.is_some_and(|until| until <= now)
    }

    /// Record the first reference and its deadline. Earlier values are kept.
    ///
    /// A deadline past the representable range is not written; the locker
    /// then only opens by counting down.
    pub fn record_start(
        storage: &dyn KeyValueStore,
        reference: DateTime<Utc>,
        total_seconds: u64,
    ) -> Result<Self, StorageError> {
        let mut progress = Self::load(storage)?;
        if progress.first_seen_at.is_none() {
            write_instant(storage, FIRST_SEEN_KEY, reference)?;
            progress.first_seen_at = Some(reference);
        }
        if progress.unlocked_until.is_none() {
            match deadline(reference, total_seconds) {
                Some(deadline) => {
                    write_instant(storage, UNLOCKED_UNTIL_KEY, deadline)?;
                    progress.unlocked_until = Some(deadline);
                }
                None => tracing::warn!(total_seconds, "unlock deadline out of range, not stored"),
            }
        }
        Ok(progress)
    }

    /// Mark the locker open as of `now`.
    pub fn record_unlock(storage: &dyn KeyValueStore, now: DateTime<Utc>) -> Result<(), StorageError> {
        write_instant(storage, UNLOCKED_UNTIL_KEY, now)
    }

    pub fn clear(storage: &dyn KeyValueStore) -> Result<(), StorageError> {
        storage.remove(FIRST_SEEN_KEY)?;
        storage.remove(UNLOCKED_UNTIL_KEY)
    }
}

fn deadline(reference: DateTime<Utc>, total_seconds: u64) -> Option<DateTime<Utc>> {
    let total = TimeDelta::try_seconds(i64::try_from(total_seconds).ok()?)?;
    reference.checked_add_signed(total)
}

fn read_instant(storage: &dyn KeyValueStore, key: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };
    let parsed = raw
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis);
    if parsed.is_none() {
        tracing::warn!(key, "ignoring unreadable locker timestamp {raw:?}");
    }
    Ok(parsed)
}

fn write_instant(storage: &dyn KeyValueStore, key: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
    storage.set(key, &at.timestamp_millis().to_string())
}
