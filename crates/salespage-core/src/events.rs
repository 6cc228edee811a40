use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ScheduleMode;
use crate::timer::TimerState;

/// Every content mutation and locker transition produces an Event.
/// The CLI prints them as JSON lines; the page renderer subscribes to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ContentUpdated {
        sections: Vec<String>,
        at: DateTime<Utc>,
    },
    ContentReset {
        at: DateTime<Utc>,
    },
    ContentImported {
        migrated_from: u32,
        /// Sections that did not type-check and were replaced by defaults.
        fallback_sections: Vec<String>,
        at: DateTime<Utc>,
    },
    LockerConfigured {
        enabled: bool,
        mode: ScheduleMode,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        total_seconds: u64,
        /// Wall-clock instant elapsed time is measured from.
        reference: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_seconds: u64,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        elapsed_seconds: u64,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    /// The locker opened. Emitted once per arming.
    ContentUnlocked {
        elapsed_seconds: u64,
        forced: bool,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        is_unlocked: bool,
        elapsed_seconds: u64,
        remaining_seconds: u64,
        total_seconds: u64,
        at: DateTime<Utc>,
    },
}
