use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{ContentBlocker, ScheduleMode};

/// The locker settings the countdown consumes, derived from the stored
/// `contentBlocker` section.
///
/// Negative durations clamp to 0. A `specific_time` locker without a valid
/// start instant behaves as `immediate`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockerConfig {
    pub enabled: bool,
    pub unlock_minutes: u64,
    pub unlock_seconds: u64,
    pub mode: ScheduleMode,
    pub scheduled_start: Option<DateTime<Utc>>,
}

impl LockerConfig {
    /// A config that never gates.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn total_unlock_seconds(&self) -> u64 {
        self.unlock_minutes
            .saturating_mul(60)
            .saturating_add(self.unlock_seconds)
    }

    /// True when content should be hidden until the countdown completes.
    pub fn gates(&self) -> bool {
        self.enabled && self.total_unlock_seconds() > 0
    }
}

impl From<&ContentBlocker> for LockerConfig {
    fn from(blocker: &ContentBlocker) -> Self {
        let scheduled_start = blocker
            .scheduled_start_time
            .as_deref()
            .and_then(|s| match DateTime::parse_from_rfc3339(s) {
                Ok(at) => Some(at.with_timezone(&Utc)),
                Err(e) => {
                    tracing::warn!("ignoring invalid scheduledStartTime {s:?}: {e}");
                    None
                }
            });

        let mode = match (blocker.schedule_mode, scheduled_start) {
            (ScheduleMode::SpecificTime, None) => ScheduleMode::Immediate,
            (mode, _) => mode,
        };

        Self {
            enabled: blocker.enabled,
            unlock_minutes: u64::try_from(blocker.unlock_time_minutes).unwrap_or(0),
            unlock_seconds: u64::try_from(blocker.unlock_time_seconds).unwrap_or(0),
            mode,
            scheduled_start: if mode == ScheduleMode::SpecificTime {
                scheduled_start
            } else {
                None
            },
        }
    }
}
