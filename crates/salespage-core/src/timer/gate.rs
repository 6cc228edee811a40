//! Locker gate: decides whether protected content is shown.
//!
//! Pure functions only. The gate fails open: a disabled or zero-length
//! locker always shows the content, whatever the timer says.

use serde::{Deserialize, Serialize};

use super::config::LockerConfig;
use super::engine::TimerSnapshot;

/// Placeholder replaced by the configured duration in blocked copy.
pub const TIME_PLACEHOLDER: &str = "{{time}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateVerdict {
    pub show_protected: bool,
    /// Zero whenever the content is shown.
    pub remaining_seconds_for_display: u64,
}

/// Decide visibility for one render.
pub fn decide(config: &LockerConfig, timer: &TimerSnapshot) -> GateVerdict {
    let show_protected =
        !config.enabled || config.total_unlock_seconds() == 0 || timer.is_unlocked;
    GateVerdict {
        show_protected,
        remaining_seconds_for_display: if show_protected {
            0
        } else {
            timer.remaining_seconds
        },
    }
}

/// `m:ss`. Minutes are not wrapped into hours.
pub fn format_remaining(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Share of the countdown already elapsed, `0..=100`.
pub fn progress_pct(remaining: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = total.saturating_sub(remaining);
    u8::try_from(done.saturating_mul(100) / total).unwrap_or(100)
}

/// Fill `{{time}}` in the blocked message with the configured duration,
/// normalized to `m:ss` (0 min 90 s renders as `1:30`).
pub fn render_blocked_message(template: &str, config: &LockerConfig) -> String {
    template.replace(
        TIME_PLACEHOLDER,
        &format_remaining(config.total_unlock_seconds()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerState;

    fn snapshot(is_unlocked: bool, remaining: u64) -> TimerSnapshot {
        TimerSnapshot {
            state: if is_unlocked {
                TimerState::Unlocked
            } else {
                TimerState::Running
            },
            is_unlocked,
            elapsed_seconds: 0,
            remaining_seconds: remaining,
            total_seconds: 60,
        }
    }

    fn gated() -> LockerConfig {
        LockerConfig {
            enabled: true,
            unlock_minutes: 1,
            ..LockerConfig::default()
        }
    }

    #[test]
    fn disabled_config_always_shows() {
        let config = LockerConfig {
            enabled: false,
            ..gated()
        };
        for locked in [true, false] {
            let verdict = decide(&config, &snapshot(!locked, 30));
            assert!(verdict.show_protected);
            assert_eq!(verdict.remaining_seconds_for_display, 0);
        }
    }

    #[test]
    fn zero_duration_always_shows() {
        let config = LockerConfig {
            enabled: true,
            ..LockerConfig::default()
        };
        assert!(decide(&config, &snapshot(false, 30)).show_protected);
    }

    #[test]
    fn running_timer_hides_content() {
        let verdict = decide(&gated(), &snapshot(false, 42));
        assert!(!verdict.show_protected);
        assert_eq!(verdict.remaining_seconds_for_display, 42);
    }

    #[test]
    fn unlocked_timer_shows_content() {
        assert!(decide(&gated(), &snapshot(true, 0)).show_protected);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_remaining(0), "0:00");
        assert_eq!(format_remaining(65), "1:05");
        assert_eq!(format_remaining(4503), "75:03");
    }

    #[test]
    fn progress_is_bounded() {
        assert_eq!(progress_pct(60, 60), 0);
        assert_eq!(progress_pct(30, 60), 50);
        assert_eq!(progress_pct(0, 60), 100);
        assert_eq!(progress_pct(90, 60), 0);
        assert_eq!(progress_pct(0, 0), 100);
    }

    #[test]
    fn renders_every_placeholder() {
        let config = LockerConfig {
            unlock_seconds: 30,
            ..gated()
        };
        assert_eq!(
            render_blocked_message("Wait {{time}}. Yes, {{time}}.", &config),
            "Wait 1:30. Yes, 1:30."
        );
    }

    #[test]
    fn overflowing_seconds_are_normalized() {
        let config = LockerConfig {
            unlock_minutes: 0,
            unlock_seconds: 90,
            ..gated()
        };
        assert_eq!(render_blocked_message("{{time}}", &config), "1:30");
    }
}
