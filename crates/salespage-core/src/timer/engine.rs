//! Countdown engine implementation.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads and never reads the clock itself: every command takes `now`, and
//! the caller is responsible for calling `tick(now)` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Disabled <-> Idle -> Running <-> Paused
//!                        |
//!                        v
//!                     Unlocked   (until reset)
//! ```
//!
//! A config change re-arms the countdown from zero. Once the start trigger
//! has fired, re-arming restarts it at once (a paused countdown stays
//! paused); the trigger does not have to fire again.
//!
//! Elapsed time is always recomputed from a reference instant, so missed
//! ticks do not slow the countdown down.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new();
//! engine.configure(config, now);
//! engine.start(now);
//! // In a loop:
//! engine.tick(Utc::now()); // Returns Some(Event::ContentUnlocked) once
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::config::LockerConfig;
use crate::content::ScheduleMode;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// No gating configured. Content is visible.
    Disabled,
    /// Armed, waiting for its start trigger.
    Idle,
    Running,
    Paused,
    /// Countdown finished or was forced open. Stays here until `reset`.
    Unlocked,
}

/// Point-in-time view of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub is_unlocked: bool,
    pub elapsed_seconds: u64,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
}

impl TimerSnapshot {
    pub fn to_event(self, at: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state,
            is_unlocked: self.is_unlocked,
            elapsed_seconds: self.elapsed_seconds,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            at,
        }
    }
}

/// Core countdown engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownEngine {
    config: Option<LockerConfig>,
    state: TimerState,
    /// Instant elapsed time is measured from. Only set while running.
    #[serde(default)]
    reference: Option<DateTime<Utc>>,
    elapsed_seconds: u64,
    /// The start trigger has fired since the last reset.
    #[serde(default)]
    started: bool,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownEngine {
    /// A fresh engine with no configuration. It does not gate.
    pub fn new() -> Self {
        Self {
            config: None,
            state: TimerState::Disabled,
            reference: None,
            elapsed_seconds: 0,
            started: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn config(&self) -> Option<&LockerConfig> {
        self.config.as_ref()
    }

    pub fn reference(&self) -> Option<DateTime<Utc>> {
        self.reference
    }

    pub fn total_seconds(&self) -> u64 {
        self.config
            .as_ref()
            .map(LockerConfig::total_unlock_seconds)
            .unwrap_or(0)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        match self.state {
            TimerState::Disabled | TimerState::Unlocked => 0,
            _ => self.total_seconds().saturating_sub(self.elapsed_seconds),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, TimerState::Disabled | TimerState::Unlocked)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            is_unlocked: self.is_unlocked(),
            elapsed_seconds: self.elapsed_seconds,
            remaining_seconds: self.remaining_seconds(),
            total_seconds: self.total_seconds(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply a locker config. An identical config is ignored.
    ///
    /// A changed config re-arms the countdown from zero, unless the locker
    /// has already unlocked: that sticks until [`reset`](Self::reset). A
    /// countdown that was already started keeps running under the new
    /// duration.
    pub fn configure(&mut self, config: LockerConfig, now: DateTime<Utc>) -> Option<Event> {
        if self.config.as_ref() == Some(&config) {
            return None;
        }
        let event = Event::LockerConfigured {
            enabled: config.enabled,
            mode: config.mode,
            total_seconds: config.total_unlock_seconds(),
            at: now,
        };
        let gates = config.gates();
        self.config = Some(config);

        if self.state == TimerState::Unlocked {
            return Some(event);
        }
        let was_paused = self.state == TimerState::Paused;
        self.reference = None;
        self.elapsed_seconds = 0;
        self.state = match (gates, self.started, was_paused) {
            (false, _, _) => TimerState::Disabled,
            (true, false, _) => TimerState::Idle,
            (true, true, true) => TimerState::Paused,
            (true, true, false) => {
                let reference = self.start_reference(now);
                self.reference = Some(reference);
                self.flush_elapsed(now);
                tracing::debug!(%reference, total = self.total_seconds(), "countdown restarted");
                TimerState::Running
            }
        };
        Some(event)
    }

    /// Start trigger. Scheduled lockers measure from their configured start;
    /// everything else measures from `now`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let reference = self.start_reference(now);
        self.start_from(reference, now)
    }

    /// Start measuring from an explicit reference, e.g. a persisted first-seen
    /// instant. A reference in the future keeps elapsed at zero until it passes.
    pub fn start_from(&mut self, reference: DateTime<Utc>, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Idle {
            return None;
        }
        self.state = TimerState::Running;
        self.started = true;
        self.reference = Some(reference);
        self.flush_elapsed(now);
        tracing::debug!(%reference, total = self.total_seconds(), "countdown started");
        Some(Event::TimerStarted {
            total_seconds: self.total_seconds(),
            reference,
            at: now,
        })
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        // Flush elapsed time first.
        self.flush_elapsed(now);
        self.state = TimerState::Paused;
        self.reference = None;
        Some(Event::TimerPaused {
            elapsed_seconds: self.elapsed_seconds,
            remaining_seconds: self.remaining_seconds(),
            at: now,
        })
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        let reference = i64::try_from(self.elapsed_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|elapsed| now.checked_sub_signed(elapsed))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.reference = Some(reference);
        self.state = TimerState::Running;
        Some(Event::TimerResumed {
            elapsed_seconds: self.elapsed_seconds,
            remaining_seconds: self.remaining_seconds(),
            at: now,
        })
    }

    /// Call periodically. Returns `Some(Event::ContentUnlocked)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        if self.remaining_seconds() > 0 {
            return None;
        }
        self.state = TimerState::Unlocked;
        self.reference = None;
        tracing::info!(elapsed = self.elapsed_seconds, "locker unlocked");
        Some(Event::ContentUnlocked {
            elapsed_seconds: self.elapsed_seconds,
            forced: false,
            at: now,
        })
    }

    /// Open the locker from any state.
    pub fn force_unlock(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state == TimerState::Unlocked {
            return None;
        }
        if self.state == TimerState::Running {
            self.flush_elapsed(now);
        }
        self.state = TimerState::Unlocked;
        self.reference = None;
        tracing::info!("locker force-unlocked");
        Some(Event::ContentUnlocked {
            elapsed_seconds: self.elapsed_seconds,
            forced: true,
            at: now,
        })
    }

    /// Back to the armed (or disabled) state with no progress.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let gates = self.config.as_ref().is_some_and(LockerConfig::gates);
        self.state = if gates {
            TimerState::Idle
        } else {
            TimerState::Disabled
        };
        self.reference = None;
        self.elapsed_seconds = 0;
        self.started = false;
        Some(Event::TimerReset { at: now })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Scheduled lockers measure from their configured start; everything
    /// else from `now`.
    fn start_reference(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.config.as_ref() {
            Some(LockerConfig {
                mode: ScheduleMode::SpecificTime,
                scheduled_start: Some(at),
                ..
            }) => *at,
            _ => now,
        }
    }

    /// Recompute elapsed from the reference. Never moves backwards, even if
    /// the clock does.
    fn flush_elapsed(&mut self, now: DateTime<Utc>) {
        if let Some(reference) = self.reference {
            let measured = u64::try_from((now - reference).num_seconds()).unwrap_or(0);
            self.elapsed_seconds = self
                .elapsed_seconds
                .max(measured)
                .min(self.total_seconds());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + TimeDelta::seconds(secs)
    }

    fn gated(minutes: u64, seconds: u64) -> LockerConfig {
        LockerConfig {
            enabled: true,
            unlock_minutes: minutes,
            unlock_seconds: seconds,
            ..LockerConfig::default()
        }
    }

    fn running(minutes: u64, seconds: u64) -> CountdownEngine {
        let mut engine = CountdownEngine::new();
        engine.configure(gated(minutes, seconds), t0());
        engine.start(t0());
        engine
    }

    #[test]
    fn unconfigured_engine_does_not_gate() {
        let engine = CountdownEngine::new();
        assert_eq!(engine.state(), TimerState::Disabled);
        assert!(engine.is_unlocked());
    }

    #[test]
    fn disabled_or_zero_config_is_unlocked() {
        let mut engine = CountdownEngine::new();
        engine.configure(LockerConfig { enabled: false, ..gated(1, 0) }, t0());
        assert!(engine.is_unlocked());

        engine.configure(gated(0, 0), t0());
        assert!(engine.is_unlocked());
        assert!(engine.start(t0()).is_none());
    }

    #[test]
    fn five_second_scenario() {
        let mut engine = running(0, 5);
        assert!(engine.tick(at(4)).is_none());
        let snap = engine.snapshot();
        assert_eq!(snap.remaining_seconds, 1);
        assert!(!snap.is_unlocked);

        assert!(matches!(
            engine.tick(at(5)),
            Some(Event::ContentUnlocked { forced: false, .. })
        ));
        let snap = engine.snapshot();
        assert_eq!(snap.remaining_seconds, 0);
        assert!(snap.is_unlocked);
    }

    #[test]
    fn missed_ticks_do_not_slow_the_countdown() {
        let mut engine = running(0, 30);
        engine.tick(at(1));
        engine.tick(at(25));
        assert_eq!(engine.remaining_seconds(), 5);
    }

    #[test]
    fn pause_freezes_and_resume_preserves_elapsed() {
        let mut engine = running(1, 0);
        engine.tick(at(10));
        assert!(engine.pause(at(12)).is_some());
        assert_eq!(engine.elapsed_seconds(), 12);

        // Time passes while paused.
        assert!(engine.tick(at(100)).is_none());
        assert_eq!(engine.elapsed_seconds(), 12);

        assert!(engine.resume(at(100)).is_some());
        engine.tick(at(105));
        assert_eq!(engine.elapsed_seconds(), 17);
        assert_eq!(engine.remaining_seconds(), 43);
    }

    #[test]
    fn clock_going_backwards_does_not_rewind() {
        let mut engine = running(0, 30);
        engine.tick(at(20));
        engine.tick(at(5));
        assert_eq!(engine.elapsed_seconds(), 20);
    }

    #[test]
    fn unlocked_survives_config_changes_until_reset() {
        let mut engine = running(0, 2);
        engine.tick(at(2));
        assert_eq!(engine.state(), TimerState::Unlocked);

        assert!(engine.configure(gated(5, 0), at(3)).is_some());
        assert_eq!(engine.state(), TimerState::Unlocked);

        engine.reset(at(4));
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_seconds(), 300);
    }

    #[test]
    fn identical_config_is_ignored() {
        let mut engine = running(0, 30);
        engine.tick(at(10));
        assert!(engine.configure(gated(0, 30), at(11)).is_none());
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.elapsed_seconds(), 10);
    }

    #[test]
    fn changed_config_rearms_before_start() {
        let mut engine = CountdownEngine::new();
        engine.configure(gated(0, 30), t0());
        engine.configure(gated(0, 40), at(1));
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_seconds(), 40);
    }

    #[test]
    fn changed_config_restarts_a_running_countdown() {
        let mut engine = running(0, 30);
        engine.tick(at(10));
        engine.configure(gated(0, 40), at(11));
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.elapsed_seconds(), 0);
        assert_eq!(engine.remaining_seconds(), 40);

        assert!(engine.tick(at(50)).is_none());
        assert!(matches!(
            engine.tick(at(51)),
            Some(Event::ContentUnlocked { forced: false, .. })
        ));
    }

    #[test]
    fn changed_config_keeps_a_paused_countdown_paused() {
        let mut engine = running(0, 30);
        engine.pause(at(10));
        engine.configure(gated(0, 20), at(11));
        assert_eq!(engine.state(), TimerState::Paused);
        assert_eq!(engine.remaining_seconds(), 20);

        engine.resume(at(100));
        assert!(engine.tick(at(120)).is_some());
    }

    #[test]
    fn disable_then_enable_after_start_keeps_counting() {
        let mut engine = running(0, 30);
        engine.configure(LockerConfig { enabled: false, ..gated(0, 30) }, at(5));
        assert!(engine.is_unlocked());
        engine.configure(gated(0, 10), at(6));
        assert_eq!(engine.state(), TimerState::Running);
        assert!(engine.tick(at(16)).is_some());
    }

    #[test]
    fn reset_forgets_the_start_trigger() {
        let mut engine = running(0, 30);
        engine.reset(at(1));
        engine.configure(gated(0, 40), at(2));
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn huge_durations_do_not_overflow() {
        let mut engine = running(u64::MAX / 60, 59);
        engine.tick(at(10));
        engine.pause(at(10));
        assert!(engine.resume(at(20)).is_some());
        engine.tick(at(30));
        assert_eq!(engine.elapsed_seconds(), 20);
        assert!(!engine.is_unlocked());
    }

    #[test]
    fn force_unlock_from_any_state() {
        let mut idle = CountdownEngine::new();
        idle.configure(gated(1, 0), t0());
        assert!(idle.force_unlock(t0()).is_some());
        assert!(idle.is_unlocked());

        let mut paused = running(1, 0);
        paused.pause(at(3));
        assert!(matches!(
            paused.force_unlock(at(4)),
            Some(Event::ContentUnlocked { forced: true, elapsed_seconds: 3, .. })
        ));
        assert!(paused.force_unlock(at(5)).is_none());
    }

    #[test]
    fn specific_time_measures_from_scheduled_start() {
        let mut engine = CountdownEngine::new();
        engine.configure(
            LockerConfig {
                mode: ScheduleMode::SpecificTime,
                scheduled_start: Some(at(10)),
                ..gated(0, 20)
            },
            t0(),
        );
        engine.start(t0());
        engine.tick(at(5));
        assert_eq!(engine.elapsed_seconds(), 0);
        engine.tick(at(25));
        assert_eq!(engine.elapsed_seconds(), 15);
        assert!(engine.tick(at(30)).is_some());
    }

    #[test]
    fn start_from_past_reference_catches_up() {
        let mut engine = CountdownEngine::new();
        engine.configure(gated(0, 30), at(100));
        engine.start_from(t0(), at(100));
        assert!(matches!(
            engine.tick(at(100)),
            Some(Event::ContentUnlocked { .. })
        ));
    }

    #[test]
    fn snapshot_event_carries_state() {
        let engine = running(0, 5);
        match engine.snapshot().to_event(t0()) {
            Event::StateSnapshot {
                state,
                remaining_seconds,
                ..
            } => {
                assert_eq!(state, TimerState::Running);
                assert_eq!(remaining_seconds, 5);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
