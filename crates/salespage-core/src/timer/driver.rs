//! Shared locker timer: the engine plus its listeners and background ticker.
//!
//! One `LockerTimer` serves a whole page. It follows the content store
//! (reconfiguring only when the locker section really changes), takes video
//! play/pause signals, and broadcasts every transition to its listeners.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use super::config::LockerConfig;
use super::engine::{CountdownEngine, TimerSnapshot, TimerState};
use super::gate::{self, GateVerdict};
use super::progress::LockerProgress;
use crate::content::{ContentStore, ScheduleMode, Subscription};
use crate::events::Event;
use crate::storage::KeyValueStore;

/// Callback for timer events.
pub type TimerListener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Semantic events from the video embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSignal {
    Play,
    Pause,
}

struct Shared {
    engine: CountdownEngine,
    listeners: Vec<(u64, TimerListener)>,
    next_listener_id: u64,
    /// Present when progress persists across restarts.
    progress: Option<Box<dyn KeyValueStore>>,
}

impl Shared {
    fn listeners(&self) -> Vec<TimerListener> {
        self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    /// Apply `config`. When that restarts a running countdown, the stored
    /// progress is rewritten for the new duration.
    fn configure(&mut self, config: LockerConfig, now: DateTime<Utc>) -> Vec<Event> {
        let before = self.engine.reference();
        let event = self.engine.configure(config, now);
        let after = self.engine.reference();
        if let (Some(storage), Some(_), Some(reference)) = (self.progress.as_deref(), &event, after) {
            if before != after {
                let rewritten = LockerProgress::clear(storage).and_then(|()| {
                    LockerProgress::record_start(storage, reference, self.engine.total_seconds())
                });
                if let Err(e) = rewritten {
                    tracing::warn!("failed to persist locker progress: {e}");
                }
            }
        }
        event.into_iter().collect()
    }

    fn start(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(storage) = self.progress.as_deref() else {
            events.extend(self.engine.start(now));
            return events;
        };

        let stored = LockerProgress::load(storage).unwrap_or_else(|e| {
            tracing::warn!("failed to read locker progress: {e}");
            LockerProgress::default()
        });
        if stored.is_unlocked_at(now) {
            events.extend(self.engine.force_unlock(now));
            return events;
        }
        let started = match stored.first_seen_at {
            Some(reference) => self.engine.start_from(reference, now),
            None => self.engine.start(now),
        };
        if let (Some(_), Some(reference)) = (&started, self.engine.reference()) {
            if let Err(e) =
                LockerProgress::record_start(storage, reference, self.engine.total_seconds())
            {
                tracing::warn!("failed to persist locker progress: {e}");
            }
        }
        events.extend(started);
        events.extend(self.engine.tick(now));
        events
    }
}

/// Cloneable handle to the page's locker timer.
#[derive(Clone)]
pub struct LockerTimer {
    shared: Arc<Mutex<Shared>>,
    /// Held from a command through its broadcast, so listeners see events
    /// in the order they happened.
    broadcast: Arc<Mutex<()>>,
}

impl std::fmt::Debug for LockerTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.lock();
        f.debug_struct("LockerTimer")
            .field("engine", &shared.engine)
            .field("listeners", &shared.listeners.len())
            .finish()
    }
}

impl Default for LockerTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl LockerTimer {
    /// A timer whose progress resets on every run.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A timer that stores its reference and deadline in `storage`.
    pub fn with_progress(storage: Box<dyn KeyValueStore>) -> Self {
        Self::build(Some(storage))
    }

    fn build(progress: Option<Box<dyn KeyValueStore>>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                engine: CountdownEngine::new(),
                listeners: Vec::new(),
                next_listener_id: 0,
                progress,
            })),
            broadcast: Arc::new(Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the shared state, then broadcast what it produced.
    /// Listeners must not issue commands on this timer.
    fn dispatch(&self, f: impl FnOnce(&mut Shared) -> Vec<Event>) -> Vec<Event> {
        let _order = self.broadcast.lock().unwrap_or_else(PoisonError::into_inner);
        let (events, listeners) = {
            let mut shared = self.lock();
            let events = f(&mut shared);
            (events, shared.listeners())
        };
        for event in &events {
            notify(event, &listeners);
        }
        events
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock().engine.snapshot()
    }

    pub fn config(&self) -> LockerConfig {
        self.lock().engine.config().cloned().unwrap_or_default()
    }

    /// Gate decision for the current state.
    pub fn verdict(&self) -> GateVerdict {
        let shared = self.lock();
        let config = shared.engine.config().cloned().unwrap_or_default();
        gate::decide(&config, &shared.engine.snapshot())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn configure(&self, config: LockerConfig, now: DateTime<Utc>) -> Option<Event> {
        self.dispatch(|s| s.configure(config, now)).pop()
    }

    /// Start trigger. With persisted progress, resumes from the stored
    /// reference, or opens at once if the stored deadline has passed.
    pub fn start(&self, now: DateTime<Utc>) -> Vec<Event> {
        self.dispatch(|s| s.start(now))
    }

    /// Video play/pause. Play starts an armed countdown or resumes a paused one.
    pub fn handle_video(&self, signal: VideoSignal, now: DateTime<Utc>) -> Vec<Event> {
        tracing::debug!(?signal, "video signal");
        self.dispatch(|s| match (signal, s.engine.state()) {
            (VideoSignal::Play, TimerState::Idle) => s.start(now),
            (VideoSignal::Play, _) => s.engine.resume(now).into_iter().collect(),
            (VideoSignal::Pause, _) => s.engine.pause(now).into_iter().collect(),
        })
    }

    /// Advance the countdown and broadcast a snapshot, followed by the
    /// unlock event if this tick opened the locker.
    pub fn tick(&self, now: DateTime<Utc>) -> Option<Event> {
        let events = self.dispatch(|s| {
            let unlocked = s.engine.tick(now);
            let mut events = vec![s.engine.snapshot().to_event(now)];
            events.extend(unlocked);
            events
        });
        events
            .into_iter()
            .find(|e| matches!(e, Event::ContentUnlocked { .. }))
    }

    pub fn force_unlock(&self, now: DateTime<Utc>) -> Option<Event> {
        self.dispatch(|s| {
            let event = s.engine.force_unlock(now);
            if let Some(storage) = s.progress.as_deref() {
                if let Err(e) = LockerProgress::record_unlock(storage, now) {
                    tracing::warn!("failed to persist unlock: {e}");
                }
            }
            event.into_iter().collect()
        })
        .pop()
    }

    /// Back to an armed countdown. Clears persisted progress.
    pub fn reset(&self, now: DateTime<Utc>) -> Option<Event> {
        self.dispatch(|s| {
            if let Some(storage) = s.progress.as_deref() {
                if let Err(e) = LockerProgress::clear(storage) {
                    tracing::warn!("failed to clear locker progress: {e}");
                }
            }
            s.engine.reset(now).into_iter().collect()
        })
        .pop()
    }

    // ── Wiring ───────────────────────────────────────────────────────

    /// Follow the store's locker section. Applies the current section now
    /// and on every broadcast after.
    pub fn bind_store(&self, store: &ContentStore) -> Subscription {
        let timer = self.clone();
        store.watch(move |doc| {
            timer.configure(LockerConfig::from(&doc.content_blocker), Utc::now());
        })
    }

    /// Call `listener` with every event this timer emits.
    pub fn subscribe(
        &self,
        listener: impl Fn(&Event) + Send + Sync + 'static,
    ) -> TimerSubscription {
        let mut shared = self.lock();
        let id = shared.next_listener_id;
        shared.next_listener_id += 1;
        shared.listeners.push((id, Arc::new(listener)));
        TimerSubscription {
            id,
            timer: Arc::downgrade(&self.shared),
        }
    }

    /// Tick every `period` until the locker opens or the handle is cancelled.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn_ticker(&self, period: Duration) -> TickerHandle {
        let timer = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                timer.tick(Utc::now());
                if timer.snapshot().state == TimerState::Unlocked {
                    break;
                }
            }
            tracing::debug!("ticker stopped");
        });
        TickerHandle::new(handle)
    }

    /// Fire the page-ready start trigger after `delay`, unless the locker
    /// waits for the video.
    pub fn spawn_auto_start(&self, delay: Duration) -> TickerHandle {
        let timer = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if timer.config().mode != ScheduleMode::AfterVideo {
                timer.start(Utc::now());
            }
        });
        TickerHandle::new(handle)
    }
}

/// Handle returned by [`LockerTimer::subscribe`].
#[derive(Debug)]
pub struct TimerSubscription {
    id: u64,
    timer: Weak<Mutex<Shared>>,
}

impl TimerSubscription {
    /// Stop receiving events. A no-op if the timer is already gone.
    pub fn unsubscribe(self) {
        if let Some(shared) = self.timer.upgrade() {
            let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
            shared.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// A background task owned by the timer. Dropping it cancels the task.
#[derive(Debug)]
pub struct TickerHandle {
    handle: Option<JoinHandle<()>>,
}

impl TickerHandle {
    fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Stop the task. Cancelling twice is a no-op.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the task to end on its own.
    pub async fn finished(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::warn!("timer task failed: {e}");
                }
            }
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn notify(event: &Event, listeners: &[TimerListener]) {
    for listener in listeners {
        if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
            tracing::warn!("timer listener panicked; continuing with the rest");
        }
    }
}
