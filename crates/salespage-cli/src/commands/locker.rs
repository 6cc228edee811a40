use std::io::BufRead;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Subcommand, ValueEnum};
use salespage_core::content::ScheduleMode;
use salespage_core::timer::{
    format_remaining, progress_pct, render_blocked_message, LockerProgress,
};
use salespage_core::{
    AppConfig, ContentStore, Event, LockerConfig, LockerEdit, LockerTimer, VideoSignal,
};
use serde_json::json;

use super::{ensure_persisted, open_database, open_store, print_json, CommandResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Immediate,
    SpecificTime,
    AfterVideo,
}

impl From<ModeArg> for ScheduleMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Immediate => ScheduleMode::Immediate,
            ModeArg::SpecificTime => ScheduleMode::SpecificTime,
            ModeArg::AfterVideo => ScheduleMode::AfterVideo,
        }
    }
}

#[derive(Subcommand)]
pub enum LockerAction {
    /// Print the locker config, countdown state and gate verdict
    Status,
    /// Change the locker settings
    Configure {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        minutes: Option<i64>,
        #[arg(long)]
        seconds: Option<i64>,
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Countdown start for `specific-time` (RFC 3339)
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long)]
        timer_display: Option<bool>,
    },
    /// Run the countdown, printing events as JSON lines until it unlocks
    Watch {
        /// Read "play"/"pause" lines from stdin instead of auto-starting
        #[arg(long)]
        after_video: bool,
    },
    /// Open the locker now
    ForceUnlock,
    /// Forget stored countdown progress
    ResetProgress,
}

/// A timer following `store`, optionally backed by stored progress.
fn bound_timer(
    config: &AppConfig,
    store: &ContentStore,
    with_progress: bool,
) -> Result<LockerTimer, Box<dyn std::error::Error>> {
    let timer = if with_progress {
        LockerTimer::with_progress(Box::new(open_database(config)?))
    } else {
        LockerTimer::new()
    };
    timer.bind_store(store);
    Ok(timer)
}

fn status(config: &AppConfig) -> CommandResult {
    let store = open_store(config)?;
    let db = open_database(config)?;
    let progress = LockerProgress::load(&db)?;
    let has_progress = progress != LockerProgress::default();
    let timer = bound_timer(config, &store, has_progress)?;
    if has_progress {
        timer.start(Utc::now());
    }

    let locker = timer.config();
    let snapshot = timer.snapshot();
    let message = store.read(|doc| {
        render_blocked_message(&doc.content_blocker.blocked_message, &locker)
    });
    print_json(&json!({
        "config": locker,
        "timer": snapshot,
        "gate": timer.verdict(),
        "display": {
            "remaining": format_remaining(snapshot.remaining_seconds),
            "progressPct": progress_pct(snapshot.remaining_seconds, snapshot.total_seconds),
            "blockedMessage": message,
        },
        "progress": {
            "firstSeenAt": progress.first_seen_at,
            "unlockedUntil": progress.unlocked_until,
        },
    }))
}

fn watch(config: &AppConfig, after_video: bool) -> CommandResult {
    let store = open_store(config)?;
    let timer = bound_timer(config, &store, config.locker.persist_progress)?;

    let locker = timer.config();
    if !locker.gates() {
        print_json(&timer.snapshot().to_event(Utc::now()))?;
        return Ok(());
    }

    let _printer = timer.subscribe(|event| {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let period = Duration::from_millis(config.locker.tick_interval_ms.max(1));
        let ticker = timer.spawn_ticker(period);

        let _auto_start = if after_video || locker.mode == ScheduleMode::AfterVideo {
            let video = timer.clone();
            std::thread::spawn(move || read_video_signals(&video));
            None
        } else {
            let delay = Duration::from_secs(config.locker.auto_start_delay_secs);
            Some(timer.spawn_auto_start(delay))
        };

        ticker.finished().await;
    });
    Ok(())
}

fn read_video_signals(timer: &LockerTimer) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let signal = match line.trim() {
            "play" => VideoSignal::Play,
            "pause" => VideoSignal::Pause,
            "" => continue,
            other => {
                tracing::warn!("ignoring unknown video signal {other:?}");
                continue;
            }
        };
        timer.handle_video(signal, Utc::now());
    }
}

pub fn run(action: LockerAction, config: &AppConfig) -> CommandResult {
    match action {
        LockerAction::Status => status(config)?,
        LockerAction::Configure {
            enabled,
            minutes,
            seconds,
            mode,
            start,
            timer_display,
        } => {
            let edits: Vec<LockerEdit> = [
                enabled.map(LockerEdit::Enabled),
                minutes.map(LockerEdit::UnlockMinutes),
                seconds.map(LockerEdit::UnlockSeconds),
                mode.map(|m| LockerEdit::Mode(m.into())),
                start.map(|at| LockerEdit::ScheduledStart(Some(at))),
                timer_display.map(LockerEdit::TimerDisplay),
            ]
            .into_iter()
            .flatten()
            .collect();

            let store = open_store(config)?;
            store.edit_locker(&edits)?;
            ensure_persisted(&store)?;
            let locker = store.read(|doc| LockerConfig::from(&doc.content_blocker));
            print_json(&Event::LockerConfigured {
                enabled: locker.enabled,
                mode: locker.mode,
                total_seconds: locker.total_unlock_seconds(),
                at: Utc::now(),
            })?;
        }
        LockerAction::Watch { after_video } => watch(config, after_video)?,
        LockerAction::ForceUnlock => {
            let store = open_store(config)?;
            let timer = bound_timer(config, &store, true)?;
            let now = Utc::now();
            match timer.force_unlock(now) {
                Some(event) => print_json(&event)?,
                None => print_json(&timer.snapshot().to_event(now))?,
            }
        }
        LockerAction::ResetProgress => {
            let store = open_store(config)?;
            let timer = bound_timer(config, &store, true)?;
            if let Some(event) = timer.reset(Utc::now()) {
                print_json(&event)?;
            }
        }
    }
    Ok(())
}
