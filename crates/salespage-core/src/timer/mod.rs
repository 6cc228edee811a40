mod config;
mod driver;
mod engine;
pub mod gate;
mod progress;

pub use config::LockerConfig;
pub use driver::{LockerTimer, TickerHandle, TimerListener, TimerSubscription, VideoSignal};
pub use engine::{CountdownEngine, TimerSnapshot, TimerState};
pub use gate::{decide, format_remaining, progress_pct, render_blocked_message, GateVerdict};
pub use progress::LockerProgress;
