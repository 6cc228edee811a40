//! # Salespage Core Library
//!
//! This library provides the core logic behind an editable, content-driven
//! sales page. Every operation is available through the standalone `salespage`
//! CLI; a page renderer is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Content Store**: the single owner of the live content document. Every
//!   mutation persists write-through and rebroadcasts the whole document.
//! - **Schema Merge**: reconciles stored or imported documents with the current
//!   schema (versioned migration, then merge-with-default).
//! - **Locker Timer**: a wall-clock countdown state machine that the caller
//!   ticks, plus a pure gate deciding whether protected content is shown.
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`ContentStore`]: content document owner and broadcaster
//! - [`CountdownEngine`]: locker state machine
//! - [`LockerTimer`]: shared engine with listeners and a tokio ticker
//! - [`Database`]: key-value persistence
//! - [`AppConfig`]: application configuration management

pub mod content;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use content::{
    CollectionItem, CollectionKind, ContentDocument, ContentPatch, ContentStore, LockerEdit,
    Section, SectionKey, Subscription, TextField,
};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use storage::{AppConfig, Database, KeyValueStore, MemoryStore};
pub use timer::{
    CountdownEngine, GateVerdict, LockerConfig, LockerTimer, TimerSnapshot, TimerState,
    VideoSignal,
};
