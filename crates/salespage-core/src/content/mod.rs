//! Page content: the document model, its schema evolution and the store that
//! owns the live copy.

pub mod document;
mod edit;
pub mod merge;
pub mod migrate;
mod section;
mod store;

pub use document::{ContentBlocker, ContentDocument, ScheduleMode};
pub use edit::{CollectionItem, CollectionKind, IdAllocator, LockerEdit, TextField};
pub use merge::{merge_with_default, merge_with_report, MergeOutcome};
pub use migrate::CURRENT_SCHEMA_VERSION;
pub use section::{ContentPatch, Section, SectionKey};
pub use store::{ContentStore, Listener, Subscription};
