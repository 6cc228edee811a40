pub mod collection;
pub mod config;
pub mod content;
pub mod locker;

use salespage_core::{AppConfig, ContentStore, Database};
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_database(config: &AppConfig) -> Result<Database, salespage_core::StorageError> {
    Database::open(&config.storage.database_file)
}

pub fn open_store(config: &AppConfig) -> Result<ContentStore, salespage_core::StorageError> {
    Ok(ContentStore::open(Box::new(open_database(config)?)))
}

/// The store keeps working in memory when a write fails; a one-shot CLI
/// run must not.
pub fn ensure_persisted(store: &ContentStore) -> CommandResult {
    match store.last_persist_error() {
        Some(e) => Err(format!("content was not saved: {e}").into()),
        None => Ok(()),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
