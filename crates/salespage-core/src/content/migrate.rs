//! Versioned reshaping of stored documents.
//!
//! Runs on the raw JSON before [`super::merge`], so older stored shapes are
//! brought forward before defaults fill the gaps. Documents without a
//! `schemaVersion` are version 1.

use serde_json::{Map, Value};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

const LEGACY_VERSION: u32 = 1;

/// Read the version a stored document claims.
pub fn stored_version(doc: &Map<String, Value>) -> u32 {
    doc.get("schemaVersion")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(LEGACY_VERSION)
}

/// Apply all pending migrations in place. Returns the version the document
/// started at.
///
/// Documents claiming a newer version than this build are left as they are;
/// the merge step drops whatever this build does not know.
pub fn migrate(doc: &mut Map<String, Value>) -> u32 {
    let from = stored_version(doc);

    if from < 2 {
        migrate_v2(doc);
    }

    if from <= CURRENT_SCHEMA_VERSION {
        doc.insert("schemaVersion".into(), Value::from(CURRENT_SCHEMA_VERSION));
    }
    from
}

/// v2: the locker moved from `pageTimer` to `contentBlocker`, and its
/// `locked*` copy fields became `blocked*`.
fn migrate_v2(doc: &mut Map<String, Value>) {
    let Some(legacy) = doc.remove("pageTimer") else {
        return;
    };
    if doc.contains_key("contentBlocker") {
        tracing::debug!("dropping legacy pageTimer; contentBlocker already present");
        return;
    }
    let Value::Object(legacy) = legacy else {
        return;
    };

    let mut blocker = Map::new();
    for (key, value) in legacy {
        let key = match key.as_str() {
            "lockedTitle" => "blockedTitle".to_string(),
            "lockedSubtitle" => "blockedSubtitle".to_string(),
            "lockedMessage" => "blockedMessage".to_string(),
            _ => key,
        };
        blocker.insert(key, value);
    }
    tracing::info!("migrated legacy pageTimer section into contentBlocker");
    doc.insert("contentBlocker".into(), Value::Object(blocker));
}
