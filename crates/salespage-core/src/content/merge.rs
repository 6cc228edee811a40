//! Merge-with-default: reconcile a stored document against the current schema.
//!
//! ## Rules
//!
//! - A section missing from the stored document is taken from the default.
//! - A present object section is shallow-merged: stored keys win over default keys.
//! - Collection sections (`doctors.doctors`, `testimonials.customers`,
//!   `news.articles`, `faq.items`) replace the default array wholesale when the
//!   stored section carries an array; otherwise the default array is kept.
//!   Items are never merged against default items. Fields missing from a stored
//!   item take that field type's empty value.
//! - A section that still fails to type-check falls back to its default.
//! - Unknown top-level keys are dropped.
//!
//! The result always deserializes into a complete [`ContentDocument`].

use serde_json::{Map, Value};

use super::document::ContentDocument;
use super::migrate::{self, CURRENT_SCHEMA_VERSION};

/// `(section, array key)` pairs whose arrays replace rather than merge.
pub const COLLECTION_ARRAYS: [(&str, &str); 4] = [
    ("doctors", "doctors"),
    ("testimonials", "customers"),
    ("news", "articles"),
    ("faq", "items"),
];

/// What happened while merging a stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub document: ContentDocument,
    /// Schema version the stored document claimed before migration.
    pub migrated_from: u32,
    /// Sections replaced by their default because the stored value did not fit.
    pub fallback_sections: Vec<String>,
}

/// Merge a stored JSON value with the compiled-in default document.
pub fn merge_with_default(stored: &Value) -> ContentDocument {
    merge_with_report(stored).document
}

/// Like [`merge_with_default`], also reporting migrations and fallbacks.
pub fn merge_with_report(stored: &Value) -> MergeOutcome {
    let default_map = default_map();

    let Value::Object(stored_map) = stored else {
        tracing::warn!("stored content is not a JSON object; using defaults");
        return MergeOutcome {
            document: ContentDocument::default(),
            migrated_from: CURRENT_SCHEMA_VERSION,
            fallback_sections: default_map.keys().cloned().collect(),
        };
    };

    let mut stored_map = stored_map.clone();
    let migrated_from = migrate::migrate(&mut stored_map);
    let merged = merge_values(&default_map, &stored_map);
    let (mut document, fallback_sections) = type_check_sections(&default_map, merged);
    document.schema_version = CURRENT_SCHEMA_VERSION;

    for section in &fallback_sections {
        tracing::warn!(section = %section, "stored section does not match schema; using default");
    }

    MergeOutcome {
        document,
        migrated_from,
        fallback_sections,
    }
}

/// The default document as a JSON object.
fn default_map() -> Map<String, Value> {
    match serde_json::to_value(ContentDocument::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Section-level merge of `stored` over `default`. Pure JSON, no typing.
pub fn merge_values(default: &Map<String, Value>, stored: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(default.len());

    for (key, default_section) in default {
        let merged = match (default_section, stored.get(key)) {
            (_, None) => default_section.clone(),
            (Value::Object(d), Some(Value::Object(s))) => merge_section(key, d, s),
            // Stored shape is wrong for an object section.
            (Value::Object(_), Some(_)) => default_section.clone(),
            (_, Some(s)) => s.clone(),
        };
        out.insert(key.clone(), merged);
    }

    out
}

fn merge_section(key: &str, default: &Map<String, Value>, stored: &Map<String, Value>) -> Value {
    let mut section = default.clone();
    for (field, value) in stored {
        section.insert(field.clone(), value.clone());
    }

    if let Some((_, array_key)) = COLLECTION_ARRAYS.iter().find(|(s, _)| *s == key) {
        let stored_array = stored.get(*array_key).filter(|v| v.is_array());
        let array = stored_array
            .or_else(|| default.get(*array_key))
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        section.insert((*array_key).to_string(), array);
    }

    Value::Object(section)
}

/// Accept merged sections one at a time, keeping the default for any section
/// that breaks deserialization.
fn type_check_sections(
    default: &Map<String, Value>,
    merged: Map<String, Value>,
) -> (ContentDocument, Vec<String>) {
    if let Ok(doc) = serde_json::from_value::<ContentDocument>(Value::Object(merged.clone())) {
        return (doc, Vec::new());
    }

    let mut accepted = default.clone();
    let mut fallbacks = Vec::new();

    for (key, value) in merged {
        let mut candidate = accepted.clone();
        candidate.insert(key.clone(), value);
        if serde_json::from_value::<ContentDocument>(Value::Object(candidate.clone())).is_ok() {
            accepted = candidate;
        } else {
            fallbacks.push(key);
        }
    }

    let doc = serde_json::from_value(Value::Object(accepted)).unwrap_or_default();
    (doc, fallbacks)
}
