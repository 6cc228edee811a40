//! Property tests for merge-with-default.
//!
//! Whatever shape a stored document has, the merged result carries every key
//! of the default document, and documents the store itself produced survive
//! an export/merge cycle unchanged.

use proptest::prelude::*;
use serde_json::{Map, Value};

use salespage_core::content::merge::merge_with_default;
use salespage_core::{ContentDocument, SectionKey, TextField};

fn default_json() -> Value {
    serde_json::to_value(ContentDocument::default()).unwrap()
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// A section value: either noise, or the default section with some fields
/// overwritten by noise.
fn arb_section(key: SectionKey) -> impl Strategy<Value = Value> {
    let default_section = default_json()[key.as_str()].clone();
    let fields: Vec<String> = default_section
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();
    let noisy_fields = if fields.is_empty() {
        Just(Vec::new()).boxed()
    } else {
        prop::collection::vec((prop::sample::select(fields), arb_json()), 0..4).boxed()
    };
    prop_oneof![
        arb_json(),
        noisy_fields.prop_map(move |edits| {
            let mut section = default_section.clone();
            if let Some(obj) = section.as_object_mut() {
                for (field, value) in edits {
                    obj.insert(field, value);
                }
            }
            section
        }),
    ]
}

fn arb_stored_document() -> impl Strategy<Value = Value> {
    prop::collection::vec(prop::sample::select(SectionKey::ALL.to_vec()), 0..6)
        .prop_flat_map(|keys| {
            keys.into_iter()
                .map(|k| arb_section(k).prop_map(move |v| (k.as_str().to_string(), v)))
                .collect::<Vec<_>>()
        })
        .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>()))
}

/// Every object key in `expected` appears in `actual`. Arrays are not walked;
/// collections are replaced wholesale.
fn assert_keys_present(expected: &Value, actual: &Value, path: &str) {
    if let (Value::Object(e), Value::Object(a)) = (expected, actual) {
        for (key, value) in e {
            let child = format!("{path}.{key}");
            let Some(found) = a.get(key) else {
                panic!("missing key {child}");
            };
            assert!(!found.is_null() || value.is_null(), "null at {child}");
            assert_keys_present(value, found, &child);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: the merged document declares every default key.
    #[test]
    fn prop_merge_is_complete(stored in arb_stored_document()) {
        let merged = serde_json::to_value(merge_with_default(&stored)).unwrap();
        assert_keys_present(&default_json(), &merged, "$");
    }

    /// Property: merging is a no-op on documents the store produced.
    #[test]
    fn prop_merge_of_exported_document_is_identity(
        edits in prop::collection::vec(
            (prop::sample::select(TextField::ALL.to_vec()), "[ -~]{0,24}"),
            0..8,
        ),
        keep_doctors in 0usize..=3,
    ) {
        let mut doc = ContentDocument::default();
        for (field, value) in edits {
            *field.get_mut(&mut doc) = value;
        }
        doc.doctors.doctors.truncate(keep_doctors);

        let exported: Value = serde_json::from_str(&serde_json::to_string(&doc).unwrap()).unwrap();
        prop_assert_eq!(merge_with_default(&exported), doc);
    }

    /// Property: merging twice changes nothing.
    #[test]
    fn prop_merge_is_idempotent(stored in arb_stored_document()) {
        let once = merge_with_default(&stored);
        let twice = merge_with_default(&serde_json::to_value(&once).unwrap());
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn test_empty_object_is_complete() {
    let merged = serde_json::to_value(merge_with_default(&Value::Object(Map::new()))).unwrap();
    assert_eq!(merged, default_json());
}

#[test]
fn test_stored_array_wins_wholesale() {
    let stored = serde_json::json!({
        "doctors": {"doctors": [{"id": 1, "name": "Dr. Solo"}]}
    });
    let merged = merge_with_default(&stored);
    assert_eq!(merged.doctors.doctors.len(), 1);
    assert_eq!(merged.doctors.doctors[0].name, "Dr. Solo");
    // Fields missing from the stored item are empty, not taken from default item 1.
    assert!(merged.doctors.doctors[0].institution.is_empty());
}
