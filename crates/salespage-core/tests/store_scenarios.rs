//! Integration tests for the content store over real storage.
//!
//! These tests verify persistence across reopen, legacy migration on load,
//! import/export, and reset behaviour against the SQLite backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use salespage_core::content::document::{Footer, Guarantee, TopBanner};
use salespage_core::storage::CONTENT_KEY;
use salespage_core::{
    CollectionItem, ContentDocument, ContentPatch, ContentStore, Database, KeyValueStore,
    MemoryStore, Section, TextField,
};

fn open(dir: &tempfile::TempDir) -> ContentStore {
    let db = Database::open_at(&dir.path().join("content.db")).unwrap();
    ContentStore::open(Box::new(db))
}

#[test]
fn test_edits_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open(&dir);
        store.set_text(TextField::TopBannerTitle, "Persisted");
        store.add_item(CollectionItem::Faq(Default::default()));
        assert!(store.last_persist_error().is_none());
    }
    let store = open(&dir);
    let doc = store.get_content();
    assert_eq!(doc.top_banner.title, "Persisted");
    assert_eq!(doc.faq.items.len(), ContentDocument::default().faq.items.len() + 1);
}

#[test]
fn test_reset_after_many_updates_restores_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    store.update_section(Section::TopBanner(TopBanner {
        title: "one".into(),
        ..TopBanner::default()
    }));
    store.update_section(Section::Footer(Footer {
        brand_name: "two".into(),
        ..Footer::default()
    }));
    store.update_section(Section::Guarantee(Guarantee {
        days: "30".into(),
        ..Guarantee::default()
    }));
    store.reset_to_default();
    assert_eq!(store.get_content(), ContentDocument::default());

    drop(store);
    assert_eq!(open(&dir).get_content(), ContentDocument::default());
}

#[test]
fn test_update_content_replaces_only_patched_sections() {
    let store = ContentStore::in_memory();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let _sub = store.subscribe(move |doc| {
        assert_eq!(doc.footer.brand_name, "PATCHED");
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let patch = ContentPatch::default().with(Section::Footer(Footer {
        brand_name: "PATCHED".into(),
        ..Footer::default()
    }));
    store.update_content(patch);

    let doc = store.get_content();
    assert_eq!(doc.footer.brand_name, "PATCHED");
    assert_eq!(doc.video, ContentDocument::default().video);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_legacy_stored_document_is_migrated_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("content.db")).unwrap();
    db.set(
        CONTENT_KEY,
        r#"{"pageTimer": {"enabled": true, "unlockTimeMinutes": 3, "lockedMessage": "in {{time}}"},
            "footer": {"brandName": "OLD"},
            "retiredSection": {"x": 1}}"#,
    )
    .unwrap();

    let store = ContentStore::open(Box::new(db));
    let doc = store.get_content();
    assert!(doc.content_blocker.enabled);
    assert_eq!(doc.content_blocker.unlock_time_minutes, 3);
    assert_eq!(doc.content_blocker.blocked_message, "in {{time}}");
    assert_eq!(doc.footer.brand_name, "OLD");
    assert_eq!(doc.schema_version, 2);
}

#[test]
fn test_export_import_roundtrip() {
    let source = ContentStore::in_memory();
    source.set_text(TextField::FaqTitle, "Exported FAQ");
    source.set_text(TextField::MainOfferTotalPrice, "$99");
    let exported = source.export_content();

    let target = ContentStore::in_memory();
    assert!(target.import_content(&exported));
    assert_eq!(target.get_content(), source.get_content());
}

#[test]
fn test_quota_failure_keeps_session_working() {
    let store = ContentStore::open(Box::new(MemoryStore::with_quota(16)));
    store.set_text(TextField::FooterBrandName, "IN MEMORY");
    assert_eq!(store.get_content().footer.brand_name, "IN MEMORY");
    assert!(store.last_persist_error().is_some());
}

#[test]
fn test_ids_are_never_reused_in_a_session() {
    use salespage_core::CollectionKind;

    let store = ContentStore::in_memory();
    let mut issued = Vec::new();
    for _ in 0..3 {
        let id = store.add_item(CollectionItem::Faq(Default::default()));
        store.remove_item(CollectionKind::Faq, id).unwrap();
        issued.push(id);
    }
    let mut unique = issued.clone();
    unique.dedup();
    assert_eq!(unique, issued);
    assert!(issued.windows(2).all(|w| w[0] < w[1]));
}
