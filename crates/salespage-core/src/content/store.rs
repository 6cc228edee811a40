//! The content store: single owner of the live [`ContentDocument`].
//!
//! Construct one store per process and hand clones of it to whatever needs
//! content. Every mutation is synchronous: it updates the in-memory document,
//! writes it through to storage, then calls every subscriber with the full
//! new document before returning.
//!
//! Persistence failures are logged and remembered, never raised; the
//! in-memory document stays authoritative for the session.
//!
//! Listeners run after the document lock is released, so they may read the
//! store. Broadcasts are serialized: listeners see commits in commit order,
//! and must not mutate the store they listen to. A panicking listener is
//! isolated and does not stop the others.

use std::convert::Infallible;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::document::ContentDocument;
use super::edit::IdAllocator;
use super::merge::{merge_with_report, MergeOutcome};
use super::section::{ContentPatch, Section};
use crate::error::{CoreError, Result};
use crate::storage::{KeyValueStore, MemoryStore, CONTENT_KEY};

/// Subscriber callback. Receives the whole document on every change.
pub type Listener = Arc<dyn Fn(&ContentDocument) + Send + Sync>;

struct Inner {
    document: ContentDocument,
    storage: Box<dyn KeyValueStore>,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    ids: IdAllocator,
    last_persist_error: Option<String>,
}

impl Inner {
    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.document) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize content: {e}");
                self.last_persist_error = Some(e.to_string());
                return;
            }
        };
        match self.storage.set(CONTENT_KEY, &json) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::warn!("failed to persist content: {e}");
                self.last_persist_error = Some(e.to_string());
            }
        }
    }

    fn listeners(&self) -> Vec<Listener> {
        self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
    }
}

/// Shared handle to the content store. Cloning is cheap and shares state.
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<Mutex<Inner>>,
    /// Held from commit through notify.
    broadcast: Arc<Mutex<()>>,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ContentStore")
            .field("listeners", &inner.listeners.len())
            .field("last_persist_error", &inner.last_persist_error)
            .finish()
    }
}

impl ContentStore {
    /// Load the document from `storage`, falling back to defaults when the
    /// stored copy is missing, unreadable or corrupt.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let document = load(storage.as_ref());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                document,
                storage,
                listeners: Vec::new(),
                next_listener_id: 0,
                ids: IdAllocator::default(),
                last_persist_error: None,
            })),
            broadcast: Arc::new(Mutex::new(())),
        }
    }

    /// A store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStore::new()))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_broadcast(&self) -> MutexGuard<'_, ()> {
        self.broadcast.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// A copy of the current document.
    pub fn get_content(&self) -> ContentDocument {
        self.lock().document.clone()
    }

    /// Borrow the current document without copying it.
    ///
    /// The store is locked while `f` runs; do not call back into the store.
    pub fn read<R>(&self, f: impl FnOnce(&ContentDocument) -> R) -> R {
        f(&self.lock().document)
    }

    /// Pretty-printed JSON of the whole document.
    pub fn export_content(&self) -> String {
        let inner = self.lock();
        serde_json::to_string_pretty(&inner.document).unwrap_or_else(|e| {
            tracing::warn!("failed to export content: {e}");
            "{}".to_string()
        })
    }

    /// Message of the most recent failed write, cleared by the next good one.
    pub fn last_persist_error(&self) -> Option<String> {
        self.lock().last_persist_error.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace every section present in `patch`.
    pub fn update_content(&self, patch: ContentPatch) {
        let sections = patch.into_sections();
        tracing::debug!(sections = sections.len(), "update_content");
        self.replace(|doc| {
            for section in sections {
                section.apply_to(doc);
            }
        });
    }

    /// Replace one section wholesale.
    pub fn update_section(&self, section: Section) {
        tracing::debug!(section = %section.key(), "update_section");
        self.replace(|doc| section.apply_to(doc));
    }

    /// Discard all customization and go back to the compiled-in document.
    pub fn reset_to_default(&self) {
        tracing::info!("resetting content to defaults");
        self.replace(|doc| *doc = ContentDocument::default());
    }

    /// Import a serialized document. Returns `false`, leaving the current
    /// document untouched, if the input is not a JSON object.
    pub fn import_content(&self, serialized: &str) -> bool {
        match self.try_import(serialized) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("failed to import content: {e}");
                false
            }
        }
    }

    /// Import, reporting what the merge did.
    ///
    /// # Errors
    /// Returns an error if the input does not parse as a JSON object.
    pub fn try_import(&self, serialized: &str) -> Result<MergeOutcome> {
        let value: serde_json::Value = serde_json::from_str(serialized)?;
        if !value.is_object() {
            return Err(CoreError::Custom(
                "imported content must be a JSON object".to_string(),
            ));
        }
        let outcome = merge_with_report(&value);
        let document = outcome.document.clone();
        tracing::info!(
            migrated_from = outcome.migrated_from,
            fallbacks = outcome.fallback_sections.len(),
            "importing content"
        );
        self.replace(|doc| *doc = document);
        Ok(outcome)
    }

    fn replace(&self, f: impl FnOnce(&mut ContentDocument)) {
        let committed = self.commit(|doc, _| {
            f(doc);
            Ok::<(), Infallible>(())
        });
        if let Err(never) = committed {
            match never {}
        }
    }

    /// Apply `f` to a draft of the document and commit it if `f` succeeds.
    /// On error nothing changes and nobody is notified.
    pub(crate) fn commit<T, E>(
        &self,
        f: impl FnOnce(&mut ContentDocument, &mut IdAllocator) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let _order = self.lock_broadcast();
        let (value, snapshot, listeners) = {
            let mut inner = self.lock();
            let mut draft = inner.document.clone();
            let mut ids = inner.ids.clone();
            let value = f(&mut draft, &mut ids)?;
            inner.document = draft;
            inner.ids = ids;
            inner.persist();
            (value, inner.document.clone(), inner.listeners())
        };
        notify(&snapshot, &listeners);
        Ok(value)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Call `listener` with the full document after every mutation.
    pub fn subscribe(
        &self,
        listener: impl Fn(&ContentDocument) + Send + Sync + 'static,
    ) -> Subscription {
        let mut inner = self.lock();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        tracing::debug!(total = inner.listeners.len(), "listener subscribed");
        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribe and call `listener` once with the current document.
    ///
    /// No commit can slip between the initial call and the registration, so
    /// the last document `listener` sees is always the latest one.
    pub fn watch(
        &self,
        listener: impl Fn(&ContentDocument) + Send + Sync + 'static,
    ) -> Subscription {
        let _order = self.lock_broadcast();
        let listener: Listener = Arc::new(listener);
        let forward = Arc::clone(&listener);
        let subscription = self.subscribe(move |doc| forward(doc));
        let snapshot = self.get_content();
        notify(&snapshot, &[listener]);
        subscription
    }
}

/// Handle returned by [`ContentStore::subscribe`].
///
/// Dropping it does not unsubscribe; call [`Subscription::unsubscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    store: Weak<Mutex<Inner>>,
}

impl Subscription {
    /// Stop receiving updates. A no-op if the store is already gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.retain(|(id, _)| *id != self.id);
            tracing::debug!(remaining = inner.listeners.len(), "listener unsubscribed");
        }
    }
}

fn load(storage: &dyn KeyValueStore) -> ContentDocument {
    let stored = match storage.get(CONTENT_KEY) {
        Ok(Some(stored)) => stored,
        Ok(None) => return ContentDocument::default(),
        Err(e) => {
            tracing::warn!("failed to read stored content: {e}");
            return ContentDocument::default();
        }
    };
    match serde_json::from_str::<serde_json::Value>(&stored) {
        Ok(value) => merge_with_report(&value).document,
        Err(e) => {
            tracing::warn!("stored content is corrupt, using defaults: {e}");
            ContentDocument::default()
        }
    }
}

fn notify(document: &ContentDocument, listeners: &[Listener]) {
    for listener in listeners {
        if catch_unwind(AssertUnwindSafe(|| listener(document))).is_err() {
            tracing::warn!("content listener panicked; continuing with the rest");
        }
    }
}
