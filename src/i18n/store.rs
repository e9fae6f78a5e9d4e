//! Translation mapping store.
//!
//! The store owns the merged `key -> language -> value` table built from one
//! or more [`ResourceSource`]s. The visible table lives in an immutable
//! [`TableSnapshot`] behind an `RwLock<Arc<_>>`:
//!
//! - readers hold the read lock only long enough to clone the `Arc`;
//! - `rebuild()` refreshes sources and decodes documents without touching
//!   that lock, then takes the write lock just to swap in the new snapshot.
//!
//! Rebuilds are serialized by the mutex around the sources, so at most one
//! rebuild runs per store at a time.

use crate::error::{Error, Result, SourceError};
use crate::i18n::source::{Document, ResourceSource};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// All known translations of one key, keyed by language tag.
pub type ValueSet = HashMap<String, String>;

/// Translation key to value set.
pub type TranslationTable = HashMap<String, ValueSet>;

/// An immutable view of the table as of one rebuild.
#[derive(Debug, Default)]
pub struct TableSnapshot {
    table: TranslationTable,
    built_at: Option<DateTime<Utc>>,
}

impl TableSnapshot {
    /// Value set for a key, if present.
    pub fn get(&self, key: &str) -> Option<&ValueSet> {
        self.table.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Number of keys in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Completion time of the rebuild that produced this snapshot.
    /// `None` for the empty table a store starts with.
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }
}

/// Outcome of a [`TranslationStore::rebuild`].
#[derive(Debug)]
pub struct RebuildReport {
    /// Documents decoded and merged into the table
    pub documents_loaded: usize,

    /// Refresh, open and decode failures that were skipped
    pub failures: Vec<SourceError>,

    /// Number of keys in the new table
    pub keys: usize,

    /// When the new table became visible
    pub completed_at: DateTime<Utc>,
}

impl RebuildReport {
    /// Check if every source refreshed and every document decoded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Concurrency-safe translation table built from resource sources.
pub struct TranslationStore {
    sources: Mutex<Vec<Box<dyn ResourceSource>>>,
    snapshot: RwLock<Arc<TableSnapshot>>,
}

impl std::fmt::Debug for TranslationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("TranslationStore")
            .field("keys", &snapshot.len())
            .field("built_at", &snapshot.built_at())
            .finish()
    }
}

impl TranslationStore {
    /// Create a store with an empty table. Call [`rebuild`](Self::rebuild)
    /// to load the sources.
    pub fn new(sources: Vec<Box<dyn ResourceSource>>) -> Self {
        Self {
            sources: Mutex::new(sources),
            snapshot: RwLock::new(Arc::new(TableSnapshot::default())),
        }
    }

    /// Create a store and build its table right away.
    pub fn load(sources: Vec<Box<dyn ResourceSource>>) -> (Self, RebuildReport) {
        let store = Self::new(sources);
        let report = store.rebuild();
        (store, report)
    }

    /// Append a source. It contributes from the next rebuild on, after all
    /// sources added before it.
    pub fn add_source(&self, source: Box<dyn ResourceSource>) {
        self.sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(source);
    }

    pub fn source_count(&self) -> usize {
        self.sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Rebuild the table from every source and publish it atomically.
    ///
    /// Per-source and per-document failures are logged, collected in the
    /// report and otherwise ignored. Value sets for the same key are merged
    /// by union; when two documents define the same key and language, the
    /// later document wins (sources in order, then documents in the order
    /// each source lists them).
    pub fn rebuild(&self) -> RebuildReport {
        let mut sources = self.sources.lock().unwrap_or_else(PoisonError::into_inner);

        let mut table = TranslationTable::new();
        let mut failures = Vec::new();
        let mut documents_loaded = 0;

        for source in sources.iter_mut() {
            debug!("Refreshing translation source {}", source.name());
            if let Err(e) = source.refresh() {
                warn!("{}", e);
                failures.push(e);
            }

            for document in source.documents() {
                match decode_document(document.as_ref()) {
                    Ok(decoded) => {
                        merge_into(&mut table, decoded);
                        documents_loaded += 1;
                    }
                    Err(e) => {
                        warn!("{}", e);
                        failures.push(e);
                    }
                }
            }
        }

        let keys = table.len();
        let completed_at = Utc::now();
        let next = Arc::new(TableSnapshot {
            table,
            built_at: Some(completed_at),
        });

        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = next;
        drop(sources);

        info!(
            "Translation table rebuilt: {} key(s) from {} document(s), {} failure(s)",
            keys,
            documents_loaded,
            failures.len()
        );

        RebuildReport {
            documents_loaded,
            failures,
            keys,
            completed_at,
        }
    }

    /// The current table. The returned snapshot stays consistent even if a
    /// rebuild replaces the store's table meanwhile.
    pub fn snapshot(&self) -> Arc<TableSnapshot> {
        let current = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Full value set for a key.
    pub fn lookup_all(&self, key: &str) -> Result<ValueSet> {
        self.snapshot()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Completion time of the last rebuild, `None` before the first one.
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot().built_at()
    }
}

fn decode_document(document: &dyn Document) -> std::result::Result<TranslationTable, SourceError> {
    let reader = document.open()?;
    serde_json::from_reader(reader).map_err(|source| SourceError::Decode {
        document: document.name(),
        source,
    })
}

fn merge_into(table: &mut TranslationTable, decoded: TranslationTable) {
    for (key, values) in decoded {
        table.entry(key).or_default().extend(values);
    }
}
