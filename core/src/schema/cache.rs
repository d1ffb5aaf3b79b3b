//! Schema cache with single-flight fetching and relationship-path walking.
//!
//! The cache lives as long as the editor instance and is passed explicitly
//! into every call that needs schemas. Entries are keyed by collection name
//! and never evicted; a failed fetch resolves to the empty schema so
//! completion degrades instead of erroring.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::schema::model::Schema;

/// Errors that can occur while fetching a schema.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher knows no collection by that name.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Transport-level failure.
    #[error("Schema fetch failed: {0}")]
    Transport(String),
}

/// Source of collection schemas.
///
/// Implementations must be thread-safe; the editor front end backs this
/// with an HTTP endpoint, tests and the CLI with [`StaticFetcher`].
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    /// Fetches the schema for `collection`.
    async fn fetch(&self, collection: &str) -> Result<Schema, FetchError>;
}

/// In-memory [`SchemaFetcher`] over a fixed name-to-schema map.
///
/// Counts the fetches it serves so tests can assert that the cache issues
/// at most one per collection.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    schemas: HashMap<String, Schema>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    /// Creates an empty fetcher that fails every lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collection's schema.
    #[must_use]
    pub fn with_schema(mut self, collection: impl Into<String>, schema: Schema) -> Self {
        self.schemas.insert(collection.into(), schema);
        self
    }

    /// Number of fetches served so far, failed lookups included.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaFetcher for StaticFetcher {
    async fn fetch(&self, collection: &str) -> Result<Schema, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.schemas
            .get(collection)
            .cloned()
            .ok_or_else(|| FetchError::UnknownCollection(collection.to_owned()))
    }
}

type Entry = Arc<OnceCell<Arc<Schema>>>;

/// Caches schemas by collection name, fetching each at most once.
///
/// Concurrent callers for the same uncached collection share a single
/// fetch. The lock only guards the entry map and is never held across an
/// await.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use dequel_core::schema::{Schema, SchemaCache, StaticFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fetcher = StaticFetcher::new().with_schema("books", Schema::default());
/// let cache = SchemaCache::new(Arc::new(fetcher));
/// let schema = cache.get("books").await;
/// assert!(schema.fields.is_empty());
/// # }
/// ```
pub struct SchemaCache {
    fetcher: Arc<dyn SchemaFetcher>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SchemaCache {
    /// Creates an empty cache over the given fetcher.
    #[must_use]
    pub fn new(fetcher: Arc<dyn SchemaFetcher>) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the schema for `collection`, fetching it on first use.
    ///
    /// A failed fetch is logged and cached as the empty schema; it is not
    /// retried for the lifetime of the cache.
    pub async fn get(&self, collection: &str) -> Arc<Schema> {
        let cell = self.entry(collection);
        cell.get_or_init(|| async {
            debug!(collection, "fetching schema");
            match self.fetcher.fetch(collection).await {
                Ok(schema) => Arc::new(schema),
                Err(error) => {
                    debug!(collection, %error, "schema fetch failed, caching empty schema");
                    Arc::new(Schema::default())
                }
            }
        })
        .await
        .clone()
    }

    /// Seeds a resolved schema, overriding any cached or in-flight fetch
    /// for that collection.
    pub fn prime(&self, collection: impl Into<String>, schema: Schema) {
        let entry = Arc::new(OnceCell::new_with(Some(Arc::new(schema))));
        self.lock_entries().insert(collection.into(), entry);
    }

    /// Walks a dotted relationship path starting from `base`, fetching each
    /// hop's target schema through the cache.
    ///
    /// Returns `None` as soon as a segment names a missing field, a field
    /// that is not a relationship, or a relationship without a target.
    pub async fn resolve_path(&self, segments: &[&str], base: Arc<Schema>) -> Option<Arc<Schema>> {
        let mut schema = base;
        for segment in segments {
            let target = schema.field(segment)?.relationship_target()?.to_owned();
            schema = self.get(&target).await;
        }
        Some(schema)
    }

    fn entry(&self, collection: &str) -> Entry {
        self.lock_entries()
            .entry(collection.to_owned())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // The map stays consistent even if a holder panicked mid-insert, so
        // a poisoned lock is safe to keep using.
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.lock_entries().len();
        f.debug_struct("SchemaCache")
            .field("entries", &entries)
            .finish_non_exhaustive()
    }
}
