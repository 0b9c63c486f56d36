//! Answer cache: key-value stores and the caching resolver.

use crate::error::{Result, SnippetError};
use crate::host::ContentResolver;
use crate::locator::AnswerLocator;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Key-value handle attached to a session at startup.
///
/// Values are whole answer documents keyed by locator URI. Entries are never
/// evicted; a store lives as long as its session.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn put(&self, key: &str, value: String) -> Result<()>;

    /// Persists pending writes. A no-op for volatile stores.
    async fn flush(&self) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Volatile store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Store persisted as a JSON object on disk.
///
/// The file is read once in [`FileStore::open`] and rewritten on
/// [`KeyValueStore::flush`] when something changed. Writes go through a
/// temporary sibling file and a rename.
///
/// # Examples
///
/// ```no_run
/// use snippet_core::cache::{FileStore, KeyValueStore};
///
/// # async fn example() -> snippet_core::error::Result<()> {
/// let store = FileStore::open("/tmp/snippet-cache.json").await?;
/// store.put("snippet:/rust/q?answer=0&verbose=false", "fn main() {}".into())?;
/// store.flush().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
    dirty: AtomicBool,
}

impl FileStore {
    /// Opens the store, starting empty if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let map: BTreeMap<String, String> = serde_json::from_str(&content)?;
                tracing::debug!("loaded {} cached answers from {}", map.len(), path.display());
                map.into_iter().collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries,
            dirty: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn put(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let body = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let written = async {
            tokio::fs::write(&tmp, body).await?;
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;

        if let Err(e) = written {
            self.dirty.store(true, Ordering::SeqCst);
            return Err(SnippetError::CacheError(format!(
                "failed to write {}: {}",
                self.path.display(),
                e
            )));
        }

        tracing::debug!("flushed {} cached answers to {}", snapshot.len(), self.path.display());
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Resolver that consults a [`KeyValueStore`] before delegating.
///
/// Locators are deterministic, so a stored document is served without
/// calling the inner resolver. Failed resolutions are not stored.
pub struct CachingResolver {
    inner: Arc<dyn ContentResolver>,
    store: Arc<dyn KeyValueStore>,
}

impl CachingResolver {
    pub fn new(inner: Arc<dyn ContentResolver>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl ContentResolver for CachingResolver {
    async fn resolve(&self, locator: &AnswerLocator) -> Result<String> {
        let key = locator.to_uri();
        if let Some(text) = self.store.get(&key) {
            tracing::debug!("cache hit: {}", key);
            return Ok(text);
        }

        let text = self.inner.resolve(locator).await?;
        if let Err(e) = self.store.put(&key, text.clone()) {
            tracing::warn!("failed to cache {}: {}", key, e);
        }
        Ok(text)
    }
}
