//! Process-wide context for the snippet endpoints.

use crate::cache::{CachingResolver, FileStore, KeyValueStore, MemoryStore};
use crate::config::SnippetConfig;
use crate::error::Result;
use crate::host::{ContentResolver, LoadingIndicator};
use crate::loading::LoadingTracker;
use crate::router::DisplayRouter;
use crate::state::AnswerState;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Owns answer state, configuration, the cache handle and the router.
///
/// Built once when the host starts and torn down with [`Session::shutdown`].
/// Endpoint invocations hold the answer-state lock for their whole duration,
/// so overlapping commands run one after another instead of racing on the
/// current answer index.
pub struct Session {
    pub(crate) state: Mutex<AnswerState>,
    pub(crate) config: RwLock<SnippetConfig>,
    pub(crate) router: DisplayRouter,
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    /// Creates a session around an already opened store.
    ///
    /// When caching is enabled the resolver is wrapped in a
    /// [`CachingResolver`] over `store`.
    pub fn new(
        config: SnippetConfig,
        resolver: Arc<dyn ContentResolver>,
        store: Arc<dyn KeyValueStore>,
        indicator: Arc<dyn LoadingIndicator>,
    ) -> Self {
        let resolver: Arc<dyn ContentResolver> = if config.cache.enabled {
            Arc::new(CachingResolver::new(resolver, Arc::clone(&store)))
        } else {
            resolver
        };

        Self {
            state: Mutex::new(AnswerState::new()),
            config: RwLock::new(config),
            router: DisplayRouter::new(resolver, LoadingTracker::new(indicator)),
            store,
        }
    }

    /// Creates a session, opening the store named by `config.cache.path`.
    ///
    /// Falls back to a [`MemoryStore`] when no path is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file exists but cannot be loaded.
    pub async fn open(
        config: SnippetConfig,
        resolver: Arc<dyn ContentResolver>,
        indicator: Arc<dyn LoadingIndicator>,
    ) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.cache.path {
            Some(path) if config.cache.enabled => Arc::new(FileStore::open(path.clone()).await?),
            _ => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(config, resolver, store, indicator))
    }

    /// Snapshot of the current answer state.
    pub async fn answer_state(&self) -> AnswerState {
        self.state.lock().await.clone()
    }

    pub async fn config(&self) -> SnippetConfig {
        self.config.read().await.clone()
    }

    /// Replaces the configuration. Cache settings only apply at startup.
    pub async fn update_config(&self, config: SnippetConfig) {
        tracing::debug!("updating configuration: {:?}", config);
        *self.config.write().await = config;
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Flushes the cache handle.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("flushing {} cached answers", self.store.len());
        self.store.flush().await
    }
}
