use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::i18n::LanguageRegistry;
use crate::realtime::{ChangeFeed, NavigationCache};
use crate::store::StoreClient;

/// Shared state for all request handlers.
pub struct AppState {
    pub config: Config,
    /// Anonymous store client; per-user clients are derived from it.
    pub store: StoreClient,
    pub registry: LanguageRegistry,
    pub feed: ChangeFeed,
    pub navigation: Arc<NavigationCache>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let registry = LanguageRegistry::new(&config.native_language_code)
            .context("Invalid NATIVE_LANGUAGE_CODE")?;
        Ok(Self::with_store(
            StoreClient::from_config(&config),
            registry,
            config,
        ))
    }

    pub fn with_store(store: StoreClient, registry: LanguageRegistry, config: Config) -> Self {
        Self {
            feed: ChangeFeed::new(config.change_feed_capacity),
            store,
            registry,
            navigation: Arc::new(NavigationCache::new()),
            config,
        }
    }
}
