use crate::cache::Cache;
use crate::config::AppConfig;
use crate::metrics::Metrics;
use anyhow::Result;
use hcp_api::ApiRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Shared application state, injected into the middleware and every handler
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub cache: Arc<Cache>,
    pub api_registry: Arc<ApiRegistry>,
    pub metrics: Arc<Metrics>,
    ready: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let api_registry = ApiRegistry::new();
        info!(versions = ?api_registry.names(), "API versions registered");

        Ok(Self {
            config,
            cache: Arc::new(Cache::new()),
            api_registry: Arc::new(api_registry),
            metrics: Arc::new(Metrics::new()?),
            ready: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}
