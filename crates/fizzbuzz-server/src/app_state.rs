//! Shared application state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fizzbuzz_core::error::Result;
use fizzbuzz_core::{InMemoryMetrics, MetricsStore};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    metrics: Arc<dyn MetricsStore>,
    draining: AtomicBool,
}

impl AppState {
    /// Build state with a fresh in-memory metrics store.
    /// Returns Result so main can report a bad config instead of panicking.
    pub fn new(cfg: AppConfig) -> Result<Self> {
        Self::with_metrics(cfg, Arc::new(InMemoryMetrics::new()))
    }

    pub fn with_metrics(cfg: AppConfig, metrics: Arc<dyn MetricsStore>) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics,
                draining: AtomicBool::new(false),
            }),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &dyn MetricsStore {
        self.inner.metrics.as_ref()
    }

    /// Mark draining state (shutdown has begun).
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
