//! Shared application state for the exporter.
//!
//! Holds the validated config, the metric instruments, and the draining flag
//! flipped on shutdown. Cloned into every axum handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use promsim_core::error::Result;

use crate::config::SimConfig;
use crate::obs::metrics::SimMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<SimMetrics>,
}

struct AppStateInner {
    cfg: SimConfig,
    draining: AtomicBool,
}

impl AppState {
    /// Validate config and register the instruments.
    pub fn new(cfg: SimConfig) -> Result<Self> {
        cfg.validate()?;
        let metrics = Arc::new(SimMetrics::new()?);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                draining: AtomicBool::new(false),
            }),
            metrics,
        })
    }

    pub fn cfg(&self) -> &SimConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<SimMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
