//! Instruments updated by the simulated workload.

use std::sync::Arc;

use promsim_core::error::Result;
use promsim_core::metrics::{Collector, Counter, Gauge, Registry, Summary};

pub const REQUEST_TIME: &str = "request_processing_seconds";
pub const REQUEST_COUNT: &str = "request_count";
pub const TEMPERATURE: &str = "room_temperature_celsius";

pub struct SimMetrics {
    /// Wall-clock duration of each simulated request, in seconds.
    pub request_time: Arc<Summary>,
    /// Completed simulated requests.
    pub request_count: Arc<Counter>,
    /// Last drawn room temperature.
    pub temperature: Arc<Gauge>,
    registry: Registry,
}

impl SimMetrics {
    /// Create the instruments and register them once, alongside the
    /// `process_*` metrics.
    pub fn new() -> Result<Self> {
        let request_time = Arc::new(Summary::new());
        let request_count = Arc::new(Counter::new());
        let temperature = Arc::new(Gauge::new());

        let registry = Registry::new();
        registry.register(
            REQUEST_TIME,
            "Time spent processing request",
            Collector::Summary(Arc::clone(&request_time)),
        )?;
        registry.register(
            REQUEST_COUNT,
            "Number of requests processed",
            Collector::Counter(Arc::clone(&request_count)),
        )?;
        registry.register(
            TEMPERATURE,
            "Room temperature in Celsius",
            Collector::Gauge(Arc::clone(&temperature)),
        )?;
        registry.register_process()?;

        Ok(Self {
            request_time,
            request_count,
            temperature,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        self.registry.render()
    }
}
