//! Simulated workload loop.
//!
//! Each iteration sleeps a random latency, overwrites the temperature gauge,
//! and bumps the request counter. The request-time summary wraps the whole
//! iteration, sleep included, so after N iterations counter and summary count
//! both equal N.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::watch;

use promsim_core::error::Result;

use crate::config::WorkloadSection;
use crate::obs::metrics::SimMetrics;

/// What one iteration drew and how long it took.
#[derive(Debug, Clone, Copy)]
pub struct Iteration {
    pub latency: Duration,
    pub temperature: f64,
    /// Duration recorded into the summary (always >= `latency`).
    pub elapsed: Duration,
}

pub struct Workload {
    metrics: Arc<SimMetrics>,
    bounds: WorkloadSection,
}

impl Workload {
    pub fn new(metrics: Arc<SimMetrics>, bounds: WorkloadSection) -> Result<Self> {
        bounds.validate()?;
        Ok(Self { metrics, bounds })
    }

    pub fn draw_latency<R: Rng>(&self, rng: &mut R) -> Duration {
        let secs = rng.gen_range(self.bounds.latency_min_secs..=self.bounds.latency_max_secs);
        Duration::from_secs_f64(secs)
    }

    pub fn draw_temperature<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.bounds.temperature_min_celsius..=self.bounds.temperature_max_celsius)
    }

    /// Run a single timed iteration.
    pub async fn run_once<R: Rng>(&self, rng: &mut R) -> Iteration {
        let timer = self.metrics.request_time.start_timer();

        let latency = self.draw_latency(rng);
        tokio::time::sleep(latency).await;

        let temperature = self.draw_temperature(rng);
        self.metrics.temperature.set(temperature);
        self.metrics.request_count.inc();

        let elapsed = timer.stop();
        Iteration {
            latency,
            temperature,
            elapsed,
        }
    }

    /// Loop until `shutdown` turns true. The in-flight iteration always completes.
    pub async fn run(self, mut rng: StdRng, shutdown: watch::Receiver<bool>) {
        tracing::info!(
            latency_min_secs = self.bounds.latency_min_secs,
            latency_max_secs = self.bounds.latency_max_secs,
            "workload started"
        );

        while !*shutdown.borrow() {
            let it = self.run_once(&mut rng).await;
            tracing::debug!(
                latency_ms = it.latency.as_millis() as u64,
                elapsed_ms = it.elapsed.as_millis() as u64,
                temperature = it.temperature,
                "request processed"
            );
        }

        tracing::info!(
            requests = self.metrics.request_count.get(),
            "workload stopped"
        );
    }
}
