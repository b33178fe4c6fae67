//! Metric instruments and the registry that names them.
//!
//! Instruments are plain atomics and are safe to share across threads behind an
//! `Arc`. A [`Registry`] attaches a name and help text to each instrument and
//! renders the whole set in the Prometheus text exposition format (0.0.4).

pub mod counter;
pub mod gauge;
pub mod process;
pub mod registry;
pub mod summary;
pub mod text;

use std::time::{SystemTime, UNIX_EPOCH};

pub use counter::Counter;
pub use gauge::Gauge;
pub use process::ProcessCollector;
pub use registry::{Collector, Registry, PROCESS_COLLECTOR};
pub use summary::{Summary, SummaryTimer};
pub use text::CONTENT_TYPE;

/// Current wall-clock time as unix seconds (0.0 if the clock is before 1970).
pub(crate) fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
