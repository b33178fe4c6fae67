//! Application metrics.
//!
//! The three instruments live in an explicitly shared [`metrics::SimMetrics`]
//! that is handed to both the workload loop and the `/metrics` handler.

pub mod metrics;
