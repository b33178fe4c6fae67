//! promsim exporter library entry.
//!
//! Wires config, the shared metric instruments, the simulated workload loop,
//! and the HTTP scrape endpoints. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod workload;
