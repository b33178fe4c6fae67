//! promsim core: metric instruments, registry, exposition encoder, and errors.
//!
//! This crate holds the pieces that do not care how metrics are served or what
//! produces the observations. It carries no runtime or HTTP dependencies so the
//! instruments can be shared by any producer and any scrape endpoint.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `PromsimError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{ErrorCode, PromsimError, Result};
