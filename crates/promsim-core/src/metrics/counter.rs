use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use super::text::{write_created, write_header};
use super::unix_now;

/// Monotonic integer counter.
pub struct Counter {
    value: AtomicU64,
    created: f64,
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
            created: unix_now(),
        }
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.inc_by(1);
    }

    /// Increment by an arbitrary value.
    pub fn inc_by(&self, v: u64) {
        self.value.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Unix seconds at construction.
    pub fn created(&self) -> f64 {
        self.created
    }

    /// Render under `<base>_total` plus a `<base>_created` gauge.
    pub(crate) fn render(&self, base: &str, help: &str, out: &mut String) {
        let total = format!("{base}_total");
        write_header(out, &total, help, "counter");
        let _ = writeln!(out, "{} {}", total, self.get());
        write_created(out, base, help, self.created);
    }
}
