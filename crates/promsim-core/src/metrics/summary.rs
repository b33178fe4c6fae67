//! Count/sum summary with a scoped timer.
//!
//! No quantiles are tracked; scrapers derive averages from `_sum / _count`.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::text::{format_float, write_created, write_header};
use super::unix_now;

pub struct Summary {
    count: AtomicU64,
    sum_bits: AtomicU64,
    created: f64,
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

impl Summary {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0f64.to_bits()),
            created: unix_now(),
        }
    }

    /// Record one observation.
    pub fn observe(&self, v: f64) {
        let _ = self
            .sum_bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |b| {
                Some((f64::from_bits(b) + v).to_bits())
            });
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Record a duration in seconds.
    pub fn observe_duration(&self, d: Duration) {
        self.observe(d.as_secs_f64());
    }

    /// Start timing; the elapsed time is recorded when the timer is stopped or dropped.
    pub fn start_timer(&self) -> SummaryTimer<'_> {
        SummaryTimer {
            summary: self,
            start: Instant::now(),
            armed: true,
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    pub fn sum(&self) -> f64 {
        f64::from_bits(self.sum_bits.load(Ordering::Acquire))
    }

    pub fn created(&self) -> f64 {
        self.created
    }

    pub(crate) fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "summary");
        let _ = writeln!(out, "{}_count {}", name, self.count());
        let _ = writeln!(out, "{}_sum {}", name, format_float(self.sum()));
        write_created(out, name, help, self.created);
    }
}

/// Records wall-clock time into a [`Summary`] exactly once.
#[must_use = "dropping the timer immediately records a near-zero duration"]
pub struct SummaryTimer<'a> {
    summary: &'a Summary,
    start: Instant,
    armed: bool,
}

impl SummaryTimer<'_> {
    /// Record now and return the observed duration.
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        if self.armed {
            self.armed = false;
            self.summary.observe_duration(elapsed);
        }
        elapsed
    }
}

impl Drop for SummaryTimer<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.record();
        }
    }
}
