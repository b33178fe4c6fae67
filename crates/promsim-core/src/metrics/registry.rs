//! Named metric registry.
//!
//! Every name an instrument writes to the exposition output is claimed at
//! registration: a counter `foo` claims `foo`, `foo_total` and `foo_created`;
//! a summary `s` claims `s`, `s_count`, `s_sum` and `s_created`. A second
//! instrument claiming any of those names is rejected. Rendering sorts by
//! registered name to keep scrape output deterministic.

use std::sync::Arc;

use dashmap::{DashMap, DashSet};

use crate::error::{PromsimError, Result};

use super::process::{ProcessCollector, PROCESS_METRIC_NAMES};
use super::text::is_valid_name;
use super::{Counter, Gauge, Summary};

/// Registered name of the process collector.
pub const PROCESS_COLLECTOR: &str = "process";

/// An instrument the registry knows how to render.
#[derive(Clone)]
pub enum Collector {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Summary(Arc<Summary>),
    Process(Arc<ProcessCollector>),
}

impl Collector {
    fn kind(&self) -> &'static str {
        match self {
            Collector::Counter(_) => "counter",
            Collector::Gauge(_) => "gauge",
            Collector::Summary(_) => "summary",
            Collector::Process(_) => "process",
        }
    }

    /// Registered key plus every family/sample name written under it.
    fn exposition_names(&self, key: &str) -> Vec<String> {
        let mut names = vec![key.to_string()];
        match self {
            Collector::Counter(_) => {
                names.extend(["_total", "_created"].iter().map(|s| format!("{key}{s}")));
            }
            Collector::Gauge(_) => {}
            Collector::Summary(_) => {
                names.extend(["_count", "_sum", "_created"].iter().map(|s| format!("{key}{s}")));
            }
            Collector::Process(_) => {
                names.extend(PROCESS_METRIC_NAMES.iter().map(|s| s.to_string()));
            }
        }
        names
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        match self {
            Collector::Counter(c) => c.render(name, help, out),
            Collector::Gauge(g) => g.render(name, help, out),
            Collector::Summary(s) => s.render(name, help, out),
            Collector::Process(p) => p.render(out),
        }
    }
}

struct Registered {
    help: String,
    collector: Collector,
}

#[derive(Default)]
pub struct Registry {
    map: DashMap<String, Registered>,
    claimed: DashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
            claimed: DashSet::new(),
        }
    }

    /// Register an instrument. Fails on an invalid name or when any name the
    /// instrument writes is already in use.
    pub fn register(&self, name: &str, help: &str, collector: Collector) -> Result<()> {
        if !is_valid_name(name) {
            return Err(PromsimError::InvalidMetric(name.to_string()));
        }
        let key = match &collector {
            Collector::Counter(_) => name.strip_suffix("_total").unwrap_or(name),
            _ => name,
        };
        if key.is_empty() {
            return Err(PromsimError::InvalidMetric(name.to_string()));
        }
        self.insert(key, help, collector)
    }

    /// Register the `process_*` metrics under [`PROCESS_COLLECTOR`].
    pub fn register_process(&self) -> Result<()> {
        self.insert(
            PROCESS_COLLECTOR,
            "",
            Collector::Process(Arc::new(ProcessCollector::new())),
        )
    }

    fn insert(&self, key: &str, help: &str, collector: Collector) -> Result<()> {
        let names = collector.exposition_names(key);
        self.claim(&names)?;

        tracing::debug!(metric = %key, kind = collector.kind(), "metric registered");
        self.map.insert(
            key.to_string(),
            Registered {
                help: help.to_string(),
                collector,
            },
        );
        Ok(())
    }

    /// Claim all names or none.
    fn claim(&self, names: &[String]) -> Result<()> {
        for (i, n) in names.iter().enumerate() {
            if !self.claimed.insert(n.clone()) {
                for prev in &names[..i] {
                    self.claimed.remove(prev);
                }
                return Err(PromsimError::DuplicateMetric(n.clone()));
            }
        }
        Ok(())
    }

    /// Whether an instrument is registered under `name`. Takes the registered
    /// base name (`request_count`), not an exposition name (`request_count_total`).
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render every registered metric in text exposition format.
    pub fn render(&self) -> String {
        let mut names: Vec<String> = self.map.iter().map(|r| r.key().clone()).collect();
        names.sort();

        let mut out = String::new();
        for name in &names {
            if let Some(r) = self.map.get(name) {
                r.collector.render(name, &r.help, &mut out);
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_rejected() {
        let reg = Registry::new();
        reg.register("temp", "t", Collector::Gauge(Arc::new(Gauge::new())))
            .unwrap();
        let err = reg
            .register("temp", "again", Collector::Summary(Arc::new(Summary::new())))
            .unwrap_err();
        assert_eq!(err.code().as_str(), "DUPLICATE_METRIC");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn counter_total_suffix_collides_with_base() {
        let reg = Registry::new();
        reg.register("hits_total", "h", Collector::Counter(Arc::new(Counter::new())))
            .unwrap();
        assert!(reg.contains("hits"));
        assert!(!reg.contains("hits_total"));
        assert!(reg
            .register("hits", "h", Collector::Counter(Arc::new(Counter::new())))
            .is_err());
    }

    #[test]
    fn gauge_cannot_shadow_counter_samples() {
        let reg = Registry::new();
        reg.register("x", "x", Collector::Counter(Arc::new(Counter::new())))
            .unwrap();
        for clash in ["x_total", "x_created", "x"] {
            let err = reg
                .register(clash, "g", Collector::Gauge(Arc::new(Gauge::new())))
                .unwrap_err();
            assert_eq!(err.code().as_str(), "DUPLICATE_METRIC", "{clash}");
        }
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.render().matches("# TYPE x_total ").count(), 1);
    }

    #[test]
    fn gauge_cannot_shadow_summary_samples() {
        let reg = Registry::new();
        reg.register("s", "s", Collector::Summary(Arc::new(Summary::new())))
            .unwrap();
        for clash in ["s_count", "s_sum", "s_created"] {
            assert!(reg
                .register(clash, "g", Collector::Gauge(Arc::new(Gauge::new())))
                .is_err());
        }
        assert_eq!(reg.render().matches("\ns_count ").count(), 1);
    }

    #[test]
    fn summary_rejected_when_a_sample_name_is_taken() {
        let reg = Registry::new();
        reg.register("s_sum", "g", Collector::Gauge(Arc::new(Gauge::new())))
            .unwrap();
        let err = reg
            .register("s", "s", Collector::Summary(Arc::new(Summary::new())))
            .unwrap_err();
        assert_eq!(err.code().as_str(), "DUPLICATE_METRIC");
        assert!(!reg.contains("s"));

        // names claimed before the clash were released
        reg.register("s_count", "g", Collector::Gauge(Arc::new(Gauge::new())))
            .unwrap();
        reg.register("s", "g", Collector::Gauge(Arc::new(Gauge::new())))
            .unwrap();
    }

    #[test]
    fn process_collector_registers_once() {
        let reg = Registry::new();
        reg.register_process().unwrap();
        assert!(reg.contains(PROCESS_COLLECTOR));
        assert!(reg.register_process().is_err());
        assert!(reg
            .register("process_open_fds", "g", Collector::Gauge(Arc::new(Gauge::new())))
            .is_err());
        assert!(reg
            .register("process_cpu_seconds", "c", Collector::Counter(Arc::new(Counter::new())))
            .is_err());
        assert!(reg.render().contains("process_start_time_seconds "));
    }

    #[test]
    fn invalid_names_rejected() {
        let reg = Registry::new();
        for bad in ["", "9lives", "with space", "_total"] {
            let err = reg
                .register(bad, "x", Collector::Counter(Arc::new(Counter::new())))
                .unwrap_err();
            assert_eq!(err.code().as_str(), "INVALID_METRIC", "{bad}");
        }
        assert!(reg.is_empty());
    }

    #[test]
    fn render_is_sorted_and_shared() {
        let reg = Registry::new();
        let g = Arc::new(Gauge::new());
        reg.register("zeta", "z", Collector::Gauge(g.clone())).unwrap();
        reg.register("alpha", "a", Collector::Gauge(Arc::new(Gauge::new())))
            .unwrap();
        g.set(3.5);

        let out = reg.render();
        let a = out.find("# HELP alpha").unwrap();
        let z = out.find("# HELP zeta").unwrap();
        assert!(a < z);
        assert!(out.contains("zeta 3.5\n"));
    }
}
