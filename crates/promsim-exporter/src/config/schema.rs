use std::net::SocketAddr;

use serde::Deserialize;
use promsim_core::error::{PromsimError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub workload: WorkloadSection,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
            workload: WorkloadSection::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PromsimError::UnsupportedVersion(self.version));
        }
        self.exporter.validate()?;
        self.workload.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            PromsimError::BadConfig(format!("exporter.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

/// Bounds for the two uniform draws made per iteration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadSection {
    #[serde(default = "default_latency_min_secs")]
    pub latency_min_secs: f64,

    #[serde(default = "default_latency_max_secs")]
    pub latency_max_secs: f64,

    #[serde(default = "default_temperature_min_celsius")]
    pub temperature_min_celsius: f64,

    #[serde(default = "default_temperature_max_celsius")]
    pub temperature_max_celsius: f64,
}

impl Default for WorkloadSection {
    fn default() -> Self {
        Self {
            latency_min_secs: default_latency_min_secs(),
            latency_max_secs: default_latency_max_secs(),
            temperature_min_celsius: default_temperature_min_celsius(),
            temperature_max_celsius: default_temperature_max_celsius(),
        }
    }
}

impl WorkloadSection {
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.latency_min_secs,
            self.latency_max_secs,
            self.temperature_min_celsius,
            self.temperature_max_celsius,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(PromsimError::BadConfig(
                "workload bounds must be finite numbers".into(),
            ));
        }
        if !(0.0..=3600.0).contains(&self.latency_min_secs)
            || !(0.0..=3600.0).contains(&self.latency_max_secs)
        {
            return Err(PromsimError::BadConfig(
                "workload.latency_*_secs must be between 0 and 3600".into(),
            ));
        }
        if self.latency_min_secs > self.latency_max_secs {
            return Err(PromsimError::BadConfig(
                "workload.latency_min_secs must not exceed latency_max_secs".into(),
            ));
        }
        if self.temperature_min_celsius > self.temperature_max_celsius {
            return Err(PromsimError::BadConfig(
                "workload.temperature_min_celsius must not exceed temperature_max_celsius".into(),
            ));
        }
        Ok(())
    }
}

fn default_latency_min_secs() -> f64 {
    0.5
}
fn default_latency_max_secs() -> f64 {
    2.0
}
fn default_temperature_min_celsius() -> f64 {
    20.0
}
fn default_temperature_max_celsius() -> f64 {
    30.0
}
