//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use promsim_core::error::{PromsimError, Result};

pub use schema::{ExporterSection, SimConfig, WorkloadSection};

pub fn load_from_file(path: &str) -> Result<SimConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PromsimError::Io(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<SimConfig> {
    let cfg: SimConfig = serde_yaml::from_str(s)
        .map_err(|e| PromsimError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, otherwise fall back to the built-in defaults.
pub fn load_or_default(path: &str) -> Result<SimConfig> {
    if Path::new(path).exists() {
        tracing::info!(%path, "loading config file");
        load_from_file(path)
    } else {
        tracing::debug!(%path, "no config file, using defaults");
        Ok(SimConfig::default())
    }
}
