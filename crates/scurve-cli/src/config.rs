//! `scurve.toml` loading
//!
//! The file is optional: an explicit `--config` path must exist, otherwise
//! `scurve.toml` is looked up in the working directory and defaults apply
//! when it is absent.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scurve_core::AnalysisConfig;
use tracing::debug;

/// Default configuration file name
pub const CONFIG_FILE: &str = "scurve.toml";

/// Find `scurve.toml` in `dir`
pub fn discover(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Load the configuration for this invocation
pub fn load(explicit: Option<&Path>) -> Result<AnalysisConfig> {
    match explicit {
        Some(path) => read(path),
        None => match discover(Path::new(".")) {
            Some(path) => read(&path),
            None => Ok(AnalysisConfig::default()),
        },
    }
}

/// Read and parse a configuration file
pub fn read(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: AnalysisConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}
