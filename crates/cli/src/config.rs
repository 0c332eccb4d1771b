//! Pool config loading.

use std::path::Path;

use anyhow::{Context, Result};
use oni_rs_core::PoolConfig;
use tracing::debug;

/// Reads a JSON config, falling back to the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<PoolConfig> {
    let Some(path) = path else {
        return Ok(PoolConfig::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: PoolConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
