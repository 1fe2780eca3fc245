pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::scoring::validate_scoring;
use crate::simulator::validate_simulator;

/// Get the config directory path (~/.config/mobimap/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("mobimap")
}

/// Get the default config file path (~/.config/mobimap/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/mobimap/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default location yields the built-in defaults.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate every section, returning all problems at once.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(mut scoring) = validate_scoring(&config.scoring()) {
        errors.append(&mut scoring);
    }

    let deadlines = config.deadlines();
    for (name, value) in [
        ("overdue_days", deadlines.overdue_days()),
        ("horizon_days", deadlines.horizon_days()),
    ] {
        if value < 0 {
            errors.push(format!("deadlines.{}: must be non-negative, got {}", name, value));
        }
    }

    if let Err(mut simulator) = validate_simulator(&config.simulator()) {
        errors.append(&mut simulator);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
