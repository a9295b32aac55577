//! Configuration loading and schema definitions for handoff.
//!
//! This module provides types and functions for loading handoff
//! configuration from TOML files or strings. The schema covers the static
//! half of a run's inputs — tracker coordinates and send options; the
//! per-build half (test plan key, overrides) arrives through
//! [`crate::environment`] instead.

pub mod schema;

pub use schema::*;

use std::path::Path;

use anyhow::{Context, Result};

/// Loads handoff configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (e.g., doesn't exist or permission denied)
/// - The file contains invalid TOML syntax
/// - The configuration doesn't match the expected schema
///
/// Blank required fields are *not* an error here: validation of field
/// contents is the orchestrator's job, so that every blank field can be
/// reported in one pass instead of the first one aborting the load.
///
/// # Example
///
/// ```no_run
/// use handoff::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Path::new("handoff.toml"))?;
/// println!("Tracker: {}", config.tracker.url);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// Loads handoff configuration from a TOML string.
///
/// Useful for testing, embedding configuration, or generating configuration
/// programmatically.
///
/// # Example
///
/// ```
/// use handoff::config::load_config_str;
///
/// let config = load_config_str(r#"
///     [tracker]
///     url = "https://tracker.example.com"
///     username = "ci-bot"
///     password = "secret"
///
///     [send]
///     results_type = "junit"
///     missing_key_strategy = "skip_task"
/// "#)?;
///
/// assert_eq!(config.tracker.username, "ci-bot");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;

    Ok(config)
}
