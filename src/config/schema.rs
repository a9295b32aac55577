//! Configuration schema definitions for handoff.
//!
//! This module defines the configuration types deserialized from TOML. The
//! schema is deliberately tolerant: required *fields* may be absent or blank
//! at load time and default to empty strings, because the accumulating
//! validator reports every blank field at once during the run. Only shape
//! errors (unknown enum spellings, type mismatches) fail the load.
//!
//! # Schema Overview
//!
//! ```text
//! Config (root)
//! ├── TrackerConfig    - [tracker] coordinates and credentials
//! └── SendConfig       - [send] what to collect and how to submit it
//! ```

use serde::{Deserialize, Serialize};

use crate::submission::{MissingKeyStrategy, ResultsType};

/// Root configuration structure for handoff.
///
/// # TOML Structure
///
/// ```toml
/// [tracker]
/// url = "https://tracker.example.com"
/// username = "ci-bot"
/// password = "secret"
///
/// [send]
/// results_pattern = "**/target/surefire-reports/*.xml"
/// results_type = "junit"
/// missing_key_strategy = "fail_task"
/// ```
///
/// # Example
///
/// ```
/// use handoff::config::Config;
///
/// let config: Config = toml::from_str(r#"
///     [tracker]
///     url = "https://tracker.example.com"
///     username = "ci-bot"
///     password = "secret"
/// "#).unwrap();
///
/// assert_eq!(config.send.results_pattern, "**/target/surefire-reports/*.xml");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Tracker coordinates and credentials.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Collection and submission settings (optional, has defaults).
    #[serde(default)]
    pub send: SendConfig,
}

/// Tracker coordinates and the account used for uploads.
///
/// All fields default to empty strings so a blank or partially-filled
/// `[tracker]` section loads fine and fails validation with one diagnostic
/// per blank field.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL of the tracker, e.g. `https://tracker.example.com`.
    pub url: String,

    /// Account used for the upload.
    pub username: String,

    /// Password for `username`.
    pub password: String,
}

/// Settings for result collection and submission.
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `results_pattern` | `**/target/surefire-reports/*.xml` |
/// | `results_type` | `junit` |
/// | `missing_key_strategy` | `fail_task` |
/// | `retry_on_active_import` | false |
/// | `verbose` | false |
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendConfig {
    /// Glob pattern selecting result files, relative to the workspace root.
    ///
    /// Default: `**/target/surefire-reports/*.xml` (Surefire's output
    /// location in every module of a Maven build).
    #[serde(default = "default_results_pattern")]
    pub results_pattern: String,

    /// Report format of the matched files.
    ///
    /// Default: `junit`
    #[serde(default)]
    pub results_type: ResultsType,

    /// What to do when the test plan key build parameter is absent.
    ///
    /// Default: `fail_task`
    #[serde(default)]
    pub missing_key_strategy: MissingKeyStrategy,

    /// Wait for an import already running on the target test plan instead
    /// of failing immediately.
    ///
    /// Default: false
    #[serde(default)]
    pub retry_on_active_import: bool,

    /// Emit timestamped progress lines to the build log around the upload.
    ///
    /// Purely observational; never affects the run's outcome.
    ///
    /// Default: false
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            results_pattern: default_results_pattern(),
            results_type: ResultsType::default(),
            missing_key_strategy: MissingKeyStrategy::default(),
            retry_on_active_import: false,
            verbose: false,
        }
    }
}

fn default_results_pattern() -> String {
    "**/target/surefire-reports/*.xml".to_string()
}
