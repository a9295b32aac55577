//! The submission descriptor and its configuration value enums.
//!
//! A [`Submission`] is assembled by the orchestrator once every required
//! check has passed, and is consumed by value by
//! [`ResultSender::send`](crate::sender::ResultSender::send). Taking it by
//! value is deliberate: a descriptor is sent exactly once, and the type
//! system enforces that.
//!
//! Enums that appear in the TOML configuration file ([`ResultsType`],
//! [`MissingKeyStrategy`]) carry lowercase serde spellings; enums that
//! arrive per build through the environment ([`CreationStrategy`],
//! [`TargetIteration`]) use uppercase parameter spellings. Build-parameter
//! parsing is a total function: blank or absent values resolve to the
//! documented default variant, and unknown non-blank values produce an
//! [`UnrecognizedValue`] error instead of a guess.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A fully-validated, immutable description of one test result upload.
///
/// Constructed by the orchestrator only after all required-field checks have
/// passed, so every non-`Option` field is guaranteed non-blank. Never mutated
/// after construction; ownership moves into the sender on dispatch.
#[derive(Debug)]
pub struct Submission {
    /// Base URL of the tracker, e.g. `https://tracker.example.com`.
    pub tracker_url: String,

    /// Key of the test plan the results are imported into.
    pub test_plan_key: String,

    /// Absolute URL of the triggering build.
    ///
    /// Best-effort: empty when the build environment could not provide one.
    /// An empty value is sent as-is and never treated as an error.
    pub build_url: String,

    /// How test case issues are created or updated during the import.
    pub creation_strategy: CreationStrategy,

    /// Which test plan iteration receives the results.
    pub target_iteration: TargetIteration,

    /// Tracker account used for the upload.
    pub username: String,

    /// Password for `username`.
    pub password: String,

    /// Staged result files, in collection order. Never empty.
    pub result_files: Vec<PathBuf>,

    /// Report format of `result_files`, selecting the remote-side parser.
    pub results_type: ResultsType,

    /// Free-form import parameters passed through to the tracker unchanged.
    pub import_parameters: Option<String>,

    /// Wait for an already-running import on the same test plan to finish
    /// before uploading, instead of failing immediately.
    pub retry_on_active_import: bool,
}

/// Error produced when a build parameter holds a value outside the known
/// variant names of its enum.
///
/// Surfaced as a configuration error that aborts the run; silently falling
/// back to a default would hide the misconfiguration until results land in
/// the wrong place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized {parameter} value: {value}")]
pub struct UnrecognizedValue {
    /// Name of the build parameter that held the value.
    pub parameter: &'static str,
    /// The offending value, verbatim.
    pub value: String,
}

/// How the import creates or updates test case issues in the tracker.
///
/// Supplied per build via the `TEST_CASE_CREATION_STRATEGY` parameter:
///
/// | Build parameter value | Variant |
/// |-----------------------|---------|
/// | `CREATE_AND_UPDATE`   | [`CreationStrategy::CreateAndUpdate`] (default) |
/// | `CREATE_ONLY`         | [`CreationStrategy::CreateOnly`] |
/// | `UPDATE_ONLY`         | [`CreationStrategy::UpdateOnly`] |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreationStrategy {
    /// Create missing test cases and update existing ones.
    #[default]
    CreateAndUpdate,
    /// Only create missing test cases; never touch existing ones.
    CreateOnly,
    /// Only update existing test cases; never create new ones.
    UpdateOnly,
}

impl CreationStrategy {
    /// Parses a build-parameter value, mapping blank/absent to the default.
    pub fn from_param(value: Option<&str>) -> Result<Self, UnrecognizedValue> {
        match non_blank(value) {
            None => Ok(Self::default()),
            Some("CREATE_AND_UPDATE") => Ok(Self::CreateAndUpdate),
            Some("CREATE_ONLY") => Ok(Self::CreateOnly),
            Some("UPDATE_ONLY") => Ok(Self::UpdateOnly),
            Some(other) => Err(UnrecognizedValue {
                parameter: crate::environment::TEST_CASE_CREATION_STRATEGY,
                value: other.to_string(),
            }),
        }
    }

    /// The wire spelling sent to the tracker.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::CreateAndUpdate => "CREATE_AND_UPDATE",
            Self::CreateOnly => "CREATE_ONLY",
            Self::UpdateOnly => "UPDATE_ONLY",
        }
    }
}

/// Which test plan iteration receives the imported results.
///
/// Supplied per build via the `TARGET_ITERATION` parameter as
/// `CURRENT_ITERATION` or `NEW_ITERATION`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetIteration {
    /// Import into the iteration currently open on the test plan.
    #[default]
    CurrentIteration,
    /// Open a fresh iteration and import into it.
    NewIteration,
}

impl TargetIteration {
    /// Parses a build-parameter value, mapping blank/absent to the default.
    pub fn from_param(value: Option<&str>) -> Result<Self, UnrecognizedValue> {
        match non_blank(value) {
            None => Ok(Self::default()),
            Some("CURRENT_ITERATION") => Ok(Self::CurrentIteration),
            Some("NEW_ITERATION") => Ok(Self::NewIteration),
            Some(other) => Err(UnrecognizedValue {
                parameter: crate::environment::TARGET_ITERATION,
                value: other.to_string(),
            }),
        }
    }

    /// The wire spelling sent to the tracker.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::CurrentIteration => "CURRENT_ITERATION",
            Self::NewIteration => "NEW_ITERATION",
        }
    }
}

/// Report file format of the collected results.
///
/// Selects the parser on the tracker side; the files themselves are never
/// inspected locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultsType {
    /// JUnit XML reports (also produced by Surefire/Failsafe).
    #[default]
    Junit,
    /// TestNG XML reports.
    Testng,
    /// Cucumber JSON reports.
    Cucumber,
    /// NUnit XML reports.
    Nunit,
}

impl ResultsType {
    /// The wire spelling sent to the tracker.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Junit => "JUNIT",
            Self::Testng => "TESTNG",
            Self::Cucumber => "CUCUMBER",
            Self::Nunit => "NUNIT",
        }
    }
}

/// What to do when the test plan key build parameter is absent.
///
/// The key normally arrives per build (e.g. injected by the pipeline that
/// created the test plan), so its absence can mean either "misconfigured
/// build" or "this build intentionally has no test plan". Which one is a
/// per-project decision, made here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyStrategy {
    /// Treat a missing key as a configuration error and fail the build.
    #[default]
    FailTask,
    /// Skip the submission silently, leaving the build result untouched.
    SkipTask,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
