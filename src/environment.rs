//! Build environment snapshot and per-build parameter resolution.
//!
//! The enclosing build supplies per-run parameters (most importantly the
//! test plan key) through its environment. This module takes a read-only
//! snapshot of that environment and resolves the well-known parameters into
//! typed values exactly once, at the boundary: blank-or-absent string
//! parameters become `None` here and stay `None` downstream, never a
//! nullable string threaded through later logic.

use std::collections::HashMap;

use crate::submission::{CreationStrategy, TargetIteration, UnrecognizedValue};

/// Build parameter holding the target test plan key.
pub const TEST_PLAN_KEY: &str = "TEST_PLAN_KEY";

/// Build parameter holding free-form import parameters.
pub const IMPORT_PARAMETERS: &str = "IMPORT_PARAMETERS";

/// Build parameter overriding the test case creation strategy.
pub const TEST_CASE_CREATION_STRATEGY: &str = "TEST_CASE_CREATION_STRATEGY";

/// Build parameter overriding the target iteration.
pub const TARGET_ITERATION: &str = "TARGET_ITERATION";

/// Build parameter holding the absolute URL of the running build.
pub const BUILD_URL: &str = "BUILD_URL";

/// Read-only snapshot of the build environment for one run.
///
/// # Example
///
/// ```
/// use handoff::environment::{BuildEnv, TEST_PLAN_KEY};
///
/// let env = BuildEnv::from_vars([(TEST_PLAN_KEY.to_string(), "TP-17".to_string())]);
/// assert_eq!(env.get(TEST_PLAN_KEY), Some("TP-17"));
/// assert_eq!(env.get("UNSET"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildEnv {
    vars: HashMap<String, String>,
}

impl BuildEnv {
    /// Snapshots the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Builds a snapshot from explicit variables.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Looks up a variable verbatim.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Looks up a variable, treating blank values as absent.
    fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// The typed per-build parameters, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameters {
    /// Target test plan key; `None` when the parameter is absent or blank.
    /// Whether that is fatal is the missing-key policy's call, not ours.
    pub test_plan_key: Option<String>,

    /// Free-form import parameters, passed through without validation.
    pub import_parameters: Option<String>,

    /// Creation strategy override, defaulted when unset.
    pub creation_strategy: CreationStrategy,

    /// Target iteration override, defaulted when unset.
    pub target_iteration: TargetIteration,

    /// Absolute URL of the running build; empty when unavailable.
    pub build_url: String,
}

impl ResolvedParameters {
    /// Resolves all well-known parameters from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`UnrecognizedValue`] when an enum parameter holds a non-blank
    /// value outside its known variant names. That aborts the run as a
    /// configuration error rather than silently defaulting.
    pub fn from_env(env: &BuildEnv) -> Result<Self, UnrecognizedValue> {
        Ok(Self {
            test_plan_key: env.get_non_blank(TEST_PLAN_KEY).map(str::to_string),
            import_parameters: env.get_non_blank(IMPORT_PARAMETERS).map(str::to_string),
            creation_strategy: CreationStrategy::from_param(env.get(TEST_CASE_CREATION_STRATEGY))?,
            target_iteration: TargetIteration::from_param(env.get(TARGET_ITERATION))?,
            build_url: env.get_non_blank(BUILD_URL).unwrap_or_default().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> BuildEnv {
        BuildEnv::from_vars(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_all_parameters_absent_resolves_to_defaults() {
        let resolved = ResolvedParameters::from_env(&env(&[])).unwrap();

        assert_eq!(resolved.test_plan_key, None);
        assert_eq!(resolved.import_parameters, None);
        assert_eq!(resolved.creation_strategy, CreationStrategy::CreateAndUpdate);
        assert_eq!(resolved.target_iteration, TargetIteration::CurrentIteration);
        assert_eq!(resolved.build_url, "");
    }

    #[test]
    fn test_blank_parameters_resolve_like_absent_ones() {
        let resolved = ResolvedParameters::from_env(&env(&[
            (TEST_PLAN_KEY, "   "),
            (TEST_CASE_CREATION_STRATEGY, ""),
            (TARGET_ITERATION, "  "),
        ]))
        .unwrap();

        assert_eq!(resolved.test_plan_key, None);
        assert_eq!(resolved.creation_strategy, CreationStrategy::CreateAndUpdate);
        assert_eq!(resolved.target_iteration, TargetIteration::CurrentIteration);
    }

    #[test]
    fn test_populated_parameters_resolve_verbatim() {
        let resolved = ResolvedParameters::from_env(&env(&[
            (TEST_PLAN_KEY, "TP-42"),
            (IMPORT_PARAMETERS, "env=staging"),
            (TEST_CASE_CREATION_STRATEGY, "CREATE_ONLY"),
            (TARGET_ITERATION, "NEW_ITERATION"),
            (BUILD_URL, "https://ci.example.com/job/7"),
        ]))
        .unwrap();

        assert_eq!(resolved.test_plan_key.as_deref(), Some("TP-42"));
        assert_eq!(resolved.import_parameters.as_deref(), Some("env=staging"));
        assert_eq!(resolved.creation_strategy, CreationStrategy::CreateOnly);
        assert_eq!(resolved.target_iteration, TargetIteration::NewIteration);
        assert_eq!(resolved.build_url, "https://ci.example.com/job/7");
    }

    #[test]
    fn test_unknown_enum_value_is_a_configuration_error() {
        let err = ResolvedParameters::from_env(&env(&[(TARGET_ITERATION, "THIRD_ITERATION")]))
            .unwrap_err();

        assert_eq!(err.parameter, TARGET_ITERATION);
        assert_eq!(err.value, "THIRD_ITERATION");
    }
}
