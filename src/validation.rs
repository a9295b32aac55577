//! Pre-submission validation and the missing-key policy.
//!
//! All checks run on every evaluation, never short-circuiting: a build with a
//! blank URL *and* a blank password reports both in one pass instead of
//! making the operator fix one field per build. The result is a pure value,
//! so evaluating the same inputs twice yields the same outcome and the same
//! diagnostic set.
//!
//! Three severities fall out of the checks:
//!
//! - required-field violations (URL, username, password) fail the run;
//! - an empty result file list only skips it, the build is unaffected;
//! - a missing test plan key fails or silently skips depending on the
//!   configured [`MissingKeyStrategy`].

use crate::config::Config;
use crate::environment::ResolvedParameters;
use crate::submission::MissingKeyStrategy;

/// Diagnostic for a blank tracker URL.
pub const BLANK_TRACKER_URL: &str = "Tracker URL is blank";

/// Diagnostic for a blank tracker username.
pub const BLANK_USERNAME: &str = "Tracker username is blank";

/// Diagnostic for a blank tracker password.
pub const BLANK_PASSWORD: &str = "Tracker password is blank";

/// Diagnostic for a missing test plan key under [`MissingKeyStrategy::FailTask`].
pub const MISSING_TEST_PLAN_KEY: &str = "Test plan key build parameter is missing";

/// Informational line for a result pattern that matched nothing.
pub fn empty_results_note(pattern: &str) -> String {
    format!("Test result files not found in {pattern}, skipping sending test results")
}

/// Outcome of one validation pass.
///
/// `errors` fail the run, `notes` are informational, and `proceed` is the
/// conjunction of every check: the submission is attempted only when it is
/// `true`, which guarantees the remote call never runs against a descriptor
/// that cannot be valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Fatal diagnostics, in check order.
    pub errors: Vec<String>,
    /// Non-fatal informational lines.
    pub notes: Vec<String>,
    /// Whether the submission should be attempted.
    pub proceed: bool,
}

impl Evaluation {
    /// Runs every check against one run's inputs.
    pub fn evaluate(config: &Config, params: &ResolvedParameters, file_count: usize) -> Self {
        let mut evaluation = Self {
            errors: Vec::new(),
            notes: Vec::new(),
            proceed: true,
        };

        evaluation.require(BLANK_TRACKER_URL, !config.tracker.url.trim().is_empty());
        evaluation.require(BLANK_USERNAME, !config.tracker.username.trim().is_empty());
        evaluation.require(BLANK_PASSWORD, !config.tracker.password.trim().is_empty());

        if file_count == 0 {
            evaluation.notes.push(empty_results_note(&config.send.results_pattern));
            evaluation.proceed = false;
        }

        if params.test_plan_key.is_none() {
            if config.send.missing_key_strategy == MissingKeyStrategy::FailTask {
                evaluation.errors.push(MISSING_TEST_PLAN_KEY.to_string());
            }
            evaluation.proceed = false;
        }

        evaluation
    }

    /// Whether any fatal check failed.
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    fn require(&mut self, diagnostic: &str, is_valid: bool) {
        if !is_valid {
            self.errors.push(diagnostic.to_string());
            self.proceed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_str;
    use crate::environment::{BuildEnv, ResolvedParameters, TEST_PLAN_KEY};

    fn params(key: Option<&str>) -> ResolvedParameters {
        let env = match key {
            Some(key) => BuildEnv::from_vars([(TEST_PLAN_KEY.to_string(), key.to_string())]),
            None => BuildEnv::default(),
        };
        ResolvedParameters::from_env(&env).unwrap()
    }

    fn config(url: &str, username: &str, password: &str, strategy: &str) -> Config {
        load_config_str(&format!(
            r#"
            [tracker]
            url = "{url}"
            username = "{username}"
            password = "{password}"

            [send]
            missing_key_strategy = "{strategy}"
            "#
        ))
        .unwrap()
    }

    #[test]
    fn test_valid_inputs_proceed_without_diagnostics() {
        let evaluation = Evaluation::evaluate(
            &config("http://h", "u", "p", "fail_task"),
            &params(Some("TP-1")),
            1,
        );

        assert!(evaluation.proceed);
        assert!(!evaluation.failed());
        assert!(evaluation.errors.is_empty());
        assert!(evaluation.notes.is_empty());
    }

    #[test]
    fn test_every_blank_field_is_reported_in_one_pass() {
        let evaluation =
            Evaluation::evaluate(&config("", "", "", "fail_task"), &params(Some("TP-1")), 1);

        assert!(!evaluation.proceed);
        assert!(evaluation.failed());
        assert_eq!(
            evaluation.errors,
            vec![BLANK_TRACKER_URL, BLANK_USERNAME, BLANK_PASSWORD]
        );
    }

    #[test]
    fn test_whitespace_only_fields_count_as_blank() {
        let evaluation =
            Evaluation::evaluate(&config("  ", "u", "p", "fail_task"), &params(Some("TP-1")), 1);

        assert_eq!(evaluation.errors, vec![BLANK_TRACKER_URL]);
    }

    #[test]
    fn test_no_result_files_skips_without_failing() {
        let evaluation = Evaluation::evaluate(
            &config("http://h", "u", "p", "fail_task"),
            &params(Some("TP-1")),
            0,
        );

        assert!(!evaluation.proceed);
        assert!(!evaluation.failed());
        assert_eq!(
            evaluation.notes,
            vec![empty_results_note("**/target/surefire-reports/*.xml")]
        );
    }

    #[test]
    fn test_missing_key_fails_under_fail_task() {
        let evaluation =
            Evaluation::evaluate(&config("http://h", "u", "p", "fail_task"), &params(None), 1);

        assert!(!evaluation.proceed);
        assert!(evaluation.failed());
        assert_eq!(evaluation.errors, vec![MISSING_TEST_PLAN_KEY]);
    }

    #[test]
    fn test_missing_key_skips_silently_under_skip_task() {
        let evaluation =
            Evaluation::evaluate(&config("http://h", "u", "p", "skip_task"), &params(None), 1);

        assert!(!evaluation.proceed);
        assert!(!evaluation.failed());
        assert!(evaluation.errors.is_empty());
        assert!(evaluation.notes.is_empty());
    }

    #[test]
    fn test_key_presence_makes_strategy_irrelevant() {
        let evaluation = Evaluation::evaluate(
            &config("http://h", "u", "p", "skip_task"),
            &params(Some("TP-1")),
            1,
        );

        assert!(evaluation.proceed);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let config = config("", "u", "", "fail_task");
        let params = params(None);

        let first = Evaluation::evaluate(&config, &params, 0);
        let second = Evaluation::evaluate(&config, &params, 0);

        assert_eq!(first, second);
    }
}
