//! The submission run: one pass from workspace to terminal status.
//!
//! # Execution Flow
//!
//! 1. **Collect**: stage result files matching the configured pattern into a
//!    scratch directory
//! 2. **Resolve**: read the per-build parameters from the environment
//!    snapshot
//! 3. **Evaluate**: run every validation check and the missing-key policy
//! 4. **Send**: if and only if every check passed, build the submission
//!    descriptor and hand it to the sender
//! 5. **Interpret**: map the sender's outcome to a terminal status
//!
//! The scratch directory is released after step 5 on every path — success,
//! skip, validation failure, or remote error — and a failed release never
//! overrides the status the run already determined.
//!
//! The sender is never invoked when any check failed: a descriptor that
//! cannot be valid is not worth a network round-trip, and the descriptor
//! type itself is only constructed once all required fields are known
//! present.
//!
//! # Example
//!
//! ```no_run
//! use handoff::config::load_config;
//! use handoff::environment::BuildEnv;
//! use handoff::listener::ConsoleListener;
//! use handoff::orchestrator::Orchestrator;
//! use handoff::sender::http::HttpSender;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config(std::path::Path::new("handoff.toml"))?;
//!
//!     let orchestrator = Orchestrator::new(config, HttpSender::new(), ConsoleListener);
//!     let status = orchestrator
//!         .run(std::path::Path::new("."), &BuildEnv::from_process())
//!         .await;
//!
//!     std::process::exit(status.exit_code());
//! }
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::collector;
use crate::config::Config;
use crate::environment::{BuildEnv, ResolvedParameters};
use crate::listener::BuildListener;
use crate::sender::ResultSender;
use crate::submission::Submission;
use crate::validation::Evaluation;

/// Terminal status of one submission run.
///
/// | Status | Meaning | Exit code |
/// |--------|---------|-----------|
/// | `Success` | Results uploaded and imported | 0 |
/// | `Skipped` | Nothing to do; build unaffected | 0 |
/// | `Failed`  | Misconfiguration or remote failure | 1 |
///
/// `Skipped` covers the two documented skip conditions: the pattern matched
/// no files, or the test plan key was absent under the skip strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStatus {
    /// The upload completed cleanly.
    Success,
    /// The submission was not attempted and the build is unaffected.
    Skipped,
    /// The run failed; diagnostics were written to the build log.
    Failed,
}

impl TerminalStatus {
    /// Whether the enclosing build should be marked failed.
    pub fn is_failed(self) -> bool {
        self == Self::Failed
    }

    /// Conventional process exit code for this status.
    pub fn exit_code(self) -> i32 {
        if self.is_failed() { 1 } else { 0 }
    }
}

/// Coordinates one test result submission.
///
/// Ties together the collector, the environment resolver, the validator,
/// and a [`ResultSender`], reporting through a [`BuildListener`]. Holds no
/// mutable state: concurrent runs for different builds may share the same
/// sender, and invoking `run` twice with identical inputs makes identical
/// decisions.
///
/// # Type Parameters
///
/// - `S`: The sender performing the upload
/// - `L`: The build log sink
pub struct Orchestrator<S, L> {
    config: Config,
    sender: S,
    listener: L,
}

impl<S, L> Orchestrator<S, L>
where
    S: ResultSender,
    L: BuildListener,
{
    /// Creates an orchestrator from its collaborators.
    ///
    /// # Arguments
    ///
    /// * `config` - Static configuration loaded from TOML
    /// * `sender` - Upload collaborator, injected explicitly so tests can
    ///   substitute a recording double
    /// * `listener` - Build log sink for diagnostics
    pub fn new(config: Config, sender: S, listener: L) -> Self {
        Self {
            config,
            sender,
            listener,
        }
    }

    /// Runs one submission against `workspace` with the given environment
    /// snapshot and returns the terminal status.
    ///
    /// Never panics across the sender seam and never leaves the scratch
    /// directory behind; all failure modes arrive as diagnostics on the
    /// listener plus a `Failed` status.
    pub async fn run(&self, workspace: &Path, env: &BuildEnv) -> TerminalStatus {
        let (scratch, files) =
            match collector::collect(workspace, &self.config.send.results_pattern) {
                Ok(staged) => staged,
                Err(e) => {
                    self.listener.error(&e.to_string());
                    return TerminalStatus::Failed;
                }
            };

        let status = self.submit(env, &files).await;

        // Best-effort release; the determined status stands regardless.
        if let Err(e) = scratch.close() {
            warn!("Failed to remove scratch directory: {e}");
        }

        status
    }

    async fn submit(&self, env: &BuildEnv, files: &[PathBuf]) -> TerminalStatus {
        let params = match ResolvedParameters::from_env(env) {
            Ok(params) => params,
            Err(e) => {
                self.listener.error(&e.to_string());
                return TerminalStatus::Failed;
            }
        };

        let evaluation = Evaluation::evaluate(&self.config, &params, files.len());
        for note in &evaluation.notes {
            self.listener.line(note);
        }
        for error in &evaluation.errors {
            self.listener.error(error);
        }
        if !evaluation.proceed {
            return if evaluation.failed() {
                TerminalStatus::Failed
            } else {
                TerminalStatus::Skipped
            };
        }

        // proceed implies the key check passed
        let Some(test_plan_key) = params.test_plan_key.clone() else {
            return TerminalStatus::Skipped;
        };

        let submission = Submission {
            tracker_url: self.config.tracker.url.clone(),
            test_plan_key: test_plan_key.clone(),
            build_url: params.build_url.clone(),
            creation_strategy: params.creation_strategy,
            target_iteration: params.target_iteration,
            username: self.config.tracker.username.clone(),
            password: self.config.tracker.password.clone(),
            result_files: files.to_vec(),
            results_type: self.config.send.results_type,
            import_parameters: params.import_parameters.clone(),
            retry_on_active_import: self.config.send.retry_on_active_import,
        };

        if self.config.send.verbose {
            self.listener.line(&format!(
                "[{}] Sending test results to {} for {}",
                timestamp(),
                self.config.tracker.url,
                test_plan_key
            ));
        }
        info!(
            "Submitting {} result files to {} for {}",
            files.len(),
            self.config.tracker.url,
            test_plan_key
        );

        match self.sender.send(submission).await {
            Ok(()) => {
                if self.config.send.verbose {
                    self.listener.line(&format!("[{}] Import finished", timestamp()));
                }
                debug!("Import finished for {test_plan_key}");
                TerminalStatus::Success
            }
            Err(e) => {
                if let Some(body) = &e.response_body {
                    self.listener.error(body);
                }
                match &e.source {
                    Some(cause) => self.listener.error_with_cause(&e.message, cause),
                    None => self.listener.error(&e.message),
                }
                TerminalStatus::Failed
            }
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
