//! handoff: submit automated test results to a tracker's test plan.
//!
//! This crate runs once per build execution. It stages the build's test
//! report files (JUnit, TestNG, Cucumber, NUnit), validates the static and
//! per-build configuration, and uploads the results to the test management
//! module of a remote tracker, associated with a test plan record.
//!
//! # Architecture
//!
//! The main components are:
//!
//! - **Collector**: stage result files matching a glob into a scratch dir
//! - **Environment**: resolve per-build parameters (test plan key, overrides)
//! - **Validation**: accumulate every misconfiguration in one pass, apply
//!   the missing-key policy
//! - **Orchestrator**: compose the above and interpret the sender's outcome
//! - **Sender**: the upload collaborator (HTTP in production, a double in
//!   tests)
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
//!     let orchestrator = Orchestrator::new(config, HttpSender::new(), ConsoleListener);
//!     let status = orchestrator
//!         .run(std::path::Path::new("."), &BuildEnv::from_process())
//!         .await;
//!     std::process::exit(status.exit_code());
//! }
//! ```

pub mod collector;
pub mod config;
pub mod environment;
pub mod listener;
pub mod orchestrator;
pub mod sender;
pub mod submission;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, load_config};
pub use environment::BuildEnv;
pub use listener::{BuildListener, ConsoleListener};
pub use orchestrator::{Orchestrator, TerminalStatus};
pub use sender::{CredentialCheck, ResultSender, SendError};
pub use submission::Submission;
