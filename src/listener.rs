//! The build log sink.
//!
//! Diagnostics produced during a run are contractual output: the enclosing
//! build surfaces them to whoever has to fix the configuration, and the
//! fixed strings in [`crate::validation`] are asserted by tests. They
//! therefore go through an explicit listener rather than the `tracing`
//! telemetry channel.

use std::fmt;

/// Append-only line writer for one run's build log.
///
/// Implementations must be safe to share across concurrent runs of
/// *different* builds; the orchestrator itself never calls it from more than
/// one task at a time.
pub trait BuildListener: Send + Sync {
    /// Writes an informational line.
    fn line(&self, message: &str);

    /// Writes an error line.
    fn error(&self, message: &str);

    /// Writes an error line with its underlying cause.
    fn error_with_cause(&self, message: &str, cause: &dyn fmt::Display) {
        self.error(&format!("{message}: {cause}"));
    }
}

/// Listener that writes to the process's stdout/stderr, errors styled red.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleListener;

impl BuildListener for ConsoleListener {
    fn line(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{}", console::style(message).red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        errors: Mutex<Vec<String>>,
    }

    impl BuildListener for Recorder {
        fn line(&self, _message: &str) {}

        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_error_with_cause_appends_the_cause() {
        let recorder = Recorder {
            errors: Mutex::new(Vec::new()),
        };

        recorder.error_with_cause("Import failed", &"connection reset");

        assert_eq!(
            *recorder.errors.lock().unwrap(),
            vec!["Import failed: connection reset"]
        );
    }
}
