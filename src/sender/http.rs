//! HTTP implementation of the [`ResultSender`] contract.
//!
//! Talks to the tracker's REST surface with basic auth: a session endpoint
//! for the credential pre-check, an import-status endpoint for the
//! active-import poll, and a multipart import endpoint for the upload
//! itself. Every fault crossing this seam is converted into a [`SendError`];
//! nothing panics out of the sender.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::{CredentialCheck, ResultSender, SendError};
use crate::submission::Submission;

const SESSION_ENDPOINT: &str = "rest/auth/1/session";
const IMPORT_ENDPOINT: &str = "rest/tms/1.0/automation/import";
const IMPORT_STATUS_ENDPOINT: &str = "rest/tms/1.0/automation/import/status";

/// How long one active-import poll cycle waits before asking again.
const ACTIVE_IMPORT_POLL: Duration = Duration::from_secs(10);

/// How many poll cycles to wait out an active import before giving up.
const ACTIVE_IMPORT_ATTEMPTS: u32 = 30;

/// Production sender backed by a shared [`reqwest::Client`].
///
/// Safe for concurrent use; the client pools connections internally and no
/// per-call state is kept.
#[derive(Debug, Clone, Default)]
pub struct HttpSender {
    client: reqwest::Client,
}

impl HttpSender {
    /// A sender with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no import is running on the submission's test plan.
    ///
    /// Gives up with an error after [`ACTIVE_IMPORT_ATTEMPTS`] cycles. A
    /// failing status endpoint does not block the upload: the import
    /// endpoint itself rejects a busy plan, and that rejection is surfaced
    /// normally.
    async fn wait_for_idle_import(&self, submission: &Submission) -> Result<(), SendError> {
        let url = endpoint_url(&submission.tracker_url, IMPORT_STATUS_ENDPOINT);

        for attempt in 0..ACTIVE_IMPORT_ATTEMPTS {
            let response = self
                .client
                .get(&url)
                .query(&[("testPlanKey", submission.test_plan_key.as_str())])
                .basic_auth(&submission.username, Some(&submission.password))
                .send()
                .await;

            let active = match response {
                Ok(response) => response
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("active").and_then(serde_json::Value::as_bool))
                    .unwrap_or(false),
                Err(e) => {
                    debug!("Import status check failed, proceeding with upload: {e}");
                    return Ok(());
                }
            };

            if !active {
                return Ok(());
            }

            debug!(
                "Import already running for {} (attempt {}/{})",
                submission.test_plan_key,
                attempt + 1,
                ACTIVE_IMPORT_ATTEMPTS
            );
            tokio::time::sleep(ACTIVE_IMPORT_POLL).await;
        }

        Err(SendError::new(format!(
            "Timed out waiting for the active import on {} to finish",
            submission.test_plan_key
        )))
    }

    async fn import_form(&self, submission: &Submission) -> Result<Form, SendError> {
        let mut form = Form::new()
            .text("testPlanKey", submission.test_plan_key.clone())
            .text(
                "testCaseCreationStrategy",
                submission.creation_strategy.as_param(),
            )
            .text("targetIteration", submission.target_iteration.as_param())
            .text("resultsType", submission.results_type.as_param())
            .text("buildUrl", submission.build_url.clone());

        if let Some(parameters) = &submission.import_parameters {
            form = form.text("importParameters", parameters.clone());
        }

        for file in &submission.result_files {
            let bytes = tokio::fs::read(file).await.map_err(|e| {
                SendError::new(format!(
                    "Failed to read staged result file {}",
                    file.display()
                ))
                .with_source(e)
            })?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "results.xml".to_string());
            form = form.part("file", Part::bytes(bytes).file_name(name));
        }

        Ok(form)
    }
}

#[async_trait]
impl ResultSender for HttpSender {
    async fn validate_credentials(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> CredentialCheck {
        let session_url = endpoint_url(url, SESSION_ENDPOINT);

        match self
            .client
            .get(&session_url)
            .basic_auth(username, Some(password))
            .send()
            .await
        {
            Ok(response) => match response.status() {
                status if status.is_success() => CredentialCheck::Valid,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    CredentialCheck::InvalidCredentials
                }
                StatusCode::NOT_FOUND => CredentialCheck::InvalidUrl,
                status => {
                    CredentialCheck::UnexpectedError(format!("Tracker answered with {status}"))
                }
            },
            Err(e) if e.is_builder() || e.is_connect() => CredentialCheck::InvalidUrl,
            Err(e) => CredentialCheck::UnexpectedError(e.to_string()),
        }
    }

    async fn send(&self, submission: Submission) -> Result<(), SendError> {
        if submission.retry_on_active_import {
            self.wait_for_idle_import(&submission).await?;
        }

        let form = self.import_form(&submission).await?;
        let import_url = endpoint_url(&submission.tracker_url, IMPORT_ENDPOINT);

        debug!(
            "Uploading {} result files to {import_url}",
            submission.result_files.len()
        );

        let response = self
            .client
            .post(&import_url)
            .basic_auth(&submission.username, Some(&submission.password))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                SendError::new("Failed to send test results to the tracker").with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!("Failed to read the tracker's error response: {e}");
                String::new()
            });
            return Err(
                SendError::new(format!("Test result import failed with status {status}"))
                    .with_body(body),
            );
        }

        Ok(())
    }
}

fn endpoint_url(base: &str, endpoint: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_without_doubled_slashes() {
        assert_eq!(
            endpoint_url("https://tracker.example.com/", SESSION_ENDPOINT),
            "https://tracker.example.com/rest/auth/1/session"
        );
        assert_eq!(
            endpoint_url("https://tracker.example.com", IMPORT_ENDPOINT),
            "https://tracker.example.com/rest/tms/1.0/automation/import"
        );
    }
}
