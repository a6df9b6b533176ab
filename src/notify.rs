//! Compile outcome notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilationStatus {
    Success,
    Failed,
}

/// Emitted once per resolved compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileEvent {
    pub team_id: String,
    pub team_name: String,
    pub compilation_status: CompilationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CompileEvent {
    pub fn success(key: &str, name: &str) -> Self {
        Self {
            team_id: key.to_string(),
            team_name: name.to_string(),
            compilation_status: CompilationStatus::Success,
            error_message: None,
        }
    }

    pub fn failed(key: &str, name: &str, error: impl Into<String>) -> Self {
        Self {
            team_id: key.to_string(),
            team_name: name.to_string(),
            compilation_status: CompilationStatus::Failed,
            error_message: Some(error.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    Request(String),
    #[error("Notification rejected with status {0}")]
    Status(u16),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: CompileEvent) -> Result<(), NotifyError>;
}

/// Writes events to the log.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, event: CompileEvent) -> Result<(), NotifyError> {
        match event.compilation_status {
            CompilationStatus::Success => {
                tracing::info!(
                    key = %event.team_id,
                    name = %event.team_name,
                    "COMPILE: success"
                );
            }
            CompilationStatus::Failed => {
                tracing::warn!(
                    key = %event.team_id,
                    name = %event.team_name,
                    error = event.error_message.as_deref().unwrap_or(""),
                    "COMPILE: failed"
                );
            }
        }
        Ok(())
    }
}

#[cfg(feature = "webhook-notify")]
pub use webhook::WebhookNotifier;

#[cfg(feature = "webhook-notify")]
mod webhook {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{CompileEvent, Notifier, NotifyError};

    const REGISTER_PATH: &str = "/api/register-upload";

    /// POSTs events as JSON to `{base}/api/register-upload`.
    pub struct WebhookNotifier {
        endpoint: String,
        client: reqwest::Client,
        timeout: Duration,
    }

    impl WebhookNotifier {
        pub fn new(base_url: &str, timeout: Duration) -> Self {
            Self {
                endpoint: format!("{}{}", base_url.trim_end_matches('/'), REGISTER_PATH),
                client: reqwest::Client::new(),
                timeout,
            }
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait]
    impl Notifier for WebhookNotifier {
        async fn notify(&self, event: CompileEvent) -> Result<(), NotifyError> {
            let response = self
                .client
                .post(&self.endpoint)
                .timeout(self.timeout)
                .json(&event)
                .send()
                .await
                .map_err(|e| NotifyError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(NotifyError::Status(status.as_u16()));
            }
            tracing::info!(
                key = %event.team_id,
                status = ?event.compilation_status,
                response_code = status.as_u16(),
                "Notified upload registry"
            );
            Ok(())
        }
    }

}
