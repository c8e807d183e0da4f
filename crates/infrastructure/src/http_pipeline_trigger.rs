use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqora_application::{PipelineRunReference, PipelineTrigger, ProvisioningJob};
use reqora_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// HTTP implementation of the dataset-provisioning trigger.
///
/// The cohort selection query is base64-armored so the text survives the
/// text-only transport, and every submission carries the request id as an
/// `Idempotency-Key` header so the trigger service can detect retries.
pub struct HttpPipelineTrigger {
    http_client: reqwest::Client,
    trigger_url: String,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

#[derive(Serialize)]
struct TriggerPayload<'a> {
    query_base64: String,
    dataset_name: &'a str,
    workspace_id: &'a str,
}

#[derive(Deserialize)]
struct TriggerResponse {
    run_url: Option<String>,
    run_id: Option<String>,
}

impl HttpPipelineTrigger {
    /// Creates a trigger client for the provisioning service endpoint.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        trigger_url: impl Into<String>,
        max_attempts: u8,
        retry_backoff_ms: u64,
    ) -> Self {
        Self {
            http_client,
            trigger_url: trigger_url.into(),
            max_attempts: max_attempts.max(1),
            retry_backoff_ms: retry_backoff_ms.max(50),
        }
    }
}

#[async_trait]
impl PipelineTrigger for HttpPipelineTrigger {
    async fn trigger(&self, job: ProvisioningJob) -> AppResult<PipelineRunReference> {
        let payload = TriggerPayload {
            query_base64: STANDARD.encode(job.cohort_selection_query.as_bytes()),
            dataset_name: job.dataset.as_str(),
            workspace_id: job.workspace_id.as_str(),
        };
        let idempotency_key = job.request_id.to_string();

        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);

            let response = self
                .http_client
                .post(self.trigger_url.as_str())
                .header("Idempotency-Key", idempotency_key.as_str())
                .json(&payload)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    let body: TriggerResponse = response.json().await.map_err(|error| {
                        AppError::Pipeline(format!(
                            "invalid trigger response for request '{}': {error}",
                            job.request_id
                        ))
                    })?;

                    let reference = body.run_url.or(body.run_id).ok_or_else(|| {
                        AppError::Pipeline(format!(
                            "trigger response for request '{}' did not include a run reference",
                            job.request_id
                        ))
                    })?;

                    return Ok(PipelineRunReference::new(reference));
                }
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} from the trigger service",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
                    return Err(AppError::Pipeline(format!(
                        "trigger rejected request '{}' with status {status}: {body}",
                        job.request_id
                    )));
                }
                Err(error) => {
                    last_error = Some(format!("trigger transport error: {error}"));
                }
            }

            if attempt < self.max_attempts {
                warn!(request_id = %job.request_id, attempt, "retrying provisioning pipeline trigger");
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Pipeline(last_error.unwrap_or_else(|| {
            "provisioning pipeline trigger exhausted retries".to_owned()
        })))
    }
}
