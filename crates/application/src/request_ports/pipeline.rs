use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use reqora_core::{AppResult, RequestId};
use reqora_domain::AccessRequest;

/// Parameters for one dataset-provisioning pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningJob {
    /// Request the run provisions; doubles as the idempotency token so the
    /// trigger service can detect retried submissions.
    pub request_id: RequestId,
    /// Cohort selection query, transmitted as an opaque payload.
    pub cohort_selection_query: String,
    /// Dataset to materialize.
    pub dataset: String,
    /// Workspace receiving the dataset.
    pub workspace_id: String,
}

impl ProvisioningJob {
    /// Builds the job payload from an approved request.
    #[must_use]
    pub fn from_request(request: &AccessRequest) -> Self {
        Self {
            request_id: request.id(),
            cohort_selection_query: request.cohort_selection_query().to_owned(),
            dataset: request.dataset().to_owned(),
            workspace_id: request.workspace_id().to_owned(),
        }
    }
}

/// Human-readable reference to a triggered pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRunReference(String);

impl PipelineRunReference {
    /// Creates a run reference from the trigger service response.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PipelineRunReference {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Port for the external dataset-provisioning trigger service.
#[async_trait]
pub trait PipelineTrigger: Send + Sync {
    /// Starts a provisioning run and returns its reference.
    async fn trigger(&self, job: ProvisioningJob) -> AppResult<PipelineRunReference>;
}
