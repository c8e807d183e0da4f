use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use reqora_core::{AppError, AppResult, RequestId, UserIdentity};
use reqora_domain::{AccessRequest, AuditEntry, RequestDetails, RequestStatus};

use crate::request_access;
use crate::request_ports::{
    PipelineTrigger, ProvisioningJob, RequestFilter, RequestRepository, VersionedRequest,
};

mod create;
mod edit;
mod messages;
mod queries;
mod status;

/// Full read-diff-write cycles attempted when a write loses a
/// concurrent-update race.
const CONFLICT_RETRY_ATTEMPTS: usize = 3;

/// Application service orchestrating the request lifecycle: capability
/// checks, field-level diffing, status transitions, and pipeline triggering,
/// persisted with optimistic concurrency.
#[derive(Clone)]
pub struct RequestService {
    repository: Arc<dyn RequestRepository>,
    pipeline: Arc<dyn PipelineTrigger>,
}

impl RequestService {
    /// Creates a request service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RequestRepository>,
        pipeline: Arc<dyn PipelineTrigger>,
    ) -> Self {
        Self {
            repository,
            pipeline,
        }
    }

    async fn find_required(&self, request_id: RequestId) -> AppResult<VersionedRequest> {
        self.repository
            .find(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("request '{request_id}' does not exist")))
    }
}
