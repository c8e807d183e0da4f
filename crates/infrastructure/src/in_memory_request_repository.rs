use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqora_application::{RequestFilter, RequestRepository, RequestVersion, VersionedRequest};
use reqora_core::{AppError, AppResult, RequestId};
use reqora_domain::AccessRequest;
use tokio::sync::RwLock;

#[derive(Clone)]
struct StoredDocument {
    request: AccessRequest,
    version: RequestVersion,
    modified_at: DateTime<Utc>,
}

/// In-memory request repository for tests and local development.
///
/// Mirrors the document-store contract: per-document version tokens and
/// recency-ordered scans stamped at write time.
#[derive(Default)]
pub struct InMemoryRequestRepository {
    documents: RwLock<HashMap<RequestId, StoredDocument>>,
}

impl InMemoryRequestRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn create(&self, request: AccessRequest) -> AppResult<VersionedRequest> {
        let mut documents = self.documents.write().await;

        if documents.contains_key(&request.id()) {
            return Err(AppError::Conflict(format!(
                "request '{}' already exists",
                request.id()
            )));
        }

        let version = RequestVersion::initial();
        documents.insert(
            request.id(),
            StoredDocument {
                request: request.clone(),
                version,
                modified_at: Utc::now(),
            },
        );

        Ok(VersionedRequest { request, version })
    }

    async fn find(&self, request_id: RequestId) -> AppResult<Option<VersionedRequest>> {
        Ok(self
            .documents
            .read()
            .await
            .get(&request_id)
            .map(|document| VersionedRequest {
                request: document.request.clone(),
                version: document.version,
            }))
    }

    async fn update(
        &self,
        request: AccessRequest,
        expected_version: RequestVersion,
    ) -> AppResult<VersionedRequest> {
        let mut documents = self.documents.write().await;

        let Some(existing) = documents.get_mut(&request.id()) else {
            return Err(AppError::NotFound(format!(
                "request '{}' does not exist",
                request.id()
            )));
        };

        if existing.version != expected_version {
            return Err(AppError::Conflict(format!(
                "request '{}' was modified concurrently",
                request.id()
            )));
        }

        existing.version = expected_version.next();
        existing.request = request.clone();
        existing.modified_at = Utc::now();

        Ok(VersionedRequest {
            request,
            version: existing.version,
        })
    }

    async fn list(&self, filter: RequestFilter) -> AppResult<Vec<AccessRequest>> {
        let documents = self.documents.read().await;

        let mut listed: Vec<StoredDocument> = documents
            .values()
            .filter(|document| match &filter {
                RequestFilter::All => true,
                RequestFilter::ByStatus(status) => document.request.status() == *status,
                RequestFilter::ByRequestor(object_id) => {
                    document.request.requestor().object_id() == object_id
                }
            })
            .cloned()
            .collect();
        listed.sort_by(|left, right| right.modified_at.cmp(&left.modified_at));

        Ok(listed
            .into_iter()
            .map(|document| document.request)
            .collect())
    }
}
