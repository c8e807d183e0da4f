use async_trait::async_trait;
use reqora_core::{AppResult, RequestId};
use reqora_domain::{AccessRequest, RequestStatus};

/// Opaque optimistic-concurrency token for one stored request document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestVersion(i64);

impl RequestVersion {
    /// Version assigned to a newly created document.
    #[must_use]
    pub fn initial() -> Self {
        Self(1)
    }

    /// Creates a version token from a raw store value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw store value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns the token assigned by the write that follows this read.
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// A request document paired with the version token it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRequest {
    /// The stored document.
    pub request: AccessRequest,
    /// Version token to supply with the next write.
    pub version: RequestVersion,
}

/// Predicate for ordered request scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFilter {
    /// Every request.
    All,
    /// Requests currently in one status.
    ByStatus(RequestStatus),
    /// Requests created by one requestor object id.
    ByRequestor(String),
}

/// Repository port for request documents with optimistic concurrency.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Persists a new request document.
    async fn create(&self, request: AccessRequest) -> AppResult<VersionedRequest>;

    /// Returns one request document with its current version token.
    async fn find(&self, request_id: RequestId) -> AppResult<Option<VersionedRequest>>;

    /// Replaces a request document, failing with `Conflict` when the stored
    /// version no longer matches `expected_version`.
    async fn update(
        &self,
        request: AccessRequest,
        expected_version: RequestVersion,
    ) -> AppResult<VersionedRequest>;

    /// Lists requests matching a filter, most recently written first.
    async fn list(&self, filter: RequestFilter) -> AppResult<Vec<AccessRequest>>;
}
