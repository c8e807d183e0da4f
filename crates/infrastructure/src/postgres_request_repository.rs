use async_trait::async_trait;
use sqlx::PgPool;

use reqora_application::{RequestFilter, RequestRepository, RequestVersion, VersionedRequest};
use reqora_core::{AppError, AppResult, RequestId};
use reqora_domain::AccessRequest;

/// PostgreSQL-backed request repository.
///
/// Stores each request as one JSONB document row with a bigint version
/// token for optimistic concurrency and a server-stamped `modified_at`
/// recency timestamp. Status and requestor object id are denormalized into
/// indexed columns for the filtered scans.
#[derive(Clone)]
pub struct PostgresRequestRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct RequestRow {
    document: serde_json::Value,
    version: i64,
}

impl PostgresRequestRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, request_id: RequestId) -> AppResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM access_requests WHERE id = $1)")
                .bind(request_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to check existence of request '{request_id}': {error}"
                    ))
                })?;

        Ok(exists.0)
    }
}

fn document_from_request(request: &AccessRequest) -> AppResult<serde_json::Value> {
    serde_json::to_value(request).map_err(|error| {
        AppError::Internal(format!(
            "failed to encode request '{}' as a document: {error}",
            request.id()
        ))
    })
}

fn request_from_row(row: RequestRow) -> AppResult<VersionedRequest> {
    let request: AccessRequest = serde_json::from_value(row.document).map_err(|error| {
        AppError::Internal(format!("failed to decode stored request document: {error}"))
    })?;

    Ok(VersionedRequest {
        request,
        version: RequestVersion::new(row.version),
    })
}

#[async_trait]
impl RequestRepository for PostgresRequestRepository {
    async fn create(&self, request: AccessRequest) -> AppResult<VersionedRequest> {
        let document = document_from_request(&request)?;

        sqlx::query(
            r#"
            INSERT INTO access_requests (
                id,
                requestor_object_id,
                status,
                document,
                version,
                modified_at
            )
            VALUES ($1, $2, $3, $4, 1, now())
            "#,
        )
        .bind(request.id().as_uuid())
        .bind(request.requestor().object_id())
        .bind(request.status().as_str())
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to create request '{}': {error}",
                request.id()
            ))
        })?;

        Ok(VersionedRequest {
            request,
            version: RequestVersion::initial(),
        })
    }

    async fn find(&self, request_id: RequestId) -> AppResult<Option<VersionedRequest>> {
        let row = sqlx::query_as::<_, RequestRow>(
            "SELECT document, version FROM access_requests WHERE id = $1",
        )
        .bind(request_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read request '{request_id}': {error}"))
        })?;

        row.map(request_from_row).transpose()
    }

    async fn update(
        &self,
        request: AccessRequest,
        expected_version: RequestVersion,
    ) -> AppResult<VersionedRequest> {
        let document = document_from_request(&request)?;

        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            UPDATE access_requests
            SET
                document = $2,
                status = $3,
                version = version + 1,
                modified_at = now()
            WHERE id = $1 AND version = $4
            RETURNING version
            "#,
        )
        .bind(request.id().as_uuid())
        .bind(document)
        .bind(request.status().as_str())
        .bind(expected_version.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update request '{}': {error}",
                request.id()
            ))
        })?;

        let Some((version,)) = row else {
            if self.exists(request.id()).await? {
                return Err(AppError::Conflict(format!(
                    "request '{}' was modified concurrently",
                    request.id()
                )));
            }

            return Err(AppError::NotFound(format!(
                "request '{}' does not exist",
                request.id()
            )));
        };

        Ok(VersionedRequest {
            request,
            version: RequestVersion::new(version),
        })
    }

    async fn list(&self, filter: RequestFilter) -> AppResult<Vec<AccessRequest>> {
        let rows = match filter {
            RequestFilter::All => {
                sqlx::query_as::<_, RequestRow>(
                    "SELECT document, version FROM access_requests ORDER BY modified_at DESC",
                )
                .fetch_all(&self.pool)
                .await
            }
            RequestFilter::ByStatus(status) => {
                sqlx::query_as::<_, RequestRow>(
                    r#"
                    SELECT document, version FROM access_requests
                    WHERE status = $1
                    ORDER BY modified_at DESC
                    "#,
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            RequestFilter::ByRequestor(object_id) => {
                sqlx::query_as::<_, RequestRow>(
                    r#"
                    SELECT document, version FROM access_requests
                    WHERE requestor_object_id = $1
                    ORDER BY modified_at DESC
                    "#,
                )
                .bind(object_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|error| AppError::Internal(format!("failed to list requests: {error}")))?;

        rows.into_iter()
            .map(|row| request_from_row(row).map(|stored| stored.request))
            .collect()
    }
}
