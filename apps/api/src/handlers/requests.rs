use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use reqora_core::{RequestId, UserIdentity};
use reqora_domain::RequestStatus;
use uuid::Uuid;

use crate::dto::{
    AccessRequestResponse, AddMessageRequest, AuditEntryResponse, CreateRequestRequest,
    UpdateRequestDetailsRequest, UpdateStatusRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_request_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateRequestRequest>,
) -> ApiResult<(StatusCode, Json<AccessRequestResponse>)> {
    let (details, request_data) = payload.into_parts()?;
    let request = state
        .request_service
        .create_request(&user, details, request_data)
        .await?;

    Ok((StatusCode::CREATED, Json(AccessRequestResponse::from(request))))
}

pub async fn list_requests_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<AccessRequestResponse>>> {
    let requests = state
        .request_service
        .list_requests(&user)
        .await?
        .into_iter()
        .map(AccessRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

pub async fn list_my_requests_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<AccessRequestResponse>>> {
    let requests = state
        .request_service
        .list_my_requests(&user)
        .await?
        .into_iter()
        .map(AccessRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

pub async fn list_pending_requests_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<AccessRequestResponse>>> {
    let requests = state
        .request_service
        .list_requests_by_status(&user, RequestStatus::Pending)
        .await?
        .into_iter()
        .map(AccessRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

pub async fn get_request_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<Json<AccessRequestResponse>> {
    let request = state
        .request_service
        .get_request(&user, RequestId::from_uuid(request_id))
        .await?;

    Ok(Json(AccessRequestResponse::from(request)))
}

pub async fn update_request_details_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<UpdateRequestDetailsRequest>,
) -> ApiResult<Json<AccessRequestResponse>> {
    let request = state
        .request_service
        .edit_request(&user, RequestId::from_uuid(request_id), payload.into())
        .await?;

    Ok(Json(AccessRequestResponse::from(request)))
}

pub async fn add_message_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<AddMessageRequest>,
) -> ApiResult<(StatusCode, Json<AuditEntryResponse>)> {
    let entry = state
        .request_service
        .add_message(&user, RequestId::from_uuid(request_id), payload.comment)
        .await?;

    Ok((StatusCode::CREATED, Json(AuditEntryResponse::from(entry))))
}

pub async fn list_request_updates_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<Json<Vec<AuditEntryResponse>>> {
    let updates = state
        .request_service
        .list_updates(&user, RequestId::from_uuid(request_id))
        .await?
        .into_iter()
        .map(AuditEntryResponse::from)
        .collect();

    Ok(Json(updates))
}

pub async fn update_request_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Json<AccessRequestResponse>> {
    let request = state
        .request_service
        .transition_status(
            &user,
            RequestId::from_uuid(request_id),
            payload.status.into(),
            payload.comment,
        )
        .await?;

    Ok(Json(AccessRequestResponse::from(request)))
}
