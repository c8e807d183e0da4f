use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Review status values exposed through the API.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/request-status-dto.ts")]
pub enum RequestStatusDto {
    Draft,
    Pending,
    InReview,
    Rejected,
    Approved,
    Completed,
}

/// API representation of an authenticated identity snapshot.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/identity-response.ts")]
pub struct IdentityResponse {
    pub object_id: String,
    pub display_name: String,
    pub roles: Vec<String>,
    pub preferred_username: String,
    pub issuer: String,
}

/// Old and new value of one changed field.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/field-change-response.ts")]
pub struct FieldChangeResponse {
    pub from: String,
    pub to: String,
}

/// One entry of a request's audit trail.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/audit-entry-response.ts")]
pub struct AuditEntryResponse {
    pub updated_by: IdentityResponse,
    pub updated_when: String,
    pub updated_fields: BTreeMap<String, FieldChangeResponse>,
    pub comment: Option<String>,
}

/// API representation of one data-access request.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/access-request-response.ts")]
pub struct AccessRequestResponse {
    pub id: String,
    pub status: RequestStatusDto,
    pub project_id: String,
    pub project_name: String,
    pub description: String,
    pub title: String,
    pub workspace_id: String,
    pub dataset: String,
    pub cohort_selection_query: String,
    pub request_data: BTreeMap<String, String>,
    pub requestor: IdentityResponse,
    pub requested_when: String,
    pub updates: Vec<AuditEntryResponse>,
}

/// Incoming payload for request creation.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/create-request-request.ts")]
pub struct CreateRequestRequest {
    pub project_id: String,
    pub project_name: String,
    pub description: String,
    pub title: String,
    pub workspace_id: String,
    pub dataset: Option<String>,
    pub cohort_selection_query: Option<String>,
    pub request_data: Option<BTreeMap<String, String>>,
}

/// Incoming payload for a requestor edit; absent fields are left untouched.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/update-request-details-request.ts")]
pub struct UpdateRequestDetailsRequest {
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub workspace_id: Option<String>,
    pub dataset: Option<String>,
    pub cohort_selection_query: Option<String>,
}

/// Incoming payload for a free-text message.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/add-message-request.ts")]
pub struct AddMessageRequest {
    pub comment: String,
}

/// Incoming payload for a reviewer status change.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../../ui/src/generated/update-status-request.ts")]
pub struct UpdateStatusRequest {
    pub status: RequestStatusDto,
    pub comment: Option<String>,
}
