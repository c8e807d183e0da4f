use std::collections::BTreeMap;

use reqora_core::{AppError, UserIdentity};
use reqora_domain::{AccessRequest, AuditEntry, RequestDetails, RequestStatus};

use super::types::{
    AccessRequestResponse, AuditEntryResponse, CreateRequestRequest, FieldChangeResponse,
    IdentityResponse, RequestStatusDto, UpdateRequestDetailsRequest,
};

impl From<RequestStatus> for RequestStatusDto {
    fn from(value: RequestStatus) -> Self {
        match value {
            RequestStatus::Draft => Self::Draft,
            RequestStatus::Pending => Self::Pending,
            RequestStatus::InReview => Self::InReview,
            RequestStatus::Rejected => Self::Rejected,
            RequestStatus::Approved => Self::Approved,
            RequestStatus::Completed => Self::Completed,
        }
    }
}

impl From<RequestStatusDto> for RequestStatus {
    fn from(value: RequestStatusDto) -> Self {
        match value {
            RequestStatusDto::Draft => Self::Draft,
            RequestStatusDto::Pending => Self::Pending,
            RequestStatusDto::InReview => Self::InReview,
            RequestStatusDto::Rejected => Self::Rejected,
            RequestStatusDto::Approved => Self::Approved,
            RequestStatusDto::Completed => Self::Completed,
        }
    }
}

impl From<&UserIdentity> for IdentityResponse {
    fn from(value: &UserIdentity) -> Self {
        Self {
            object_id: value.object_id().to_owned(),
            display_name: value.display_name().to_owned(),
            roles: value
                .roles()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
            preferred_username: value.preferred_username().to_owned(),
            issuer: value.issuer().to_owned(),
        }
    }
}

impl From<&AuditEntry> for AuditEntryResponse {
    fn from(value: &AuditEntry) -> Self {
        Self {
            updated_by: IdentityResponse::from(value.updated_by()),
            updated_when: value.updated_when().to_rfc3339(),
            updated_fields: value
                .updated_fields()
                .iter()
                .map(|(field, change)| {
                    (
                        field.clone(),
                        FieldChangeResponse {
                            from: change.from.clone(),
                            to: change.to.clone(),
                        },
                    )
                })
                .collect(),
            comment: value.comment().map(ToOwned::to_owned),
        }
    }
}

impl From<AuditEntry> for AuditEntryResponse {
    fn from(value: AuditEntry) -> Self {
        Self::from(&value)
    }
}

impl From<AccessRequest> for AccessRequestResponse {
    fn from(value: AccessRequest) -> Self {
        Self {
            id: value.id().to_string(),
            status: RequestStatusDto::from(value.status()),
            project_id: value.project_id().to_owned(),
            project_name: value.project_name().to_owned(),
            description: value.description().to_owned(),
            title: value.title().to_owned(),
            workspace_id: value.workspace_id().to_owned(),
            dataset: value.dataset().to_owned(),
            cohort_selection_query: value.cohort_selection_query().to_owned(),
            request_data: value.request_data().clone(),
            requestor: IdentityResponse::from(value.requestor()),
            requested_when: value.requested_when().to_rfc3339(),
            updates: value.updates().iter().map(AuditEntryResponse::from).collect(),
        }
    }
}

impl CreateRequestRequest {
    /// Validates the payload and splits it into the initial details and the
    /// open metadata mapping.
    pub fn into_parts(self) -> Result<(RequestDetails, BTreeMap<String, String>), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_owned()));
        }

        if self.project_id.trim().is_empty() {
            return Err(AppError::Validation(
                "project_id must not be empty".to_owned(),
            ));
        }

        let details = RequestDetails {
            project_id: Some(self.project_id),
            project_name: Some(self.project_name),
            description: Some(self.description),
            title: Some(self.title),
            workspace_id: Some(self.workspace_id),
            dataset: Some(self.dataset.unwrap_or_default()),
            cohort_selection_query: Some(self.cohort_selection_query.unwrap_or_default()),
        };

        Ok((details, self.request_data.unwrap_or_default()))
    }
}

impl From<UpdateRequestDetailsRequest> for RequestDetails {
    fn from(value: UpdateRequestDetailsRequest) -> Self {
        Self {
            project_id: value.project_id,
            project_name: value.project_name,
            description: value.description,
            title: value.title,
            workspace_id: value.workspace_id,
            dataset: value.dataset,
            cohort_selection_query: value.cohort_selection_query,
        }
    }
}
