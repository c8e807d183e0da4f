use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqora_core::{AppError, AppResult, RequestId, UserIdentity};
use serde::{Deserialize, Serialize};

use crate::status::RequestStatus;

/// The fixed set of request fields that participate in diffing.
///
/// Fields outside this set are never reported in an audit entry and never
/// change through the generic edit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    /// Identifier of the research project.
    ProjectId,
    /// Display name of the research project.
    ProjectName,
    /// Short summary of the request.
    Description,
    /// Title of the request.
    Title,
    /// Workspace the dataset is provisioned into.
    WorkspaceId,
    /// Name of the requested dataset.
    Dataset,
    /// Query selecting the patient cohort.
    CohortSelectionQuery,
}

impl EditableField {
    /// Every diffable field, in audit-entry key order.
    pub const ALL: [Self; 7] = [
        Self::ProjectId,
        Self::ProjectName,
        Self::Description,
        Self::Title,
        Self::WorkspaceId,
        Self::Dataset,
        Self::CohortSelectionQuery,
    ];

    /// Returns the field name used as the audit-entry key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectId => "project_id",
            Self::ProjectName => "project_name",
            Self::Description => "description",
            Self::Title => "title",
            Self::WorkspaceId => "workspace_id",
            Self::Dataset => "dataset",
            Self::CohortSelectionQuery => "cohort_selection_query",
        }
    }
}

/// Old and new value of one field recorded in an audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Value before the change.
    pub from: String,
    /// Value after the change.
    pub to: String,
}

/// Incoming change to a request's editable fields.
///
/// A `None` field is absent from the incoming document and is skipped by the
/// diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetails {
    /// Incoming project identifier.
    pub project_id: Option<String>,
    /// Incoming project name.
    pub project_name: Option<String>,
    /// Incoming description.
    pub description: Option<String>,
    /// Incoming title.
    pub title: Option<String>,
    /// Incoming workspace identifier.
    pub workspace_id: Option<String>,
    /// Incoming dataset name.
    pub dataset: Option<String>,
    /// Incoming cohort selection query.
    pub cohort_selection_query: Option<String>,
}

impl RequestDetails {
    /// Returns the incoming value for a field, when present.
    #[must_use]
    pub fn value(&self, field: EditableField) -> Option<&str> {
        match field {
            EditableField::ProjectId => self.project_id.as_deref(),
            EditableField::ProjectName => self.project_name.as_deref(),
            EditableField::Description => self.description.as_deref(),
            EditableField::Title => self.title.as_deref(),
            EditableField::WorkspaceId => self.workspace_id.as_deref(),
            EditableField::Dataset => self.dataset.as_deref(),
            EditableField::CohortSelectionQuery => self.cohort_selection_query.as_deref(),
        }
    }
}

/// One immutable record of a change, transition, or comment on a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    updated_by: UserIdentity,
    updated_when: DateTime<Utc>,
    updated_fields: BTreeMap<String, FieldChange>,
    comment: Option<String>,
}

impl AuditEntry {
    /// Returns the identity that made the change.
    #[must_use]
    pub fn updated_by(&self) -> &UserIdentity {
        &self.updated_by
    }

    /// Returns when the change was made.
    #[must_use]
    pub fn updated_when(&self) -> DateTime<Utc> {
        self.updated_when
    }

    /// Returns the recorded field changes; empty when nothing changed.
    #[must_use]
    pub fn updated_fields(&self) -> &BTreeMap<String, FieldChange> {
        &self.updated_fields
    }

    /// Returns the free-text comment, when one was attached.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Aggregate root for one data-access request and its full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    id: RequestId,
    status: RequestStatus,
    project_id: String,
    project_name: String,
    description: String,
    title: String,
    workspace_id: String,
    dataset: String,
    cohort_selection_query: String,
    request_data: BTreeMap<String, String>,
    requestor: UserIdentity,
    requested_when: DateTime<Utc>,
    updates: Vec<AuditEntry>,
}

impl AccessRequest {
    /// Creates a new request with status `Pending` and an empty history.
    #[must_use]
    pub fn new(
        id: RequestId,
        requestor: UserIdentity,
        details: RequestDetails,
        request_data: BTreeMap<String, String>,
        requested_when: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status: RequestStatus::Pending,
            project_id: details.project_id.unwrap_or_default(),
            project_name: details.project_name.unwrap_or_default(),
            description: details.description.unwrap_or_default(),
            title: details.title.unwrap_or_default(),
            workspace_id: details.workspace_id.unwrap_or_default(),
            dataset: details.dataset.unwrap_or_default(),
            cohort_selection_query: details.cohort_selection_query.unwrap_or_default(),
            request_data,
            requestor,
            requested_when,
            updates: Vec::new(),
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the current review status.
    #[must_use]
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns the project identifier.
    #[must_use]
    pub fn project_id(&self) -> &str {
        self.project_id.as_str()
    }

    /// Returns the project name.
    #[must_use]
    pub fn project_name(&self) -> &str {
        self.project_name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the target workspace identifier.
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        self.workspace_id.as_str()
    }

    /// Returns the requested dataset name.
    #[must_use]
    pub fn dataset(&self) -> &str {
        self.dataset.as_str()
    }

    /// Returns the cohort selection query.
    #[must_use]
    pub fn cohort_selection_query(&self) -> &str {
        self.cohort_selection_query.as_str()
    }

    /// Returns the open metadata mapping captured at creation.
    #[must_use]
    pub fn request_data(&self) -> &BTreeMap<String, String> {
        &self.request_data
    }

    /// Returns the immutable snapshot of the creating identity.
    #[must_use]
    pub fn requestor(&self) -> &UserIdentity {
        &self.requestor
    }

    /// Returns when the request was created.
    #[must_use]
    pub fn requested_when(&self) -> DateTime<Utc> {
        self.requested_when
    }

    /// Returns the append-only audit trail, oldest first.
    #[must_use]
    pub fn updates(&self) -> &[AuditEntry] {
        self.updates.as_slice()
    }

    /// Returns the current value of a diffable field.
    #[must_use]
    pub fn field(&self, field: EditableField) -> &str {
        match field {
            EditableField::ProjectId => self.project_id.as_str(),
            EditableField::ProjectName => self.project_name.as_str(),
            EditableField::Description => self.description.as_str(),
            EditableField::Title => self.title.as_str(),
            EditableField::WorkspaceId => self.workspace_id.as_str(),
            EditableField::Dataset => self.dataset.as_str(),
            EditableField::CohortSelectionQuery => self.cohort_selection_query.as_str(),
        }
    }

    fn set_field(&mut self, field: EditableField, value: String) {
        match field {
            EditableField::ProjectId => self.project_id = value,
            EditableField::ProjectName => self.project_name = value,
            EditableField::Description => self.description = value,
            EditableField::Title => self.title = value,
            EditableField::WorkspaceId => self.workspace_id = value,
            EditableField::Dataset => self.dataset = value,
            EditableField::CohortSelectionQuery => self.cohort_selection_query = value,
        }
    }

    /// Applies an incoming change, recording a field-level diff.
    ///
    /// Fields absent from `incoming` are skipped; an identical document
    /// yields an entry with an empty field map. Status is never touched
    /// here.
    pub fn apply_details(
        &mut self,
        incoming: &RequestDetails,
        actor: UserIdentity,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> AuditEntry {
        let mut updated_fields = BTreeMap::new();

        for field in EditableField::ALL {
            let Some(incoming_value) = incoming.value(field) else {
                continue;
            };

            if self.field(field) != incoming_value {
                updated_fields.insert(
                    field.as_str().to_owned(),
                    FieldChange {
                        from: self.field(field).to_owned(),
                        to: incoming_value.to_owned(),
                    },
                );
                self.set_field(field, incoming_value.to_owned());
            }
        }

        self.append_entry(AuditEntry {
            updated_by: actor,
            updated_when: now,
            updated_fields,
            comment,
        })
    }

    /// Applies a reviewer status transition, recording it in the entry.
    ///
    /// Fails with `InvalidTransition` when the move is not in the transition
    /// table. This is the only path that records a status change.
    pub fn apply_transition(
        &mut self,
        next: RequestStatus,
        actor: UserIdentity,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<AuditEntry> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition(format!(
                "request '{}' cannot move from {} to {}",
                self.id, self.status, next
            )));
        }

        let mut updated_fields = BTreeMap::new();
        updated_fields.insert(
            "status".to_owned(),
            FieldChange {
                from: self.status.as_str().to_owned(),
                to: next.as_str().to_owned(),
            },
        );
        self.status = next;

        Ok(self.append_entry(AuditEntry {
            updated_by: actor,
            updated_when: now,
            updated_fields,
            comment,
        }))
    }

    /// Appends a free-text comment entry with an empty field map.
    pub fn append_comment(
        &mut self,
        actor: UserIdentity,
        comment: String,
        now: DateTime<Utc>,
    ) -> AuditEntry {
        self.append_entry(AuditEntry {
            updated_by: actor,
            updated_when: now,
            updated_fields: BTreeMap::new(),
            comment: Some(comment),
        })
    }

    /// Resets status to `Pending` after a requestor edit, resubmitting the
    /// request for review. Bypasses the reviewer transition table and is not
    /// recorded as a field change.
    pub fn resubmit(&mut self) {
        self.status = RequestStatus::Pending;
    }

    fn append_entry(&mut self, entry: AuditEntry) -> AuditEntry {
        self.updates.push(entry.clone());
        entry
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, Utc};
    use proptest::prelude::*;
    use reqora_core::{RequestId, Role, UserIdentity};

    use super::{AccessRequest, RequestDetails};
    use crate::status::RequestStatus;

    fn researcher() -> UserIdentity {
        UserIdentity::new(
            "obj-researcher",
            "Rosa Chen",
            vec![Role::Researcher],
            "rosa.chen@example.nhs.uk",
            "https://login.example.com/tenant",
        )
    }

    fn manager() -> UserIdentity {
        UserIdentity::new(
            "obj-manager",
            "Miriam Okafor",
            vec![Role::DataManager],
            "miriam.okafor@example.nhs.uk",
            "https://login.example.com/tenant",
        )
    }

    fn details() -> RequestDetails {
        RequestDetails {
            project_id: Some("P1".to_owned()),
            project_name: Some("Sepsis Outcomes".to_owned()),
            description: Some("Readmission rates for the sepsis cohort".to_owned()),
            title: Some("Cohort X".to_owned()),
            workspace_id: Some("ws-42".to_owned()),
            dataset: Some("inpatient_admissions".to_owned()),
            cohort_selection_query: Some("SELECT person_id FROM cohort".to_owned()),
        }
    }

    fn sample_request() -> AccessRequest {
        AccessRequest::new(
            RequestId::new(),
            researcher(),
            details(),
            BTreeMap::new(),
            Utc::now(),
        )
    }

    #[test]
    fn new_request_is_pending_with_empty_history() {
        let request = sample_request();
        assert_eq!(request.status(), RequestStatus::Pending);
        assert!(request.updates().is_empty());
        assert_eq!(request.title(), "Cohort X");
    }

    #[test]
    fn identical_incoming_document_yields_empty_diff() {
        let mut request = sample_request();
        let entry = request.apply_details(&details(), researcher(), None, Utc::now());
        assert!(entry.updated_fields().is_empty());
        assert_eq!(request.updates().len(), 1);
    }

    #[test]
    fn diff_records_old_and_new_value_and_mutates_the_request() {
        let mut request = sample_request();
        let incoming = RequestDetails {
            description: Some("new text".to_owned()),
            ..RequestDetails::default()
        };

        let entry = request.apply_details(&incoming, researcher(), None, Utc::now());

        assert_eq!(entry.updated_fields().len(), 1);
        let change = entry.updated_fields().get("description");
        assert!(change.is_some_and(|change| {
            change.from == "Readmission rates for the sepsis cohort" && change.to == "new text"
        }));
        assert_eq!(request.description(), "new text");
    }

    #[test]
    fn reapplying_the_same_document_is_idempotent() {
        let mut request = sample_request();
        let incoming = RequestDetails {
            title: Some("Cohort Y".to_owned()),
            ..RequestDetails::default()
        };

        let first = request.apply_details(&incoming, researcher(), None, Utc::now());
        let second = request.apply_details(&incoming, researcher(), None, Utc::now());

        assert_eq!(first.updated_fields().len(), 1);
        assert!(second.updated_fields().is_empty());
    }

    #[test]
    fn absent_fields_are_skipped_by_the_diff() {
        let mut request = sample_request();
        let entry = request.apply_details(
            &RequestDetails::default(),
            researcher(),
            None,
            Utc::now(),
        );
        assert!(entry.updated_fields().is_empty());
        assert_eq!(request.dataset(), "inpatient_admissions");
    }

    #[test]
    fn comment_only_entry_serializes_with_an_empty_field_map() {
        let mut request = sample_request();
        request.append_comment(manager(), "Please narrow the cohort".to_owned(), Utc::now());

        let serialized = serde_json::to_value(&request);
        assert!(serialized.is_ok());
        let document = serialized.unwrap_or_default();
        let fields = document
            .get("updates")
            .and_then(|updates| updates.get(0))
            .and_then(|entry| entry.get("updated_fields"));
        assert_eq!(fields, Some(&serde_json::json!({})));
    }

    #[test]
    fn transition_records_status_change_and_comment() {
        let mut request = sample_request();
        let entry = request.apply_transition(
            RequestStatus::InReview,
            manager(),
            Some("Looks plausible".to_owned()),
            Utc::now(),
        );

        assert!(entry.is_ok());
        let entry = entry.unwrap_or_else(|_| unreachable!());
        let change = entry.updated_fields().get("status");
        assert!(change.is_some_and(|change| change.from == "Pending" && change.to == "InReview"));
        assert_eq!(entry.comment(), Some("Looks plausible"));
        assert_eq!(request.status(), RequestStatus::InReview);
    }

    #[test]
    fn illegal_transition_is_rejected_and_leaves_no_trace() {
        let mut request = sample_request();
        let result =
            request.apply_transition(RequestStatus::Completed, manager(), None, Utc::now());

        assert!(result.is_err());
        assert_eq!(request.status(), RequestStatus::Pending);
        assert!(request.updates().is_empty());
    }

    #[test]
    fn resubmit_resets_status_without_an_entry() {
        let mut request = sample_request();
        let transitioned =
            request.apply_transition(RequestStatus::Rejected, manager(), None, Utc::now());
        assert!(transitioned.is_ok());

        request.resubmit();
        assert_eq!(request.status(), RequestStatus::Pending);
        assert_eq!(request.updates().len(), 1);
    }

    #[test]
    fn updates_are_append_only_and_non_decreasing_in_time() {
        let mut request = sample_request();
        let start = Utc::now();

        request.append_comment(researcher(), "first".to_owned(), start);
        request.apply_details(
            &RequestDetails {
                title: Some("Cohort Z".to_owned()),
                ..RequestDetails::default()
            },
            researcher(),
            None,
            start + Duration::seconds(1),
        );
        let transitioned = request.apply_transition(
            RequestStatus::Approved,
            manager(),
            None,
            start + Duration::seconds(2),
        );
        assert!(transitioned.is_ok());

        assert_eq!(request.updates().len(), 3);
        for window in request.updates().windows(2) {
            assert!(window[0].updated_when() <= window[1].updated_when());
        }
    }

    proptest! {
        #[test]
        fn second_application_of_any_document_is_empty(
            title in ".{0,40}",
            description in ".{0,40}",
            dataset in ".{0,40}",
        ) {
            let mut request = sample_request();
            let incoming = RequestDetails {
                title: Some(title),
                description: Some(description),
                dataset: Some(dataset),
                ..RequestDetails::default()
            };

            request.apply_details(&incoming, researcher(), None, Utc::now());
            let second = request.apply_details(&incoming, researcher(), None, Utc::now());
            assert!(second.updated_fields().is_empty());
        }
    }
}
