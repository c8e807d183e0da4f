//! Pure capability checks evaluated against a request and an authenticated
//! identity. No I/O and no side effects; callers decide how failures
//! propagate.

use reqora_core::{AppError, AppResult, Role, UserIdentity};
use reqora_domain::AccessRequest;

/// Returns whether the identity may manage requests (review and transition).
#[must_use]
pub fn can_manage(identity: &UserIdentity) -> bool {
    identity.has_role(Role::DataManager)
}

/// Returns whether the identity may read a request.
#[must_use]
pub fn can_view(identity: &UserIdentity, request: &AccessRequest) -> bool {
    can_manage(identity) || identity.object_id() == request.requestor().object_id()
}

/// Returns whether the identity may edit a request's details.
///
/// Ownership compares the stable object id of the stored requestor
/// snapshot, so later display-name or username drift does not revoke edit
/// rights.
#[must_use]
pub fn can_edit(identity: &UserIdentity, request: &AccessRequest) -> bool {
    identity.object_id() == request.requestor().object_id()
}

/// Ensures the identity may manage requests.
pub fn require_manage(identity: &UserIdentity) -> AppResult<()> {
    if can_manage(identity) {
        return Ok(());
    }

    Err(AppError::Unauthorized(format!(
        "user '{}' is not a DataManager",
        identity.object_id()
    )))
}

/// Ensures the identity may read the request.
pub fn require_view(identity: &UserIdentity, request: &AccessRequest) -> AppResult<()> {
    if can_view(identity, request) {
        return Ok(());
    }

    Err(AppError::Unauthorized(format!(
        "user '{}' is not a DataManager nor the original requestor of request '{}'",
        identity.object_id(),
        request.id()
    )))
}

/// Ensures the identity may edit the request's details.
pub fn require_edit(identity: &UserIdentity, request: &AccessRequest) -> AppResult<()> {
    if can_edit(identity, request) {
        return Ok(());
    }

    Err(AppError::Unauthorized(format!(
        "user '{}' is not the original requestor of request '{}'",
        identity.object_id(),
        request.id()
    )))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use reqora_core::{RequestId, Role, UserIdentity};
    use reqora_domain::{AccessRequest, RequestDetails};

    use super::{can_edit, can_manage, can_view, require_edit, require_view};

    fn request_owned_by(object_id: &str) -> AccessRequest {
        let requestor = UserIdentity::new(
            object_id,
            "Rosa Chen",
            vec![Role::Researcher],
            "rosa.chen@example.nhs.uk",
            "https://login.example.com/tenant",
        );
        AccessRequest::new(
            RequestId::new(),
            requestor,
            RequestDetails::default(),
            BTreeMap::new(),
            Utc::now(),
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

    #[test]
    fn manager_can_view_but_not_edit_other_requests() {
        let request = request_owned_by("obj-researcher");
        let manager = manager();

        assert!(can_manage(&manager));
        assert!(can_view(&manager, &request));
        assert!(!can_edit(&manager, &request));
    }

    #[test]
    fn owner_can_view_and_edit_without_manager_role() {
        let request = request_owned_by("obj-researcher");
        let owner = UserIdentity::new(
            "obj-researcher",
            "Rosa Chen",
            vec![Role::Researcher],
            "rosa.chen@example.nhs.uk",
            "https://login.example.com/tenant",
        );

        assert!(can_view(&owner, &request));
        assert!(can_edit(&owner, &request));
    }

    #[test]
    fn ownership_survives_display_name_drift() {
        let request = request_owned_by("obj-researcher");
        let renamed = UserIdentity::new(
            "obj-researcher",
            "Rosa Chen-Alvarez",
            vec![Role::Researcher],
            "rosa.chen-alvarez@example.nhs.uk",
            "https://login.example.com/tenant",
        );

        assert!(can_edit(&renamed, &request));
    }

    #[test]
    fn stranger_is_denied_view_and_edit() {
        let request = request_owned_by("obj-researcher");
        let stranger = UserIdentity::new(
            "obj-stranger",
            "Sam Patel",
            vec![Role::Researcher],
            "sam.patel@example.nhs.uk",
            "https://login.example.com/tenant",
        );

        assert!(require_view(&stranger, &request).is_err());
        assert!(require_edit(&stranger, &request).is_err());
    }
}
