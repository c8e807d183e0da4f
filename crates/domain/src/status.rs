use serde::{Deserialize, Serialize};

/// Review status of a data-access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Saved by the requestor but not yet submitted.
    Draft,
    /// Submitted and waiting for a data manager to pick it up.
    Pending,
    /// Under active review by a data manager.
    InReview,
    /// Rejected by a data manager.
    Rejected,
    /// Approved; the provisioning pipeline has been (or is being) triggered.
    Approved,
    /// Provisioning finished and the dataset is available in the workspace.
    Completed,
}

impl RequestStatus {
    /// Returns the stable status name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::InReview => "InReview",
            Self::Rejected => "Rejected",
            Self::Approved => "Approved",
            Self::Completed => "Completed",
        }
    }

    /// Returns whether a reviewer may move a request from this status to `next`.
    ///
    /// Requestor resubmission (edit resets to `Pending`) does not go through
    /// this table.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::InReview | Self::Rejected | Self::Approved
            ) | (Self::InReview, Self::Rejected | Self::Approved)
                | (Self::Approved, Self::Completed)
        )
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}
