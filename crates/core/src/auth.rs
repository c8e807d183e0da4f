use serde::{Deserialize, Serialize};

/// Application role carried by an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Reviewer role authorized to transition request status.
    DataManager,
    /// Researcher role submitting data-access requests.
    Researcher,
}

impl Role {
    /// Returns the stable role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataManager => "DataManager",
            Self::Researcher => "Researcher",
        }
    }

    /// Resolves a role from its stable name, ignoring unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DataManager" => Some(Self::DataManager),
            "Researcher" => Some(Self::Researcher),
            _ => None,
        }
    }
}

/// Authenticated identity supplied by the identity provider.
///
/// Immutable once embedded in a request or audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    object_id: String,
    display_name: String,
    roles: Vec<Role>,
    preferred_username: String,
    issuer: String,
}

impl UserIdentity {
    /// Creates a user identity from identity-provider claims.
    #[must_use]
    pub fn new(
        object_id: impl Into<String>,
        display_name: impl Into<String>,
        roles: Vec<Role>,
        preferred_username: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            display_name: display_name.into(),
            roles,
            preferred_username: preferred_username.into(),
            issuer: issuer.into(),
        }
    }

    /// Creates the synthetic identity that authors system-generated audit entries.
    #[must_use]
    pub fn system() -> Self {
        Self {
            object_id: "system".to_owned(),
            display_name: "System".to_owned(),
            roles: Vec::new(),
            preferred_username: "System".to_owned(),
            issuer: String::new(),
        }
    }

    /// Returns the stable subject identifier from the identity provider.
    #[must_use]
    pub fn object_id(&self) -> &str {
        self.object_id.as_str()
    }

    /// Returns the display name for the identity.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the roles granted to the identity.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        self.roles.as_slice()
    }

    /// Returns the preferred username claim.
    #[must_use]
    pub fn preferred_username(&self) -> &str {
        self.preferred_username.as_str()
    }

    /// Returns the token issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        self.issuer.as_str()
    }

    /// Returns whether the identity holds a role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
