use axum::Json;
use axum::extract::Extension;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqora_core::{AppError, Role, UserIdentity};
use serde::Deserialize;

use crate::dto::IdentityResponse;

/// Header injected by the upstream auth proxy: base64-encoded JSON token
/// claims for the authenticated caller.
pub const PRINCIPAL_HEADER: &str = "x-auth-principal";

#[derive(Debug, Deserialize)]
struct PrincipalClaims {
    oid: String,
    name: String,
    #[serde(default)]
    roles: Vec<String>,
    preferred_username: String,
    #[serde(default)]
    iss: String,
}

/// Decodes the proxy principal header into an authenticated identity.
///
/// Role names the application does not know are ignored.
pub fn identity_from_principal_header(value: &str) -> Result<UserIdentity, AppError> {
    let decoded = STANDARD.decode(value).map_err(|error| {
        AppError::Unauthorized(format!("invalid principal header encoding: {error}"))
    })?;

    let claims: PrincipalClaims = serde_json::from_slice(&decoded).map_err(|error| {
        AppError::Unauthorized(format!("invalid principal header payload: {error}"))
    })?;

    let roles: Vec<Role> = claims
        .roles
        .iter()
        .filter_map(|name| Role::from_name(name))
        .collect();

    Ok(UserIdentity::new(
        claims.oid,
        claims.name,
        roles,
        claims.preferred_username,
        claims.iss,
    ))
}

pub async fn me_handler(Extension(user): Extension<UserIdentity>) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(&user))
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use reqora_core::Role;

    use super::identity_from_principal_header;

    #[test]
    fn decodes_claims_and_filters_unknown_roles() {
        let claims = serde_json::json!({
            "oid": "obj-researcher",
            "name": "Rosa Chen",
            "roles": ["Researcher", "GlobalAdmin"],
            "preferred_username": "rosa.chen@example.nhs.uk",
            "iss": "https://login.example.com/tenant"
        });
        let header = STANDARD.encode(claims.to_string());

        let identity = identity_from_principal_header(&header);
        assert!(identity.is_ok());
        let identity = identity.unwrap_or_else(|_| unreachable!());
        assert_eq!(identity.object_id(), "obj-researcher");
        assert_eq!(identity.roles(), &[Role::Researcher]);
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(identity_from_principal_header("not-base64!").is_err());

        let not_json = STANDARD.encode("plain text");
        assert!(identity_from_principal_header(&not_json).is_err());
    }
}
