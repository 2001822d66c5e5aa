use crate::claims::ClaimPayload;
use crate::error::{AuthError, AuthResult};

/// Confirms `required` is present in the payload's permission list.
pub fn check_permission(required: &str, claims: &ClaimPayload) -> AuthResult<()> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::MissingPermissions)?;

    if permissions.iter().any(|value| value == required) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}

/// Call-site wrapper around [`check_permission`]: an empty requirement means
/// the route is open to any verified caller and the payload is not consulted.
pub fn ensure_permission(required: &str, claims: &ClaimPayload) -> AuthResult<()> {
    if required.is_empty() {
        return Ok(());
    }
    check_permission(required, claims)
}
