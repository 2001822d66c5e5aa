use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

use crate::claims::ClaimPayload;
use crate::error::{AuthError, AuthResult};
use crate::guards::ensure_permission;
use crate::verifier::JwtVerifier;

/// Verified claims for the current request. Extraction runs the full chain:
/// bearer token out of the headers, then signature and claim verification.
/// Permission enforcement stays explicit at the handler via [`AuthContext::require`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: ClaimPayload,
    pub token: String,
}

impl AuthContext {
    pub fn require(&self, permission: &str) -> AuthResult<()> {
        ensure_permission(permission, &self.claims)
    }

    pub fn into_claims(self) -> ClaimPayload {
        self.claims
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<JwtVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<JwtVerifier>::from_ref(state);
        let token = bearer_token(&parts.headers)?;
        let claims = verifier.verify(&token).await?;

        Ok(Self { claims, token })
    }
}

/// Obtains the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<String> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?;
    let raw = value
        .to_str()
        .map_err(|_| AuthError::MalformedAuthorization)?;

    let parts: Vec<&str> = raw.split_whitespace().collect();

    let scheme = parts.first().ok_or(AuthError::InvalidScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }

    match parts.len() {
        1 => Err(AuthError::MissingToken),
        2 => Ok(parts[1].to_owned()),
        _ => Err(AuthError::MalformedAuthorization),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn accepts_valid_bearer_token() {
        let token = bearer_token(&headers_with("Bearer abc.def.ghi")).expect("token");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        let token = bearer_token(&headers_with("bEaReR abc.def.ghi")).expect("token");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_header() {
        let err = bearer_token(&HeaderMap::new()).expect_err("should reject");
        assert!(matches!(err, AuthError::MissingAuthorization));
    }

    #[test]
    fn rejects_wrong_scheme() {
        let err = bearer_token(&headers_with("Basic credentials")).expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidScheme));
    }

    #[test]
    fn rejects_scheme_without_token() {
        let err = bearer_token(&headers_with("Bearer")).expect_err("should reject");
        assert!(matches!(err, AuthError::MissingToken));

        let err = bearer_token(&headers_with("Bearer   ")).expect_err("should reject");
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[test]
    fn rejects_embedded_whitespace() {
        let err = bearer_token(&headers_with("Bearer abc def")).expect_err("should reject");
        assert!(matches!(err, AuthError::MalformedAuthorization));
    }

    #[test]
    fn rejects_empty_value() {
        let err = bearer_token(&headers_with("")).expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidScheme));
    }
}
