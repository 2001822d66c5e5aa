use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Auth failure modes. Each variant is bound to a machine-readable code, an
/// HTTP status, and the exact description surfaced to the caller.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingAuthorization,
    #[error("Authorization header must start with \"Bearer\".")]
    InvalidScheme,
    #[error("Token not found.")]
    MissingToken,
    #[error("Authorization header must be bearer token.")]
    MalformedAuthorization,
    #[error("Authorization malformed.")]
    MalformedTokenHeader,
    #[error("Unable to find the appropriate key.")]
    UnknownKeyId,
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    #[error("Unable to parse authentication token.")]
    MalformedToken,
    #[error("Permissions not included in JWT.")]
    MissingPermissions,
    #[error("Permission not found.")]
    PermissionDenied,
    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(String),
    #[error("failed to parse JWKS response: {0}")]
    JwksDecode(String),
    #[error("JWKS entry missing key id (kid)")]
    JwksMissingKid,
    #[error("JWKS document repeats key id '{0}'")]
    JwksDuplicateKid(String),
    #[error("JWKS key '{0}' missing required RSA components")]
    JwksMissingComponents(String),
    #[error("JWKS key '{kid}' uses unsupported key type '{kty}'")]
    JwksUnsupportedKey { kid: String, kty: String },
    #[error("JWKS key '{kid}' uses unsupported alg '{alg}'")]
    JwksUnsupportedAlg { kid: String, alg: String },
    #[error("failed to parse decoding key for kid '{0}': {1}")]
    KeyParse(String, String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization => "authorization_header_missing",
            AuthError::InvalidScheme
            | AuthError::MissingToken
            | AuthError::MalformedAuthorization
            | AuthError::MalformedTokenHeader
            | AuthError::UnknownKeyId
            | AuthError::MalformedToken => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::MissingPermissions => "invalid_claims",
            AuthError::PermissionDenied => "unauthorized",
            AuthError::JwksFetch(_)
            | AuthError::JwksDecode(_)
            | AuthError::JwksMissingKid
            | AuthError::JwksDuplicateKid(_)
            | AuthError::JwksMissingComponents(_)
            | AuthError::JwksUnsupportedKey { .. }
            | AuthError::JwksUnsupportedAlg { .. }
            | AuthError::KeyParse(_, _) => "jwks_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthorization
            | AuthError::InvalidScheme
            | AuthError::MissingToken
            | AuthError::MalformedAuthorization
            | AuthError::MalformedTokenHeader
            | AuthError::TokenExpired
            | AuthError::InvalidClaims
            | AuthError::PermissionDenied => StatusCode::UNAUTHORIZED,
            AuthError::UnknownKeyId
            | AuthError::MalformedToken
            | AuthError::MissingPermissions => StatusCode::BAD_REQUEST,
            AuthError::JwksFetch(_)
            | AuthError::JwksDecode(_)
            | AuthError::JwksMissingKid
            | AuthError::JwksDuplicateKid(_)
            | AuthError::JwksMissingComponents(_)
            | AuthError::JwksUnsupportedKey { .. }
            | AuthError::JwksUnsupportedAlg { .. }
            | AuthError::KeyParse(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(code) {
            resp.headers_mut().insert("X-Error-Code", value);
        }
        resp
    }
}
