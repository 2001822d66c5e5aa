use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common_auth::AuthError;
use serde::Serialize;

/// Standard error envelope shared by all handlers.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest,
    NotFound,
    Unprocessable,
    Internal,
    /// Auth failures carry their own status and description.
    Auth(AuthError),
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest => (StatusCode::BAD_REQUEST, "bad_request", "bad request"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found", "resource not found"),
            ApiError::Unprocessable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable",
                "unprocessable",
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            ),
            ApiError::Auth(err) => return err.into_response(),
        };

        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: message.to_string(),
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(code) {
            resp.headers_mut().insert("X-Error-Code", value);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
