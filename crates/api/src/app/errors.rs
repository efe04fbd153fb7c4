use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::extract::rejection::JsonRejection;
use serde_json::json;

use clientele_auth::{AuthzError, LoginError, TokenValidationError};
use clientele_core::DomainError;
use clientele_infra::CustomerStoreError;

/// Every failure a handler (or the bearer middleware) can report.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Token(#[from] TokenValidationError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Store(#[from] CustomerStoreError),

    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Login(LoginError::InvalidCredentials) => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            ApiError::Login(LoginError::Signing(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "token_issue_failed"),
            ApiError::Token(e) => (StatusCode::UNAUTHORIZED, e.code()),
            ApiError::Authz(AuthzError::Unauthenticated) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            ApiError::Authz(AuthzError::Forbidden { .. }) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::Store(CustomerStoreError::Conflict(_)) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Store(CustomerStoreError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Store(CustomerStoreError::Unavailable(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable")
            }
            ApiError::InvalidRequest { status, .. } => (*status, "invalid_request"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::InvalidRequest {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, "request failed: {self}");
        }

        let mut response = json_error(status, code, self.to_string());
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
        }
        response
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
