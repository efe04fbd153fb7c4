use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};
use chrono::Utc;

use clientele_auth::{AuthzError, Operation};

use crate::app::{dto, errors::ApiError, services::AppServices};
use crate::authz::authorize_request;
use crate::context::PrincipalContext;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> Result<Json<dto::LoginResponse>, ApiError> {
    authorize_request(None, Operation::Login)?;
    let Json(body) = body?;

    let issued = services.tokens.issue(&body.username, &body.password, Utc::now())?;

    Ok(Json(dto::LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.claims.expires_at,
    }))
}

pub async fn whoami(
    principal: Option<Extension<PrincipalContext>>,
) -> Result<Json<dto::WhoAmIResponse>, ApiError> {
    // WhoAmI is never public, so a granted request always carries a principal.
    let principal = authorize_request(principal.as_deref(), Operation::WhoAmI)?
        .ok_or(AuthzError::Unauthenticated)?;

    Ok(Json(dto::WhoAmIResponse {
        subject: principal.subject().to_string(),
        role: principal.role().to_string(),
        token_id: principal.token_id().to_string(),
        expires_at: principal.expires_at(),
    }))
}
