use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use clientele_auth::{JwtValidator, TokenValidationError};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Bearer authentication for protected routes.
///
/// Rejects with 401 before any handler runs when the token is missing or
/// invalid; otherwise inserts a [`PrincipalContext`] for the handler.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(reason = e.code(), "bearer token rejected");
        e
    })?;

    tracing::debug!(subject = %claims.sub, role = %claims.role, jti = %claims.jti, "bearer token accepted");
    req.extensions_mut().insert(PrincipalContext::from_claims(claims));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, TokenValidationError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenValidationError::Missing)?;

    let header = header.to_str().map_err(|_| TokenValidationError::Malformed)?.trim();

    // Any other scheme (e.g. Basic) presents no bearer token at all.
    let Some((scheme, token)) = header.split_once(' ') else {
        return Err(TokenValidationError::Missing);
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenValidationError::Missing);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(TokenValidationError::Missing);
    }

    Ok(token)
}
