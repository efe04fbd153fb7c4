use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod customers;
pub mod system;

/// Routes reachable without a token.
pub fn public_router() -> Router {
    Router::new().route("/api/auth/login", post(auth::login))
}

/// Routes behind the bearer middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .nest("/api/customers", customers::router())
}
