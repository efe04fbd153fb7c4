use std::sync::Arc;

use clientele_auth::{Hs256JwtValidator, JwtValidator, TokenService};
use clientele_infra::CustomerStore;

use crate::config::AppConfig;

/// Shared objects every handler works against.
///
/// Built once at startup (or once per test) and handed to the router; nothing
/// here is a process global.
#[derive(Clone)]
pub struct AppServices {
    pub tokens: Arc<TokenService>,
    pub validator: Arc<dyn JwtValidator>,
    pub customers: Arc<dyn CustomerStore>,
}

impl AppServices {
    pub fn new(
        tokens: Arc<TokenService>,
        validator: Arc<dyn JwtValidator>,
        customers: Arc<dyn CustomerStore>,
    ) -> Self {
        Self {
            tokens,
            validator,
            customers,
        }
    }

    /// Wire token issuing/validation from configuration around `customers`.
    pub fn from_config(config: &AppConfig, customers: Arc<dyn CustomerStore>) -> anyhow::Result<Self> {
        let tokens = TokenService::new(
            &config.jwt_secret,
            Arc::new(config.credentials.clone()),
            config.token_ttl,
        )?;
        let validator = Hs256JwtValidator::new(&config.jwt_secret);

        tracing::info!(
            ttl_secs = config.token_ttl.num_seconds(),
            users = config.credentials.len(),
            "auth services configured"
        );

        Ok(Self::new(Arc::new(tokens), Arc::new(validator), customers))
    }
}
