//! Process configuration, read once at startup.

use std::net::SocketAddr;

use anyhow::{Context, bail};
use chrono::Duration;

use clientele_auth::{DEFAULT_TOKEN_TTL_SECS, SigningSecret, StaticCredentials};

/// Development-only signing secret (32 bytes). Refused when `CLIENTELE_ENV=production`.
pub const DEV_JWT_SECRET: &str = "c8279fdf3b4f47eba9a604a453c2fc37";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

pub const DEFAULT_CREDENTIALS: &str = "user:password:User,admin:password:Admin";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: SigningSecret,
    pub token_ttl: Duration,
    pub credentials: StaticCredentials,
}

/// Load configuration from `.env` (if present) and the process environment.
pub fn load() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from an arbitrary key lookup.
pub fn from_lookup<F>(lookup: F) -> anyhow::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let production = lookup("CLIENTELE_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));

    let secret = match lookup("JWT_SECRET") {
        Some(secret) => secret,
        None if production => bail!("JWT_SECRET must be set when CLIENTELE_ENV=production"),
        None => {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        }
    };
    let jwt_secret = SigningSecret::new(secret.into_bytes()).context("invalid JWT_SECRET")?;

    let ttl_secs = match lookup("TOKEN_TTL_SECS") {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .with_context(|| format!("TOKEN_TTL_SECS must be an integer, got '{raw}'"))?,
        None => DEFAULT_TOKEN_TTL_SECS,
    };
    if ttl_secs <= 0 {
        bail!("TOKEN_TTL_SECS must be positive, got {ttl_secs}");
    }
    let token_ttl = Duration::try_seconds(ttl_secs)
        .with_context(|| format!("TOKEN_TTL_SECS is out of range: {ttl_secs}"))?;

    let bind_raw = lookup("CLIENTELE_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .with_context(|| format!("CLIENTELE_BIND is not a socket address: '{bind_raw}'"))?;

    let credentials = match lookup("CLIENTELE_CREDENTIALS") {
        Some(raw) => StaticCredentials::parse(&raw).context("invalid CLIENTELE_CREDENTIALS")?,
        None => StaticCredentials::parse(DEFAULT_CREDENTIALS)?,
    };

    Ok(AppConfig {
        bind_addr,
        jwt_secret,
        token_ttl,
        credentials,
    })
}
