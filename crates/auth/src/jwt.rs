//! HS256 token issuing and validation.
//!
//! `TokenService` is the only producer of tokens; every protected request goes
//! through a `JwtValidator`. Both are immutable after construction and can be
//! shared across request tasks without locking.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use thiserror::Error;
use uuid::Uuid;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};
use crate::credentials::IdentityProvider;

/// Minimum HMAC secret length (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("signing secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("token ttl must be positive, got {0}s")]
    NonPositiveTtl(i64),

    #[error("token ttl of {0}s overflows the token expiry timestamp")]
    TtlOutOfRange(i64),
}

/// Process-wide symmetric signing secret.
#[derive(Clone)]
pub struct SigningSecret(Arc<[u8]>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenConfigError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(TokenConfigError::SecretTooShort {
                min: MIN_SECRET_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes.into()))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SigningSecret(<{} bytes redacted>)", self.0.len())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Unknown user or wrong password; deliberately not distinguished.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// A freshly signed token plus the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: JwtClaims,
}

/// Issues signed tokens for credential pairs accepted by an [`IdentityProvider`].
pub struct TokenService {
    identity: Arc<dyn IdentityProvider>,
    encoding: EncodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(
        secret: &SigningSecret,
        identity: Arc<dyn IdentityProvider>,
        ttl: Duration,
    ) -> Result<Self, TokenConfigError> {
        if ttl <= Duration::zero() {
            return Err(TokenConfigError::NonPositiveTtl(ttl.num_seconds()));
        }
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(TokenConfigError::TtlOutOfRange(ttl.num_seconds()));
        }
        Ok(Self {
            identity,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Check a credential pair and, on success, sign a token valid for
    /// `[now, now + ttl)` (truncated to whole seconds).
    pub fn issue(&self, username: &str, password: &str, now: DateTime<Utc>) -> Result<IssuedToken, LoginError> {
        let Some(role) = self.identity.authenticate(username, password) else {
            tracing::warn!("login rejected: invalid credentials");
            return Err(LoginError::InvalidCredentials);
        };

        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            tracing::error!(ttl_secs = self.ttl.num_seconds(), "token expiry overflows");
            LoginError::Signing("token expiry out of range".to_string())
        })?;
        let claims = JwtClaims {
            sub: username.to_string(),
            role,
            jti: Uuid::now_v7(),
            issued_at,
            expires_at,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| {
                tracing::error!("failed to encode jwt: {e}");
                LoginError::Signing(e.to_string())
            })?;

        tracing::info!(
            subject = %claims.sub,
            role = %claims.role,
            jti = %claims.jti,
            expires_at = %claims.expires_at,
            "token issued"
        );

        Ok(IssuedToken { token, claims })
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

/// Verifies a raw bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// HS256 validator bound to the process signing secret.
///
/// Signature-first: claims are only deserialized once the signature has been
/// verified, and expiry is checked against the caller-supplied `now`.
pub struct Hs256JwtValidator {
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is enforced by `validate_claims` so it can use an injected clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenValidationError::Missing);
        }

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| classify(&e))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

fn classify(err: &jsonwebtoken::errors::Error) -> TokenValidationError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenValidationError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenValidationError::Expired,
        _ => TokenValidationError::Malformed,
    }
}
