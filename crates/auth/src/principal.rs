use chrono::{DateTime, Utc};

use crate::{JwtClaims, Role};

/// Authenticated identity resolved from a validated token.
///
/// Only ever built from claims whose signature and expiry have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl From<JwtClaims> for Principal {
    fn from(claims: JwtClaims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
            expires_at: claims.expires_at,
        }
    }
}
