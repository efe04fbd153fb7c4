use chrono::{DateTime, Utc};
use uuid::Uuid;

use clientele_auth::{JwtClaims, Principal, Role};

/// Principal context for a request (authenticated identity + role).
///
/// Inserted into request extensions by the bearer middleware once the token
/// has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
    token_id: Uuid,
}

impl PrincipalContext {
    pub fn from_claims(claims: JwtClaims) -> Self {
        let token_id = claims.jti;
        Self {
            principal: Principal::from(claims),
            token_id,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn subject(&self) -> &str {
        &self.principal.subject
    }

    pub fn role(&self) -> &Role {
        &self.principal.role
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.principal.expires_at
    }

    pub fn token_id(&self) -> Uuid {
        self.token_id
    }
}
