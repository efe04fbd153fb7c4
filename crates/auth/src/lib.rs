//! `clientele-auth`: authentication/authorization core.
//!
//! Decoupled from HTTP and storage: token issuing, token validation, the
//! credential policy, and role-based authorization decisions.

pub mod authorize;
pub mod claims;
pub mod credentials;
pub mod jwt;
pub mod policy;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, RolePolicy, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use credentials::{CredentialParseError, IdentityProvider, StaticCredentials};
pub use jwt::{
    DEFAULT_TOKEN_TTL_SECS, Hs256JwtValidator, IssuedToken, JwtValidator, LoginError, MIN_SECRET_LEN,
    SigningSecret, TokenConfigError, TokenService,
};
pub use policy::{Operation, authorize_operation, policy_for};
pub use principal::Principal;
pub use roles::Role;
