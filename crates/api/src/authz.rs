//! Request-side authorization guard.
//!
//! Handlers call this before touching the store; the decision itself comes
//! from the static policy table in `clientele-auth`.

use clientele_auth::{AuthzError, Operation, authorize_operation};

use crate::context::PrincipalContext;

/// Check `op` against the policy table for the current request principal.
///
/// Hands the principal back on success; `None` only for public operations.
pub fn authorize_request<'a>(
    principal: Option<&'a PrincipalContext>,
    op: Operation,
) -> Result<Option<&'a PrincipalContext>, AuthzError> {
    let result = authorize_operation(principal.map(PrincipalContext::principal), op);

    if let Err(e) = &result {
        tracing::info!(
            operation = %op,
            subject = principal.map(PrincipalContext::subject).unwrap_or("<anonymous>"),
            "authorization denied: {e}"
        );
    }

    result.map(|()| principal)
}
