use thiserror::Error;

use crate::{Principal, Role};

/// Role requirement attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePolicy {
    /// No token needed.
    Public,

    /// Any validated token, whatever its role.
    Authenticated,

    /// Exact role match. No hierarchy: `Admin` does not satisfy `User`.
    Role(Role),

    /// Exact match against any of the listed roles.
    AnyOf(&'static [Role]),
}

impl core::fmt::Display for RolePolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RolePolicy::Public => f.write_str("public"),
            RolePolicy::Authenticated => f.write_str("any authenticated role"),
            RolePolicy::Role(role) => write!(f, "role '{role}'"),
            RolePolicy::AnyOf(roles) => {
                let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
                write!(f, "one of roles {names:?}")
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: requires {required}, token has role '{actual}'")]
    Forbidden { required: String, actual: Role },
}

/// Decide whether `principal` satisfies `policy`.
///
/// - No IO
/// - No panics
/// - `None` means no validated token was presented
pub fn authorize(principal: Option<&Principal>, policy: &RolePolicy) -> Result<(), AuthzError> {
    if *policy == RolePolicy::Public {
        return Ok(());
    }

    let principal = principal.ok_or(AuthzError::Unauthenticated)?;

    let granted = match policy {
        RolePolicy::Public | RolePolicy::Authenticated => true,
        RolePolicy::Role(required) => principal.role == *required,
        RolePolicy::AnyOf(roles) => roles.contains(&principal.role),
    };

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            required: policy.to_string(),
            actual: principal.role.clone(),
        })
    }
}
