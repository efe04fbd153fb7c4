//! Fixed credential policy.
//!
//! Stand-in for a real identity provider: a static username → (password, role)
//! table supplied at process start.

use std::collections::HashMap;

use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::Role;

/// Source of identities for the login flow.
///
/// Implementations must not reveal *why* a pair was rejected: unknown user and
/// wrong password are indistinguishable to the caller.
pub trait IdentityProvider: Send + Sync {
    /// Returns the role for a matching `(username, password)` pair.
    fn authenticate(&self, username: &str, password: &str) -> Option<Role>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialParseError {
    #[error("credential entry '{0}' must look like username:password:Role")]
    InvalidEntry(String),

    #[error("duplicate username '{0}' in credential table")]
    DuplicateUser(String),

    #[error("credential table is empty")]
    Empty,
}

#[derive(Clone)]
struct Entry {
    password: String,
    role: Role,
}

/// In-memory credential table; immutable after construction.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    entries: HashMap<String, Entry>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A later entry for the same username replaces
    /// the earlier one.
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        self.entries.insert(
            username.into(),
            Entry {
                password: password.into(),
                role,
            },
        );
        self
    }

    /// Parse `user:password:Role` entries separated by commas.
    pub fn parse(table: &str) -> Result<Self, CredentialParseError> {
        let mut creds = Self::new();
        for raw in table.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            // Passwords may contain ':'; the username ends at the first one
            // and the role starts after the last one.
            let Some((user, rest)) = raw.split_once(':') else {
                return Err(CredentialParseError::InvalidEntry(raw.to_string()));
            };
            let Some((password, role)) = rest.rsplit_once(':') else {
                return Err(CredentialParseError::InvalidEntry(raw.to_string()));
            };
            if user.is_empty() || password.is_empty() || role.is_empty() {
                return Err(CredentialParseError::InvalidEntry(raw.to_string()));
            }
            if creds.entries.contains_key(user) {
                return Err(CredentialParseError::DuplicateUser(user.to_string()));
            }
            creds = creds.with_user(user, password, Role::new(role.to_string()));
        }
        if creds.entries.is_empty() {
            return Err(CredentialParseError::Empty);
        }
        Ok(creds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl core::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut users: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        users.sort_unstable();
        f.debug_struct("StaticCredentials")
            .field("users", &users)
            .finish_non_exhaustive()
    }
}

impl IdentityProvider for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        if username.is_empty() || password.is_empty() {
            return None;
        }
        let entry = self.entries.get(username)?;
        let matches: bool = entry.password.as_bytes().ct_eq(password.as_bytes()).into();
        matches.then(|| entry.role.clone())
    }
}
