//! Static operation → role policy table.
//!
//! Every authorization rule of the service lives in [`policy_for`]; request
//! handlers never branch on roles themselves.

use crate::{AuthzError, Principal, Role, RolePolicy, authorize};

/// Operations exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    WhoAmI,
    ListCustomers,
    GetCustomer,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Login,
        Operation::WhoAmI,
        Operation::ListCustomers,
        Operation::GetCustomer,
        Operation::CreateCustomer,
        Operation::UpdateCustomer,
        Operation::DeleteCustomer,
    ];

    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "auth.login",
            Operation::WhoAmI => "auth.whoami",
            Operation::ListCustomers => "customers.list",
            Operation::GetCustomer => "customers.get",
            Operation::CreateCustomer => "customers.create",
            Operation::UpdateCustomer => "customers.update",
            Operation::DeleteCustomer => "customers.delete",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The policy table.
pub fn policy_for(op: Operation) -> RolePolicy {
    match op {
        Operation::Login => RolePolicy::Public,
        Operation::WhoAmI => RolePolicy::Authenticated,
        Operation::ListCustomers => RolePolicy::Authenticated,
        Operation::GetCustomer => RolePolicy::Authenticated,
        Operation::CreateCustomer => RolePolicy::Role(Role::USER),
        Operation::UpdateCustomer => RolePolicy::Role(Role::USER),
        Operation::DeleteCustomer => RolePolicy::Role(Role::ADMIN),
    }
}

/// Authorize `principal` for `op` using the policy table.
pub fn authorize_operation(principal: Option<&Principal>, op: Operation) -> Result<(), AuthzError> {
    authorize(principal, &policy_for(op))
}
