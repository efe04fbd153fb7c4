//! Customer record storage.

pub mod in_memory;

pub use in_memory::InMemoryCustomerStore;

use std::sync::Arc;

use clientele_core::CustomerId;
use clientele_customers::{Customer, CustomerDetails};

/// Customer store abstraction.
///
/// Implementations are shared across concurrent requests: every write must be
/// exclusive with every other operation, so no read observes a partial write.
pub trait CustomerStore: Send + Sync {
    /// All records, in insertion order.
    fn list(&self) -> Result<Vec<Customer>, CustomerStoreError>;

    fn get(&self, id: CustomerId) -> Result<Customer, CustomerStoreError>;

    /// Insert a new record; fails with `Conflict` if the id is taken.
    fn create(&self, customer: Customer) -> Result<Customer, CustomerStoreError>;

    /// Replace the mutable fields of an existing record.
    fn update(&self, id: CustomerId, details: CustomerDetails) -> Result<Customer, CustomerStoreError>;

    /// Remove a record. Deleting an absent id is `NotFound`, every time.
    fn delete(&self, id: CustomerId) -> Result<(), CustomerStoreError>;
}

/// Customer store error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerStoreError {
    #[error("customer {0} already exists")]
    Conflict(CustomerId),
    #[error("customer {0} not found")]
    NotFound(CustomerId),
    #[error("customer store unavailable: {0}")]
    Unavailable(String),
}

impl<S> CustomerStore for Arc<S>
where
    S: CustomerStore + ?Sized,
{
    fn list(&self) -> Result<Vec<Customer>, CustomerStoreError> {
        (**self).list()
    }

    fn get(&self, id: CustomerId) -> Result<Customer, CustomerStoreError> {
        (**self).get(id)
    }

    fn create(&self, customer: Customer) -> Result<Customer, CustomerStoreError> {
        (**self).create(customer)
    }

    fn update(&self, id: CustomerId, details: CustomerDetails) -> Result<Customer, CustomerStoreError> {
        (**self).update(id, details)
    }

    fn delete(&self, id: CustomerId) -> Result<(), CustomerStoreError> {
        (**self).delete(id)
    }
}
