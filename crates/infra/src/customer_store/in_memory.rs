use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use clientele_core::CustomerId;
use clientele_customers::{Customer, CustomerDetails};

use super::{CustomerStore, CustomerStoreError};

/// In-memory customer store.
///
/// A `Vec` keeps insertion order for `list`; the `RwLock` gives readers a
/// consistent snapshot and serializes writers.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    inner: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store. Later duplicates of an id are dropped.
    pub fn with_customers(seed: impl IntoIterator<Item = Customer>) -> Self {
        let mut records: Vec<Customer> = Vec::new();
        for customer in seed {
            if records.iter().any(|c| c.id == customer.id) {
                tracing::warn!(id = %customer.id, "duplicate customer id in seed; keeping the first");
                continue;
            }
            records.push(customer);
        }
        Self {
            inner: RwLock::new(records),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Customer>>, CustomerStoreError> {
        self.inner
            .read()
            .map_err(|_| CustomerStoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Customer>>, CustomerStoreError> {
        self.inner
            .write()
            .map_err(|_| CustomerStoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl CustomerStore for InMemoryCustomerStore {
    fn list(&self) -> Result<Vec<Customer>, CustomerStoreError> {
        Ok(self.read()?.clone())
    }

    fn get(&self, id: CustomerId) -> Result<Customer, CustomerStoreError> {
        self.read()?
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(CustomerStoreError::NotFound(id))
    }

    fn create(&self, customer: Customer) -> Result<Customer, CustomerStoreError> {
        let mut records = self.write()?;
        if records.iter().any(|c| c.id == customer.id) {
            return Err(CustomerStoreError::Conflict(customer.id));
        }
        records.push(customer.clone());
        tracing::info!(id = %customer.id, "customer created");
        Ok(customer)
    }

    fn update(&self, id: CustomerId, details: CustomerDetails) -> Result<Customer, CustomerStoreError> {
        let mut records = self.write()?;
        let record = records
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CustomerStoreError::NotFound(id))?;
        record.apply(details);
        tracing::info!(id = %id, "customer updated");
        Ok(record.clone())
    }

    fn delete(&self, id: CustomerId) -> Result<(), CustomerStoreError> {
        let mut records = self.write()?;
        let pos = records
            .iter()
            .position(|c| c.id == id)
            .ok_or(CustomerStoreError::NotFound(id))?;
        records.remove(pos);
        tracing::info!(id = %id, "customer deleted");
        Ok(())
    }
}
