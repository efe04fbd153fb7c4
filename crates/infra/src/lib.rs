//! Infrastructure adapters.
//!
//! Storage implementations behind the traits the API depends on.

pub mod customer_store;

pub use customer_store::{CustomerStore, CustomerStoreError, InMemoryCustomerStore};
