//! Customers domain module.
//!
//! Record types only (no IO, no HTTP, no storage).

pub mod customer;

pub use customer::{Customer, CustomerDetails};
