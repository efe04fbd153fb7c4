//! `clientele-core`: shared domain primitives.
//!
//! Pure types only: no IO, no HTTP, no storage.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::CustomerId;
