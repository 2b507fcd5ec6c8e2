//! # Token Keeper Core
//!
//! Token lifecycle logic for opaque bearer tokens backed by a TTL-aware
//! key-value store. This crate contains the token value object, the store
//! contract, error types, and the lifecycle manager.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
