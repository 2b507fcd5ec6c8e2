//! Token lifecycle module
//!
//! This module handles every token operation:
//! - Creation with a fresh random value and a minute-rounded expiry
//! - Lookup of the current token for an id
//! - Authentication of a presented token
//! - Invalidation

mod generator;
mod service;

#[cfg(test)]
mod tests;

pub use generator::{UuidGenerator, ValueGenerator};
pub use service::TokenManager;
