//! Business services containing domain logic and use cases.

pub mod token;

pub use token::{TokenManager, UuidGenerator, ValueGenerator};
