//! Token value generation

use uuid::Uuid;

use crate::errors::TokenError;

/// Source of fresh, collision-resistant token values
pub trait ValueGenerator: Send + Sync {
    fn generate(&self) -> Result<String, TokenError>;
}

/// Generates hyphenated version 4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl ValueGenerator for UuidGenerator {
    fn generate(&self) -> Result<String, TokenError> {
        Ok(Uuid::new_v4().to_string())
    }
}

impl<F> ValueGenerator for F
where
    F: Fn() -> Result<String, TokenError> + Send + Sync,
{
    fn generate(&self) -> Result<String, TokenError> {
        self()
    }
}
