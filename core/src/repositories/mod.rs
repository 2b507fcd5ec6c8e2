pub mod token;

pub use token::{RemainingTtl, TokenStore};

#[cfg(test)]
pub use token::MockTokenStore;
