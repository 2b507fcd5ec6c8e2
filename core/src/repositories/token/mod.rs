mod store;

pub use store::{RemainingTtl, TokenStore};

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockTokenStore;
