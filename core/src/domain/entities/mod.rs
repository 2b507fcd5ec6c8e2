//! Domain entities representing core business objects.

pub mod token;

pub use token::{round_to_minute, Token};
