//! Domain layer containing value objects.

pub mod entities;

pub use entities::*;
