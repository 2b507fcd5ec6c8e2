//! Common utility functions

pub mod logging;

pub use logging::{init_tracing, LoggingError};
