//! Shared configuration and utilities for the token keeper workspace
//!
//! This crate provides common functionality used across all modules:
//! - Configuration types loaded from the environment
//! - Tracing subscriber setup

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, Environment, LogFormat, LoggingConfig, StoreConfig, TokenConfig};
pub use utils::{init_tracing, LoggingError};
