//! Cache module for Redis-backed token storage
//!
//! This module provides the Redis connection and the token store adapter
//! built on top of it.

pub mod redis_client;
pub mod token_store;


pub use redis_client::RedisClient;
pub use token_store::RedisTokenStore;

// Re-export commonly used types
pub use tk_shared::config::StoreConfig;
