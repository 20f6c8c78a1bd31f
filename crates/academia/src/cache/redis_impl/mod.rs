//! Redis cache backend implementation.
//!
//! Provides a shared cache using Redis, so several processes see the same
//! cached records and the same invalidations.

mod cache;
mod error;

pub use cache::RedisCache;
