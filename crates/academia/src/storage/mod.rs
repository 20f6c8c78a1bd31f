//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `Repository` trait
//! defined in `academia_core::storage`:
//!
//! - `sqlite`: the system of record, using `rusqlite` and `tokio-rusqlite`
//! - `cached`: a cache-aside decorator over any repository

pub mod cached;
pub mod sqlite;

pub use cached::CachedRepository;
pub use sqlite::SqliteRepository;
