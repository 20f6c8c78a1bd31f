//! Cached repository decorator.
//!
//! This module provides a decorator that wraps any `Repository<E>` with
//! caching behavior. The decorator implements the cache-aside pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and populate cache
//! - **Writes**: Persist to repository, then invalidate the cached records
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let repo = Arc::new(SqliteRepository::new("academia.db").await?);
//! let cache = Arc::new(MemoryCache::new(NonZeroUsize::new(10_000).unwrap()));
//!
//! let faculties: CachedRepository<Faculty, _, _> =
//!     CachedRepository::new(repo, cache, Duration::from_secs(30));
//! ```

mod repository;

pub use repository::CachedRepository;
