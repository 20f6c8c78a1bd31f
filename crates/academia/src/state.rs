//! Application state wiring.
//!
//! Builds one SQLite store shared by the three entity kinds, wraps it in the
//! cache-aside decorator for the enabled cache backend, and exposes one
//! application service per kind.

use std::sync::Arc;

use academia_core::academic::{Faculty, Specialty, University};

use crate::service::AcademicService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub universities: AcademicService<University>,
    pub faculties: AcademicService<Faculty>,
    pub specialties: AcademicService<Specialty>,
}

#[cfg(feature = "memory")]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::Config;
    use crate::storage::{CachedRepository, SqliteRepository};

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let retry = config.retry_policy()?;
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let memory_cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            Ok(Self {
                universities: AcademicService::new(
                    Arc::new(CachedRepository::<University, _, _>::new(
                        sqlite_repo.clone(),
                        memory_cache.clone(),
                        config.cache_ttl(),
                    )),
                    retry,
                ),
                faculties: AcademicService::new(
                    Arc::new(CachedRepository::<Faculty, _, _>::new(
                        sqlite_repo.clone(),
                        memory_cache.clone(),
                        config.cache_ttl(),
                    )),
                    retry,
                ),
                specialties: AcademicService::new(
                    Arc::new(CachedRepository::<Specialty, _, _>::new(
                        sqlite_repo,
                        memory_cache,
                        config.cache_ttl(),
                    )),
                    retry,
                ),
            })
        }
    }
}

#[cfg(feature = "redis")]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::config::Config;
    use crate::storage::{CachedRepository, SqliteRepository};

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let retry = config.retry_policy()?;
            let sqlite_repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let redis_cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            Ok(Self {
                universities: AcademicService::new(
                    Arc::new(CachedRepository::<University, _, _>::new(
                        sqlite_repo.clone(),
                        redis_cache.clone(),
                        config.cache_ttl(),
                    )),
                    retry,
                ),
                faculties: AcademicService::new(
                    Arc::new(CachedRepository::<Faculty, _, _>::new(
                        sqlite_repo.clone(),
                        redis_cache.clone(),
                        config.cache_ttl(),
                    )),
                    retry,
                ),
                specialties: AcademicService::new(
                    Arc::new(CachedRepository::<Specialty, _, _>::new(
                        sqlite_repo,
                        redis_cache,
                        config.cache_ttl(),
                    )),
                    retry,
                ),
            })
        }
    }
}
