//! Cached repository decorator.
//!
//! Wraps any `Repository<E>` implementation with the cache-aside pattern.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use academia_core::academic::{Entity, EntityKind};
use academia_core::cache::{deserialize_entity, entity_key, serialize_entity, Cache};
use academia_core::storage::{DeleteOutcome, FilterClause, PageRequest, Repository, Result};

/// Cached repository decorator.
///
/// Implements the cache-aside pattern for single-record reads:
/// - **Reads by id**: Check cache first, on miss fetch from the repository and
///   populate the cache with the configured TTL
/// - **Writes**: Persist to the repository, then invalidate the cached record
///   (and every cascaded dependent on delete)
///
/// Listing, counting and creating go straight to the repository. Cache
/// failures never fail an operation: a failed read is a miss and a failed
/// write or invalidation is logged.
///
/// # Type Parameters
///
/// * `E` - The entity kind
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedRepository<E, R, C>
where
    E: Entity,
    R: Repository<E>,
    C: Cache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Duration,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R, C> CachedRepository<E, R, C>
where
    E: Entity,
    R: Repository<E>,
    C: Cache,
{
    /// Creates a new cached repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for cached records
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
            _entity: PhantomData,
        }
    }

    async fn populate(&self, key: &str, record: &E) {
        let bytes = match serialize_entity(record) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to serialize record for cache");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, &bytes, Some(self.ttl)).await {
            tracing::warn!(key = %key, error = %err, "Failed to cache record");
        }
    }

    async fn invalidate(&self, kind: EntityKind, id: i64) {
        let key = entity_key(kind, id);
        if let Err(err) = self.cache.delete(&key).await {
            tracing::warn!(key = %key, error = %err, "Failed to invalidate cached record");
        }
    }
}

#[async_trait]
impl<E, R, C> Repository<E> for CachedRepository<E, R, C>
where
    E: Entity,
    R: Repository<E> + 'static,
    C: Cache + 'static,
{
    async fn list(&self, filters: &[FilterClause], page: PageRequest) -> Result<Vec<E>> {
        self.repository.list(filters, page).await
    }

    async fn count(&self, filters: &[FilterClause]) -> Result<u64> {
        self.repository.count(filters).await
    }

    async fn create(&self, request: &E::Create) -> Result<E> {
        let record = self.repository.create(request).await?;
        tracing::debug!(entity = E::KIND.as_str(), id = record.id(), "Record created");
        Ok(record)
    }

    async fn find(&self, id: i64) -> Result<Option<E>> {
        let kind = E::KIND;
        let cache_key = entity_key(kind, id);

        // Check cache first
        match self.cache.get(&cache_key).await {
            Ok(Some(bytes)) => match deserialize_entity::<E>(&bytes) {
                Ok(record) => {
                    tracing::trace!(entity = %kind, id, "Cache hit");
                    return Ok(Some(record));
                }
                // Undecodable value - treat as cache miss
                Err(err) => {
                    tracing::warn!(entity = %kind, id, error = %err, "Cached record could not be decoded");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(entity = %kind, id, error = %err, "Cache read failed");
            }
        }

        // Cache miss - fetch from repository
        tracing::trace!(entity = %kind, id, "Cache miss");
        let record = self.repository.find(id).await?;

        // Populate cache on hit only; absence is never cached
        if let Some(ref r) = record {
            self.populate(&cache_key, r).await;
        }

        Ok(record)
    }

    async fn update(&self, id: i64, request: &E::Update) -> Result<Option<E>> {
        // 1. Persist to storage
        let updated = self.repository.update(id, request).await?;

        // 2. Invalidate cache (will be repopulated on next read)
        if updated.is_some() {
            self.invalidate(E::KIND, id).await;
        }

        tracing::debug!(entity = E::KIND.as_str(), id, found = updated.is_some(), "Record updated");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        // 1. Persist deletion to storage
        let outcome = self.repository.delete(id).await?;

        // 2. Invalidate the record and everything removed with it
        for &(kind, removed_id) in outcome.removed() {
            self.invalidate(kind, removed_id).await;
        }

        tracing::debug!(
            entity = E::KIND.as_str(),
            id,
            removed = outcome.removed().len(),
            "Record deleted"
        );
        Ok(outcome)
    }
}
