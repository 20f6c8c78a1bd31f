use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key-value operations of the external cache service.
///
/// Implementations are injected into the cache-aside decorator, so a fake can
/// stand in for the real backend in tests.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
