use async_trait::async_trait;

use crate::academic::Entity;

use super::{DeleteOutcome, FilterClause, PageRequest, Result};

/// Persistent store for one entity kind.
///
/// Every backend (and every decorator over a backend) implements this trait,
/// so callers never depend on the concrete store.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Returns one page of records matching every clause, ordered by identity.
    async fn list(&self, filters: &[FilterClause], page: PageRequest) -> Result<Vec<E>>;

    /// Counts the records matching every clause.
    async fn count(&self, filters: &[FilterClause]) -> Result<u64>;

    /// Inserts a new record and returns it with its assigned identity.
    async fn create(&self, request: &E::Create) -> Result<E>;

    /// Gets a record by its identity.
    async fn find(&self, id: i64) -> Result<Option<E>>;

    /// Applies a partial update. Returns `None` when the identity is unknown.
    async fn update(&self, id: i64, request: &E::Update) -> Result<Option<E>>;

    /// Deletes a record and everything it owns.
    async fn delete(&self, id: i64) -> Result<DeleteOutcome>;
}
