//! Application service over one entity kind.
//!
//! The service is what the CLI talks to. It runs every idempotent repository
//! call under the retry policy, retrying only transient store failures, and
//! assembles the pagination envelope for listings.

mod error;

pub use error::Result;

use std::sync::Arc;

use academia_core::academic::Entity;
use academia_core::retry::{retry_if, RetryPolicy};
use academia_core::storage::{
    DeleteOutcome, FilterClause, Page, PageRequest, Repository, RepositoryError,
};

/// Typed CRUD operations for one entity kind.
pub struct AcademicService<E: Entity> {
    repository: Arc<dyn Repository<E>>,
    retry: RetryPolicy,
}

impl<E: Entity> Clone for AcademicService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            retry: self.retry,
        }
    }
}

impl<E: Entity> AcademicService<E> {
    pub fn new(repository: Arc<dyn Repository<E>>, retry: RetryPolicy) -> Self {
        Self { repository, retry }
    }

    fn operation(name: &str) -> String {
        format!("{}.{}", E::KIND, name)
    }

    /// Returns one page of matching records plus the totals for the whole
    /// result set. Fails as a whole if either the fetch or the count fails.
    pub async fn list(&self, filters: &[FilterClause], page: PageRequest) -> Result<Page<E>> {
        tracing::info!(
            entity = E::KIND.as_str(),
            page = page.page(),
            per_page = page.per_page(),
            filters = filters.len(),
            "Listing records"
        );

        let content = retry_if(
            &self.retry,
            &Self::operation("list"),
            RepositoryError::is_transient,
            || self.repository.list(filters, page),
        )
        .await?;

        let total = retry_if(
            &self.retry,
            &Self::operation("count"),
            RepositoryError::is_transient,
            || self.repository.count(filters),
        )
        .await?;

        let page = Page::new(content, page, total);
        tracing::debug!(
            entity = E::KIND.as_str(),
            returned = page.content.len(),
            total_elements = page.total_elements,
            total_pages = page.total_pages,
            "Listed records"
        );
        Ok(page)
    }

    pub async fn get(&self, id: i64) -> Result<Option<E>> {
        tracing::info!(entity = E::KIND.as_str(), id, "Getting record");

        let record = retry_if(
            &self.retry,
            &Self::operation("get"),
            RepositoryError::is_transient,
            || self.repository.find(id),
        )
        .await?;

        tracing::debug!(entity = E::KIND.as_str(), id, found = record.is_some(), "Got record");
        Ok(record)
    }

    /// Creates a record. Runs exactly once: a retried insert could store the
    /// same payload twice under different identities.
    pub async fn create(&self, request: &E::Create) -> Result<E> {
        tracing::info!(entity = E::KIND.as_str(), "Creating record");

        let record = retry_if(
            &RetryPolicy::once(),
            &Self::operation("create"),
            RepositoryError::is_transient,
            || self.repository.create(request),
        )
        .await?;

        tracing::debug!(entity = E::KIND.as_str(), id = record.id(), "Created record");
        Ok(record)
    }

    /// Applies a partial update. `None` means the identity is unknown.
    pub async fn update(&self, id: i64, request: &E::Update) -> Result<Option<E>> {
        tracing::info!(entity = E::KIND.as_str(), id, "Updating record");

        let record = retry_if(
            &self.retry,
            &Self::operation("update"),
            RepositoryError::is_transient,
            || self.repository.update(id, request),
        )
        .await?;

        tracing::debug!(entity = E::KIND.as_str(), id, found = record.is_some(), "Updated record");
        Ok(record)
    }

    /// Deletes a record and its dependents. Unknown identities yield an
    /// empty outcome.
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        tracing::info!(entity = E::KIND.as_str(), id, "Deleting record");

        let outcome = retry_if(
            &self.retry,
            &Self::operation("delete"),
            RepositoryError::is_transient,
            || self.repository.delete(id),
        )
        .await?;

        tracing::debug!(
            entity = E::KIND.as_str(),
            id,
            removed = outcome.removed().len(),
            "Deleted record"
        );
        Ok(outcome)
    }
}
