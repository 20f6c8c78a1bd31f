//! Backend-neutral query plans.
//!
//! A plan is the conjunction of validated filter clauses plus, for list
//! queries, a deterministic ordering and an offset/limit window. Listing and
//! counting build their plans from the same clause validation, so a count
//! always describes the same set a list pages through.

use crate::academic::{Entity, EntityKind};

use super::{FilterClause, FilterError, PageRequest};

/// Column every listing is ordered by. Identities are unique, so the order is
/// total and pages never overlap.
pub const ORDER_KEY: &str = "id";

/// Offset/limit slice applied after ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    entity: EntityKind,
    clauses: Vec<FilterClause>,
    window: Option<Window>,
}

impl QueryPlan {
    /// Plan for one page of `E` matching every clause.
    pub fn page<E: Entity>(filters: &[FilterClause], page: PageRequest) -> Result<Self, FilterError> {
        let mut plan = Self::conjunction::<E>(filters)?;
        plan.window = Some(Window {
            offset: page.offset(),
            limit: page.limit(),
        });
        Ok(plan)
    }

    /// Plan for counting every `E` matching the clauses. No window.
    pub fn count<E: Entity>(filters: &[FilterClause]) -> Result<Self, FilterError> {
        Self::conjunction::<E>(filters)
    }

    fn conjunction<E: Entity>(filters: &[FilterClause]) -> Result<Self, FilterError> {
        for clause in filters {
            if !E::FIELDS.contains(&clause.field()) {
                return Err(FilterError::UnknownField {
                    entity: E::KIND,
                    field: clause.field().to_string(),
                });
            }
        }

        Ok(Self {
            entity: E::KIND,
            clauses: filters.to_vec(),
            window: None,
        })
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn order_by(&self) -> &'static str {
        ORDER_KEY
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }
}
