mod error;
mod filter;
mod pagination;
mod query;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use filter::{
    clauses_from_shorthand, FilterClause, FilterError, FilterOperator, ShorthandMode,
};
pub use pagination::{total_pages, Page, PageRequest, PaginationError};
pub use query::{QueryPlan, Window, ORDER_KEY};
pub use traits::Repository;
pub use types::DeleteOutcome;
