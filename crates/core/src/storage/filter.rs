//! Typed filter clauses.
//!
//! A clause is `{field, op, value}`. Operators are an enum, so unknown
//! operator strings fail when the clause is parsed, and the value shape is
//! checked against the operator at construction. Field names are checked
//! later, against the entity's whitelist, when a query plan is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::academic::EntityKind;

/// Errors raised while building filter clauses or query plans.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),
    #[error("Filter field must not be empty")]
    EmptyField,
    #[error("Unknown field '{field}' for {entity}")]
    UnknownField { entity: EntityKind, field: String },
    #[error("Invalid value for '{field}' with operator '{op}': {reason}")]
    InvalidValue {
        field: String,
        op: FilterOperator,
        reason: &'static str,
    },
}

/// Comparison applied by a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// Store-native pattern match (`%` and `_` wildcards).
    Like,
    /// Case-insensitive pattern match.
    ILike,
    IsNull,
    IsNotNull,
    In,
    NotIn,
}

impl FilterOperator {
    /// Returns the canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "==",
            FilterOperator::Ne => "!=",
            FilterOperator::Gt => ">",
            FilterOperator::Ge => ">=",
            FilterOperator::Lt => "<",
            FilterOperator::Le => "<=",
            FilterOperator::Like => "like",
            FilterOperator::ILike => "ilike",
            FilterOperator::IsNull => "is_null",
            FilterOperator::IsNotNull => "is_not_null",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not_in",
        }
    }

    /// Returns true for operators that do not look at the clause value.
    pub fn is_unary(&self) -> bool {
        matches!(self, FilterOperator::IsNull | FilterOperator::IsNotNull)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "eq" => Ok(FilterOperator::Eq),
            "!=" | "ne" => Ok(FilterOperator::Ne),
            ">" | "gt" => Ok(FilterOperator::Gt),
            ">=" | "ge" => Ok(FilterOperator::Ge),
            "<" | "lt" => Ok(FilterOperator::Lt),
            "<=" | "le" => Ok(FilterOperator::Le),
            "like" => Ok(FilterOperator::Like),
            "ilike" => Ok(FilterOperator::ILike),
            "is_null" => Ok(FilterOperator::IsNull),
            "is_not_null" => Ok(FilterOperator::IsNotNull),
            "in" => Ok(FilterOperator::In),
            "not_in" => Ok(FilterOperator::NotIn),
            other => Err(FilterError::UnknownOperator(other.to_string())),
        }
    }
}

impl TryFrom<String> for FilterOperator {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

/// A single `{field, op, value}` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFilterClause")]
pub struct FilterClause {
    field: String,
    op: FilterOperator,
    value: Value,
}

#[derive(Deserialize)]
struct RawFilterClause {
    field: String,
    op: FilterOperator,
    #[serde(default)]
    value: Value,
}

impl TryFrom<RawFilterClause> for FilterClause {
    type Error = FilterError;

    fn try_from(raw: RawFilterClause) -> Result<Self, Self::Error> {
        FilterClause::new(raw.field, raw.op, raw.value)
    }
}

impl FilterClause {
    /// Builds a clause, checking the value shape against the operator.
    pub fn new(
        field: impl Into<String>,
        op: FilterOperator,
        value: Value,
    ) -> Result<Self, FilterError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(FilterError::EmptyField);
        }
        check_value(&field, op, &value)?;
        Ok(Self { field, op, value })
    }

    /// Shorthand for an equality clause.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Result<Self, FilterError> {
        Self::new(field, FilterOperator::Eq, value.into())
    }

    /// Shorthand for a case-insensitive pattern clause.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Result<Self, FilterError> {
        Self::new(field, FilterOperator::ILike, Value::String(pattern.into()))
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn op(&self) -> FilterOperator {
        self.op
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

fn check_value(field: &str, op: FilterOperator, value: &Value) -> Result<(), FilterError> {
    let reason = match op {
        FilterOperator::IsNull | FilterOperator::IsNotNull => return Ok(()),
        FilterOperator::Like | FilterOperator::ILike if value.is_string() => return Ok(()),
        FilterOperator::Like | FilterOperator::ILike => "expected a string pattern",
        FilterOperator::In | FilterOperator::NotIn => match value {
            Value::Array(items) if items.iter().all(is_scalar) => return Ok(()),
            _ => "expected an array of non-null scalars",
        },
        _ if is_scalar(value) => return Ok(()),
        _ => "expected a non-null scalar",
    };

    Err(FilterError::InvalidValue {
        field: field.to_string(),
        op,
        reason,
    })
}

/// How a `{key: value}` shorthand map is turned into clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShorthandMode {
    /// `key == value`
    #[default]
    Exact,
    /// `key ilike "%value%"`
    Contains,
}

impl ShorthandMode {
    /// Builds the clause for one `key: value` pair.
    pub fn clause(self, field: impl Into<String>, value: Value) -> Result<FilterClause, FilterError> {
        match self {
            ShorthandMode::Exact => FilterClause::new(field, FilterOperator::Eq, value),
            ShorthandMode::Contains => {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                FilterClause::ilike(field, format!("%{text}%"))
            }
        }
    }
}

/// Converts simple `key = value` filters into typed clauses, one per pair.
///
/// Pairs are visited in input order. A repeated key yields one clause per
/// occurrence, so the conjunction narrows instead of replacing.
pub fn clauses_from_shorthand<K: Into<String>>(
    filters: impl IntoIterator<Item = (K, Value)>,
    mode: ShorthandMode,
) -> Result<Vec<FilterClause>, FilterError> {
    filters
        .into_iter()
        .map(|(field, value)| mode.clause(field, value))
        .collect()
}
