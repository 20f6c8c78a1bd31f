//! Renders backend-neutral query plans into parameterized SQLite statements.
//!
//! Values are always bound as `?` parameters, never spliced into the SQL.
//! Identifiers come from the entity field whitelist and are double-quoted.

use academia_core::storage::{FilterClause, FilterError, FilterOperator, QueryPlan, RepositoryError};
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::{Value, ValueRef};

/// SQL function used by `ilike`. The built-in `LOWER` only folds ASCII, so
/// `FÍSICA` would never match `física` through it.
pub const FOLD_CASE: &str = "fold_case";

/// Registers [`FOLD_CASE`] on a connection. Text is lowercased with Unicode
/// rules; every other value passes through unchanged.
pub fn register_fold_case(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_CASE,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        fold_case,
    )
}

fn fold_case(ctx: &Context<'_>) -> rusqlite::Result<Value> {
    Ok(match ctx.get_raw(0) {
        ValueRef::Text(text) => Value::Text(String::from_utf8_lossy(text).to_lowercase()),
        other => other.into(),
    })
}

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// `SELECT <columns> FROM <table> [WHERE ...] ORDER BY "id" ASC [LIMIT ? OFFSET ?]`
pub fn render_select(
    plan: &QueryPlan,
    table: &str,
    columns: &str,
) -> Result<RenderedQuery, RepositoryError> {
    let mut params = Vec::new();
    let mut sql = format!("SELECT {columns} FROM {table}");
    push_where(&mut sql, &mut params, plan.clauses())?;
    sql.push_str(&format!(" ORDER BY {} ASC", quote(plan.order_by())));

    if let Some(window) = plan.window() {
        sql.push_str(" LIMIT ? OFFSET ?");
        params.push(Value::Integer(clamp(window.limit)));
        params.push(Value::Integer(clamp(window.offset)));
    }

    Ok(RenderedQuery { sql, params })
}

/// `SELECT COUNT(*) FROM <table> [WHERE ...]`
pub fn render_count(plan: &QueryPlan, table: &str) -> Result<RenderedQuery, RepositoryError> {
    let mut params = Vec::new();
    let mut sql = format!("SELECT COUNT(*) FROM {table}");
    push_where(&mut sql, &mut params, plan.clauses())?;
    Ok(RenderedQuery { sql, params })
}

fn push_where(
    sql: &mut String,
    params: &mut Vec<Value>,
    clauses: &[FilterClause],
) -> Result<(), RepositoryError> {
    if clauses.is_empty() {
        return Ok(());
    }

    let conditions = clauses
        .iter()
        .map(|clause| render_condition(clause, params))
        .collect::<Result<Vec<_>, _>>()?;

    sql.push_str(" WHERE ");
    sql.push_str(&conditions.join(" AND "));
    Ok(())
}

fn render_condition(
    clause: &FilterClause,
    params: &mut Vec<Value>,
) -> Result<String, RepositoryError> {
    let column = quote(clause.field());

    let comparison = match clause.op() {
        FilterOperator::Eq => "=",
        FilterOperator::Ne => "!=",
        FilterOperator::Gt => ">",
        FilterOperator::Ge => ">=",
        FilterOperator::Lt => "<",
        FilterOperator::Le => "<=",
        FilterOperator::Like => "LIKE",
        FilterOperator::IsNull => return Ok(format!("{column} IS NULL")),
        FilterOperator::IsNotNull => return Ok(format!("{column} IS NOT NULL")),
        FilterOperator::ILike => {
            params.push(to_sql_value(clause, clause.value())?);
            return Ok(format!("{FOLD_CASE}({column}) LIKE {FOLD_CASE}(?)"));
        }
        FilterOperator::In | FilterOperator::NotIn => return render_membership(clause, params),
    };

    params.push(to_sql_value(clause, clause.value())?);
    Ok(format!("{column} {comparison} ?"))
}

fn render_membership(
    clause: &FilterClause,
    params: &mut Vec<Value>,
) -> Result<String, RepositoryError> {
    let negated = clause.op() == FilterOperator::NotIn;
    let items = clause.value().as_array().ok_or_else(|| unsupported(clause))?;

    // An empty set matches nothing, so its negation matches everything.
    if items.is_empty() {
        return Ok(if negated { "1 = 1" } else { "0 = 1" }.to_string());
    }

    for item in items {
        params.push(to_sql_value(clause, item)?);
    }
    let placeholders = vec!["?"; items.len()].join(", ");
    let keyword = if negated { "NOT IN" } else { "IN" };
    Ok(format!("{} {keyword} ({placeholders})", quote(clause.field())))
}

fn to_sql_value(clause: &FilterClause, value: &serde_json::Value) -> Result<Value, RepositoryError> {
    match value {
        serde_json::Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Real))
            .ok_or_else(|| unsupported(clause)),
        serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
        _ => Err(unsupported(clause)),
    }
}

fn unsupported(clause: &FilterClause) -> RepositoryError {
    RepositoryError::InvalidFilter(FilterError::InvalidValue {
        field: clause.field().to_string(),
        op: clause.op(),
        reason: "value cannot be bound as a SQL parameter",
    })
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn clamp(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use academia_core::academic::{Faculty, Specialty, University};
    use academia_core::storage::PageRequest;
    use serde_json::json;

    fn clause(field: &str, op: FilterOperator, value: serde_json::Value) -> FilterClause {
        FilterClause::new(field, op, value).unwrap()
    }

    #[test]
    fn test_select_without_filters() {
        let plan = QueryPlan::page::<University>(&[], PageRequest::new(1, 10).unwrap()).unwrap();

        let rendered = render_select(&plan, "universities", "\"id\"").unwrap();

        assert_eq!(
            rendered.sql,
            r#"SELECT "id" FROM universities ORDER BY "id" ASC LIMIT ? OFFSET ?"#
        );
        assert_eq!(rendered.params, vec![Value::Integer(10), Value::Integer(0)]);
    }

    #[test]
    fn test_conjunction_of_clauses() {
        let filters = vec![
            clause("name", FilterOperator::Eq, json!("Fisica")),
            clause("university_id", FilterOperator::Ge, json!(2)),
        ];
        let plan = QueryPlan::page::<Faculty>(&filters, PageRequest::new(3, 5).unwrap()).unwrap();

        let rendered = render_select(&plan, "faculties", "*").unwrap();

        assert_eq!(
            rendered.sql,
            r#"SELECT * FROM faculties WHERE "name" = ? AND "university_id" >= ? ORDER BY "id" ASC LIMIT ? OFFSET ?"#
        );
        assert_eq!(
            rendered.params,
            vec![
                Value::Text("Fisica".to_string()),
                Value::Integer(2),
                Value::Integer(5),
                Value::Integer(10),
            ]
        );
    }

    #[test]
    fn test_ilike_lowercases_both_sides() {
        let filters = vec![clause("name", FilterOperator::ILike, json!("%SIST%"))];
        let plan = QueryPlan::count::<Specialty>(&filters).unwrap();

        let rendered = render_count(&plan, "specialties").unwrap();

        assert_eq!(
            rendered.sql,
            r#"SELECT COUNT(*) FROM specialties WHERE fold_case("name") LIKE fold_case(?)"#
        );
        assert_eq!(rendered.params, vec![Value::Text("%SIST%".to_string())]);
    }

    #[test]
    fn test_fold_case_handles_accented_text() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        register_fold_case(&conn).unwrap();

        let folded: String = conn
            .query_row("SELECT fold_case('FÍSICA Ñandú')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "física ñandú");

        let number: i64 = conn
            .query_row("SELECT fold_case(42)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(number, 42);

        let null: Option<String> = conn
            .query_row("SELECT fold_case(NULL)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }

    #[test]
    fn test_null_checks_bind_nothing() {
        let filters = vec![
            clause("note", FilterOperator::IsNull, json!(null)),
            clause("letter", FilterOperator::IsNotNull, json!(null)),
        ];
        let plan = QueryPlan::count::<Specialty>(&filters).unwrap();

        let rendered = render_count(&plan, "specialties").unwrap();

        assert!(rendered.sql.ends_with(r#""note" IS NULL AND "letter" IS NOT NULL"#));
        assert!(rendered.params.is_empty());
    }

    #[test]
    fn test_in_list() {
        let filters = vec![clause("id", FilterOperator::In, json!([1, 2, 3]))];
        let plan = QueryPlan::count::<University>(&filters).unwrap();

        let rendered = render_count(&plan, "universities").unwrap();

        assert!(rendered.sql.ends_with(r#""id" IN (?, ?, ?)"#));
        assert_eq!(rendered.params.len(), 3);
    }

    #[test]
    fn test_empty_in_matches_nothing_and_empty_not_in_matches_everything() {
        let empty_in = vec![clause("id", FilterOperator::In, json!([]))];
        let empty_not_in = vec![clause("id", FilterOperator::NotIn, json!([]))];

        let none = render_count(&QueryPlan::count::<University>(&empty_in).unwrap(), "u").unwrap();
        let all =
            render_count(&QueryPlan::count::<University>(&empty_not_in).unwrap(), "u").unwrap();

        assert!(none.sql.ends_with("WHERE 0 = 1"));
        assert!(all.sql.ends_with("WHERE 1 = 1"));
    }

    #[test]
    fn test_booleans_and_floats_are_bound() {
        let filters = vec![
            clause("id", FilterOperator::Ne, json!(true)),
            clause("id", FilterOperator::Lt, json!(2.5)),
        ];
        let plan = QueryPlan::count::<University>(&filters).unwrap();

        let rendered = render_count(&plan, "universities").unwrap();

        assert_eq!(rendered.params, vec![Value::Integer(1), Value::Real(2.5)]);
    }

    #[test]
    fn test_count_has_no_window() {
        let plan = QueryPlan::count::<Faculty>(&[]).unwrap();
        let rendered = render_count(&plan, "faculties").unwrap();
        assert_eq!(rendered.sql, "SELECT COUNT(*) FROM faculties");
    }

    #[test]
    fn test_quote_escapes_quotes() {
        assert_eq!(quote("type"), "\"type\"");
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
    }
}
