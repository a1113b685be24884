// SELECT statements and the filter predicate DSL

use crate::domain::{Predicate, QueryOptions, SqlValue, Where, DEFAULT_PRIMARY_KEY};
use crate::error::Result;

/// Single row by id
pub fn find(table_name: &str) -> String {
    find_by_key(table_name, DEFAULT_PRIMARY_KEY)
}

/// Single row by the value of `key_column` (a key column or `rowid`)
pub fn find_by_key(table_name: &str, key_column: &str) -> String {
    format!("SELECT * FROM {} WHERE {} = ? LIMIT 1;", table_name, key_column)
}

/// Filtered, ordered, optionally paginated SELECT
///
/// ```text
/// SELECT <columns> FROM <table> [WHERE ...] ORDER BY <order> [LIMIT <n> OFFSET <m>]
/// ```
///
/// Parameters are the values of `options.filter`, in map order.
///
/// # Errors
/// `AppError::InvalidPredicate` when a filter key has an unknown operator.
pub fn query(table_name: &str, options: &QueryOptions) -> Result<String> {
    let (where_statement, _) = query_where(&options.filter)?;

    let mut parts: Vec<String> = vec![
        "SELECT".to_string(),
        options.columns.clone(),
        "FROM".to_string(),
        table_name.to_string(),
        where_statement,
    ];

    if !options.order.is_empty() {
        parts.push("ORDER BY".to_string());
        parts.push(options.order.clone());
    }

    if let Some(offset) = options.offset() {
        parts.push("LIMIT".to_string());
        parts.push(options.limit.to_string());
        parts.push("OFFSET".to_string());
        parts.push(offset.to_string());
    }

    Ok(parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}

/// `"<column>_<operator>"` -> `"<column> <sql operator>"`
///
/// e.g. `numero_eq` -> `numero =`, `codigo_verificacao_cont` -> `codigo_verificacao LIKE`
pub fn property_operation(key: &str) -> Result<String> {
    Ok(Predicate::parse(key)?.to_string())
}

/// WHERE clause of a predicate map plus its parameters, both in map order
///
/// An empty map yields an empty clause.
pub fn query_where(filter: &Where) -> Result<(String, Vec<SqlValue>)> {
    if filter.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut conditions = Vec::with_capacity(filter.len());
    let mut params = Vec::with_capacity(filter.len());
    for (key, value) in filter {
        conditions.push(format!("{} ?", property_operation(key)?));
        params.push(value.clone());
    }

    Ok((format!("WHERE {}", conditions.join(" AND ")), params))
}
