// SqlValue <-> SQLite binding and row decoding

use crate::error::map_sqlx_error;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};
use tablemap_core::domain::{SqlValue, StorageRecord};
use tablemap_core::error::Result;

/// Bind positional parameters in order
pub(crate) fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<i64>),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Real(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Blob(b) => query.bind(b.clone()),
        };
    }
    query
}

/// Decode a row by each value's runtime storage class
///
/// Declared column types do not matter here: SQLite stores DATE/DATETIME as
/// text and BOOLEAN as integer, and those come back as such.
pub(crate) fn decode_row(row: &SqliteRow) -> Result<StorageRecord> {
    let mut record = StorageRecord::with_capacity(row.len());

    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index).map_err(map_sqlx_error)?;

        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            match raw.type_info().name() {
                "NULL" => SqlValue::Null,
                "INTEGER" | "BOOLEAN" => {
                    SqlValue::Integer(row.try_get_unchecked::<i64, _>(index).map_err(map_sqlx_error)?)
                }
                "REAL" => SqlValue::Real(row.try_get_unchecked::<f64, _>(index).map_err(map_sqlx_error)?),
                "BLOB" => {
                    SqlValue::Blob(row.try_get_unchecked::<Vec<u8>, _>(index).map_err(map_sqlx_error)?)
                }
                _ => SqlValue::Text(row.try_get_unchecked::<String, _>(index).map_err(map_sqlx_error)?),
            }
        };

        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;

    #[tokio::test]
    async fn test_decode_row_by_storage_class() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let row = sqlx::query("SELECT 1 AS i, 2.5 AS r, 'x' AS t, x'0102' AS b, NULL AS n")
            .fetch_one(&pool)
            .await
            .unwrap();

        let record = decode_row(&row).unwrap();
        assert_eq!(record["i"], SqlValue::Integer(1));
        assert_eq!(record["r"], SqlValue::Real(2.5));
        assert_eq!(record["t"], SqlValue::Text("x".to_string()));
        assert_eq!(record["b"], SqlValue::Blob(vec![1, 2]));
        assert_eq!(record["n"], SqlValue::Null);

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["i", "r", "t", "b", "n"]);
    }

    #[tokio::test]
    async fn test_bind_params_in_order() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let params = vec![
            SqlValue::Integer(7),
            SqlValue::Text("seven".to_string()),
            SqlValue::Null,
        ];

        let row = bind_params(sqlx::query("SELECT ? AS a, ? AS b, ? AS c"), &params)
            .fetch_one(&pool)
            .await
            .unwrap();

        let record = decode_row(&row).unwrap();
        assert_eq!(record.values().cloned().collect::<Vec<_>>(), params);
    }
}
