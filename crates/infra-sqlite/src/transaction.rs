// Statement execution inside an open SQLite transaction

use crate::error::map_sqlx_error;
use crate::value::{bind_params, decode_row};
use futures::TryStreamExt;
use sqlx::{Either, Executor, SqliteConnection};
use tablemap_core::domain::{ResultSet, Statement};
use tablemap_core::error::Result;

/// Execute one statement on the transaction's connection
///
/// Rows and the completion summary arrive on the same stream, so row-returning
/// DML (`... RETURNING`) reports both its rows and its change count.
pub(crate) async fn execute_statement(
    conn: &mut SqliteConnection,
    statement: &Statement,
) -> Result<ResultSet> {
    let query = bind_params(sqlx::query(&statement.sql), &statement.params);
    let mut steps = (&mut *conn).fetch_many(query);

    let mut result = ResultSet::default();
    let mut last_insert_rowid = None;
    while let Some(step) = steps.try_next().await.map_err(map_sqlx_error)? {
        match step {
            Either::Left(done) => {
                result.rows_affected += done.rows_affected();
                last_insert_rowid = Some(done.last_insert_rowid());
            }
            Either::Right(row) => result.rows.push(decode_row(&row)?),
        }
    }

    // SQLite keeps the last rowid per connection; only an insert makes it ours
    if is_insert(&statement.sql) {
        result.last_insert_id = last_insert_rowid;
    }

    Ok(result)
}

fn is_insert(sql: &str) -> bool {
    let keyword = sql
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    keyword.eq_ignore_ascii_case("INSERT") || keyword.eq_ignore_ascii_case("REPLACE")
}
