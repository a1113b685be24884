// Execution Layer - builds statements and runs them through the engine port

use crate::domain::{
    Columns, QueryOptions, ResultSet, SqlValue, Statement, StorageRecord, Where, DEFAULT_PRIMARY_KEY,
};
use crate::error::{AppError, Result};
use crate::port::SqlConnection;
use crate::query_builder;
use std::sync::Arc;
use tracing::{debug, trace};

// SQLite's implicit row id; also the value of an INTEGER PRIMARY KEY
const ROWID: &str = "rowid";

/// Runs one table's statements against a shared engine handle
///
/// Works on storage records only; logical values are the repository's concern.
pub struct DatabaseLayer {
    connection: Arc<dyn SqlConnection>,
    table_name: String,
}

impl DatabaseLayer {
    pub fn new(connection: Arc<dyn SqlConnection>, table_name: impl Into<String>) -> Self {
        Self {
            connection,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Execute every statement inside one transaction
    ///
    /// All statements take effect or none do; the first engine error is
    /// returned unchanged. Result `i` belongs to statement `i`.
    pub async fn execute_bulk_sql(&self, statements: Vec<Statement>) -> Result<Vec<ResultSet>> {
        debug!(
            table = %self.table_name,
            statements = statements.len(),
            "Executing SQL batch"
        );
        for statement in &statements {
            trace!(sql = %statement.sql, params = statement.params.len(), "Queued statement");
        }

        let results = self.connection.execute_batch(&statements).await?;

        if results.len() != statements.len() {
            return Err(AppError::Database(format!(
                "Engine returned {} results for {} statements",
                results.len(),
                statements.len()
            )));
        }

        Ok(results)
    }

    /// Single-statement [`execute_bulk_sql`](Self::execute_bulk_sql)
    pub async fn execute_sql(&self, statement: Statement) -> Result<ResultSet> {
        self.execute_bulk_sql(vec![statement])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Engine returned no result".to_string()))
    }

    pub async fn create_table(&self, columns: &Columns) -> Result<bool> {
        let sql = query_builder::create_table(&self.table_name, columns);
        self.execute_sql(Statement::bare(sql)).await?;
        Ok(true)
    }

    pub async fn drop_table(&self) -> Result<bool> {
        let sql = query_builder::drop_table(&self.table_name);
        self.execute_sql(Statement::bare(sql)).await?;
        Ok(true)
    }

    /// Insert, then read the stored row back by the engine-assigned rowid
    ///
    /// The returned row reflects generated and defaulted columns, whatever
    /// the key column is called.
    pub async fn insert(&self, record: &StorageRecord) -> Result<Option<StorageRecord>> {
        let sql = query_builder::insert(&self.table_name, record);
        let params = record.values().cloned().collect();
        let result = self.execute_sql(Statement::new(sql, params)).await?;

        match result.last_insert_id {
            Some(rowid) => self.find_by_key(ROWID, rowid).await,
            None => Ok(None),
        }
    }

    /// Parameters: every non-key property, then the key value
    pub async fn update(
        &self,
        record: &StorageRecord,
        primary_key: &str,
        key_value: impl Into<SqlValue>,
    ) -> Result<ResultSet> {
        let sql = query_builder::update(&self.table_name, record, primary_key);
        let mut params: Vec<SqlValue> = query_builder::assignments(record, primary_key)
            .map(|(_, value)| value.clone())
            .collect();
        params.push(key_value.into());

        self.execute_sql(Statement::new(sql, params)).await
    }

    /// One INSERT OR REPLACE per record, submitted as a single atomic batch
    pub async fn bulk_insert_or_replace(&self, records: &[StorageRecord]) -> Result<Vec<ResultSet>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let statements = records
            .iter()
            .map(|record| {
                Statement::new(
                    query_builder::insert_or_replace(&self.table_name, record),
                    record.values().cloned().collect(),
                )
            })
            .collect();

        self.execute_bulk_sql(statements).await
    }

    pub async fn destroy(&self, id: impl Into<SqlValue>) -> Result<bool> {
        self.destroy_by_key(DEFAULT_PRIMARY_KEY, id).await
    }

    pub async fn destroy_by_key(
        &self,
        key_column: &str,
        key_value: impl Into<SqlValue>,
    ) -> Result<bool> {
        let sql = query_builder::destroy_by_key(&self.table_name, key_column);
        self.execute_sql(Statement::new(sql, vec![key_value.into()])).await?;
        Ok(true)
    }

    pub async fn destroy_all(&self) -> Result<bool> {
        let sql = query_builder::destroy_all(&self.table_name);
        self.execute_sql(Statement::bare(sql)).await?;
        Ok(true)
    }

    pub async fn find(&self, id: impl Into<SqlValue>) -> Result<Option<StorageRecord>> {
        self.find_by_key(DEFAULT_PRIMARY_KEY, id).await
    }

    pub async fn find_by_key(
        &self,
        key_column: &str,
        key_value: impl Into<SqlValue>,
    ) -> Result<Option<StorageRecord>> {
        let sql = query_builder::find_by_key(&self.table_name, key_column);
        let result = self.execute_sql(Statement::new(sql, vec![key_value.into()])).await?;
        Ok(result.first_row())
    }

    /// First row matching `filter` under the default ordering
    pub async fn find_by(&self, filter: &Where) -> Result<Option<StorageRecord>> {
        // page 1 so the builder actually emits LIMIT 1
        let options = QueryOptions::new().filter(filter.clone()).limit(1).page(1);
        Ok(self.query(&options).await?.into_iter().next())
    }

    /// Rows in the order the store returns them
    pub async fn query(&self, options: &QueryOptions) -> Result<Vec<StorageRecord>> {
        let sql = query_builder::query(&self.table_name, options)?;
        let (_, params) = query_builder::query_where(&options.filter)?;
        let result = self.execute_sql(Statement::new(sql, params)).await?;
        Ok(result.rows)
    }
}
