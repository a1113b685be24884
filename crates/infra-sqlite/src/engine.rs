// SQLite Engine - implements the SqlConnection port on a sqlx pool

use crate::error::map_sqlx_error;
use crate::transaction::execute_statement;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tablemap_core::domain::{ResultSet, Statement};
use tablemap_core::error::Result;
use tablemap_core::port::SqlConnection;
use tracing::{debug, warn};

/// Pool-backed engine handle; clone it freely, clones share the pool
#[derive(Clone)]
pub struct SqliteEngine {
    pool: SqlitePool,
}

impl SqliteEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SqlConnection for SqliteEngine {
    async fn execute_batch(&self, statements: &[Statement]) -> Result<Vec<ResultSet>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let mut results = Vec::with_capacity(statements.len());

        for (index, statement) in statements.iter().enumerate() {
            match execute_statement(&mut tx, statement).await {
                Ok(result) => results.push(result),
                Err(err) => {
                    debug!(index, total = statements.len(), "Statement failed, rolling back batch");
                    // The first failure is what the caller gets
                    if let Err(rollback_err) = tx.rollback().await {
                        warn!(error = %rollback_err, "Rollback failed");
                    }
                    return Err(err);
                }
            }
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(statements = statements.len(), "Batch committed");

        Ok(results)
    }
}
