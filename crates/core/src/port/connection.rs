// SQL Engine Port (Interface)

use crate::domain::{ResultSet, Statement};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction-scoped execute primitive of the underlying SQL engine
///
/// One handle may be shared by every repository built on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlConnection: Send + Sync {
    /// Execute `statements` in order inside a single transaction
    ///
    /// All or nothing: on the first failing statement the transaction is
    /// rolled back and that failure is returned. On success, result `i`
    /// belongs to statement `i`.
    async fn execute_batch(&self, statements: &[Statement]) -> Result<Vec<ResultSet>>;
}
