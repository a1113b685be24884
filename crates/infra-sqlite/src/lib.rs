// Tablemap Infrastructure - SQLite Adapter
// Implements: SqlConnection (transactional statement batches)

mod connection;
mod engine;
mod error;
mod transaction;
mod value;

pub use connection::{create_pool, create_pool_with, PoolConfig};
pub use engine::SqliteEngine;
