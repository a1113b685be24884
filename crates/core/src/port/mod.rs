// Port Layer - Interfaces for external dependencies

pub mod connection;

// Re-exports
pub use connection::SqlConnection;

#[cfg(test)]
pub use connection::MockSqlConnection;
