// Domain Layer - Schemas, values and records

pub mod column;
pub mod error;
pub mod query;
pub mod record;
pub mod value;

// Re-exports
pub use column::{defaults, Column, Columns, DataType, DefaultFn, DEFAULT_PRIMARY_KEY};
pub use error::PredicateError;
pub use query::{Operator, Predicate, QueryOptions, Where};
pub use record::{ModelObject, ResultSet, Statement, StorageRecord, UpdateObject};
pub use value::{JsonValue, SqlValue};
