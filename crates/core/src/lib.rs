// Tablemap Core - Schemas, statement builder, coercion, repository
// NO database driver dependencies: the engine is reached through `port::SqlConnection`

pub mod application;
pub mod coercion;
pub mod domain;
pub mod error;
pub mod port;
pub mod query_builder;

pub use application::{DatabaseLayer, Repository};
pub use domain::{
    Column, Columns, DataType, JsonValue, ModelObject, Operator, Predicate, PredicateError,
    QueryOptions, ResultSet, SqlValue, Statement, StorageRecord, UpdateObject, Where,
};
pub use error::{AppError, Result};
pub use port::SqlConnection;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
