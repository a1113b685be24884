//! SQL statement builder.
//!
//! Pure string construction, one stable statement shape per operation.
//! Every function returns SQL text with `?` placeholders; the caller supplies
//! parameters in placeholder order.
//!
//! - `schema`: CREATE TABLE / DROP TABLE
//! - `create`: INSERT / INSERT OR REPLACE
//! - `read`: SELECT by key, filtered/paginated SELECT, the predicate DSL
//! - `update`: UPDATE by primary key
//! - `delete`: DELETE by key / DELETE all

pub mod create;
pub mod delete;
pub mod read;
pub mod schema;
pub mod update;

pub use create::{insert, insert_or_replace};
pub use delete::{destroy, destroy_all, destroy_by_key};
pub use read::{find, find_by_key, property_operation, query, query_where};
pub use schema::{create_table, create_table_columns, drop_table};
pub use update::{assignments, update};
