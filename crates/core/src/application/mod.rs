// Application Layer - Execution layer and repository

pub mod database_layer;
pub mod repository;

// Re-exports
pub use database_layer::DatabaseLayer;
pub use repository::{from_model_object, to_model_object, Repository};
