pub mod descriptor;
pub mod error;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod record;
pub mod repository;

pub use descriptor::{describe, entities, EntityDescriptor, FieldDescriptor, FieldType, RegistryError};
pub use error::{ConstraintKind, StoreError};
pub use manager::{health_check, open_database, DatabaseError};
pub use query_builder::QueryBuilder;
pub use record::Entity;
pub use repository::{RecordStore, Repository};
