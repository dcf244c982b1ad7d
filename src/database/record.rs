use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};

use crate::database::descriptor::EntityDescriptor;
use crate::filter::SqlValue;

/// A record type the generic repository can read and write.
///
/// Rows are mapped with `FromRow`, so every column named in the descriptor
/// must exist on the struct. Writes take their values from [`Entity::values`],
/// which yields one value per writable field, in descriptor order.
pub trait Entity:
    for<'r> FromRow<'r, PgRow> + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    fn descriptor() -> &'static EntityDescriptor;

    fn id(&self) -> i64;

    fn values(&self) -> Vec<SqlValue>;
}
