use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::descriptor::{EntityDescriptor, FieldDescriptor};
use crate::database::record::Entity;
use crate::filter::SqlValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Status {
    #[serde(default)]
    pub status_id: i64,
    pub status_name: String,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    name: "statuses",
    table: "statuses",
    label: "status",
    primary_key: "status_id",
    fields: &[FieldDescriptor::key("status_id"), FieldDescriptor::text("status_name")],
};

impl Entity for Status {
    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> i64 {
        self.status_id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.status_name.as_str().into()]
    }
}
