use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::descriptor::{EntityDescriptor, FieldDescriptor};
use crate::database::record::Entity;
use crate::filter::SqlValue;

/// Where a support request came from (email, phone, app, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SupportSource {
    #[serde(default)]
    pub support_source_id: i64,
    pub support_source_name: String,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    name: "support-sources",
    table: "support_sources",
    label: "support source",
    primary_key: "support_source_id",
    fields: &[
        FieldDescriptor::key("support_source_id"),
        FieldDescriptor::text("support_source_name"),
    ],
};

impl Entity for SupportSource {
    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> i64 {
        self.support_source_id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.support_source_name.as_str().into()]
    }
}
