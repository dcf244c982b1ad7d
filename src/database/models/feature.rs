use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::descriptor::{EntityDescriptor, FieldDescriptor};
use crate::database::record::Entity;
use crate::filter::SqlValue;

/// A gym amenity (sauna, pool, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Feature {
    #[serde(default)]
    pub feature_id: i64,
    pub feature_name: String,
    #[serde(default)]
    pub feature_description: Option<String>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    name: "features",
    table: "features",
    label: "feature",
    primary_key: "feature_id",
    fields: &[
        FieldDescriptor::key("feature_id"),
        FieldDescriptor::text("feature_name"),
        FieldDescriptor::text("feature_description").nullable(),
    ],
};

impl Entity for Feature {
    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> i64 {
        self.feature_id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.feature_name.as_str().into(),
            self.feature_description.as_deref().into(),
        ]
    }
}
