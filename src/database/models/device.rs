use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::descriptor::{EntityDescriptor, FieldDescriptor};
use crate::database::record::Entity;
use crate::filter::SqlValue;

/// A push-notification device registered to a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Device {
    #[serde(default)]
    pub device_id: i64,
    pub user_id: i64,
    pub device_token: String,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    name: "devices",
    table: "devices",
    label: "device",
    primary_key: "device_id",
    fields: &[
        FieldDescriptor::key("device_id"),
        FieldDescriptor::int("user_id"),
        FieldDescriptor::text("device_token"),
    ],
};

impl Entity for Device {
    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> i64 {
        self.device_id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.user_id.into(), self.device_token.as_str().into()]
    }
}
