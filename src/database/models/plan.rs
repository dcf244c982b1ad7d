use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::descriptor::{EntityDescriptor, FieldDescriptor};
use crate::database::record::Entity;
use crate::filter::SqlValue;

/// A membership plan. `price` serializes as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Plan {
    #[serde(default)]
    pub plan_id: i64,
    pub plan_name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    name: "plans",
    table: "plans",
    label: "plan",
    primary_key: "plan_id",
    fields: &[
        FieldDescriptor::key("plan_id"),
        FieldDescriptor::text("plan_name"),
        FieldDescriptor::decimal("price").nullable(),
    ],
};

impl Entity for Plan {
    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> i64 {
        self.plan_id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.plan_name.as_str().into(), self.price.into()]
    }
}
