use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

use crate::database::models::{Device, Feature, Plan, Status, SupportSource};
use crate::database::Entity;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
}

/// Value type a query parameter is coerced to before binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Int,
    Text,
    Decimal,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Text => "string",
            FieldType::Decimal => "decimal",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldDescriptor {
    /// Query-string name
    pub param: &'static str,
    pub column: &'static str,
    pub field_type: FieldType,
    pub nullable: bool,
    /// False for generated columns (the serial primary key)
    pub writable: bool,
}

impl FieldDescriptor {
    const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            param: name,
            column: name,
            field_type,
            nullable: false,
            writable: true,
        }
    }

    /// Serial primary key, read-only
    pub const fn key(name: &'static str) -> Self {
        let mut field = Self::new(name, FieldType::Int);
        field.writable = false;
        field
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub const fn decimal(name: &'static str) -> Self {
        Self::new(name, FieldType::Decimal)
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Static metadata for one entity: where it lives and which fields callers
/// may filter and sort on. Anything not listed here is rejected.
#[derive(Debug, Serialize)]
pub struct EntityDescriptor {
    /// Registry key and route segment
    pub name: &'static str,
    pub table: &'static str,
    /// Singular name used in messages
    pub label: &'static str,
    pub primary_key: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl EntityDescriptor {
    pub fn field(&self, param: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.param == param)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.column)
    }

    pub fn writable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.fields.iter().filter(|f| f.writable)
    }
}

static REGISTRY: Lazy<HashMap<&'static str, &'static EntityDescriptor>> = Lazy::new(|| {
    [
        Status::descriptor(),
        Device::descriptor(),
        Feature::descriptor(),
        Plan::descriptor(),
        SupportSource::descriptor(),
    ]
    .into_iter()
    .map(|d| (d.name, d))
    .collect()
});

pub fn describe(name: &str) -> Result<&'static EntityDescriptor, RegistryError> {
    REGISTRY
        .get(name)
        .copied()
        .ok_or_else(|| RegistryError::UnknownEntity(name.to_string()))
}

/// All registered descriptors, ordered by name
pub fn entities() -> Vec<&'static EntityDescriptor> {
    let mut all: Vec<_> = REGISTRY.values().copied().collect();
    all.sort_by_key(|d| d.name);
    all
}
