use std::marker::PhantomData;

use rust_decimal::Decimal;
use sqlx::{self, postgres::PgArguments, FromRow};

use crate::database::descriptor::{EntityDescriptor, FieldType};
use crate::database::record::Entity;
use crate::filter::filter_where::FilterWhere;
use crate::filter::{FilterClause, ListQuery, SqlResult, SqlValue};

/// SQL statements for one entity. Identifiers come from the static
/// descriptor only; every value is a `$n` placeholder.
pub struct QueryBuilder<T> {
    descriptor: &'static EntityDescriptor,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Entity> QueryBuilder<T> {
    pub fn new() -> Self {
        Self {
            descriptor: T::descriptor(),
            _phantom: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub fn select(&self, query: &ListQuery) -> SqlResult {
        select_statement(self.descriptor, query)
    }

    pub fn count(&self, filter: &FilterClause) -> SqlResult {
        let where_sql = FilterWhere::generate(filter, 0);
        let mut query = format!("SELECT COUNT(*) AS count FROM \"{}\"", self.descriptor.table);
        if !where_sql.query.is_empty() {
            query = format!("{} WHERE {}", query, where_sql.query);
        }
        SqlResult { query, params: where_sql.params }
    }

    pub fn select_by_id(&self, id: i64) -> SqlResult {
        SqlResult {
            query: format!("{} WHERE \"{}\" = $1", select_from(self.descriptor), self.descriptor.primary_key),
            params: vec![SqlValue::Int(id)],
        }
    }

    pub fn insert(&self, record: &T) -> SqlResult {
        let columns: Vec<String> = self
            .descriptor
            .writable_fields()
            .map(|f| format!("\"{}\"", f.column))
            .collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
        SqlResult {
            query: format!(
                "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING {}",
                self.descriptor.table,
                columns.join(", "),
                placeholders.join(", "),
                column_list(self.descriptor)
            ),
            params: record.values(),
        }
    }

    pub fn update(&self, id: i64, record: &T) -> SqlResult {
        let assignments: Vec<String> = self
            .descriptor
            .writable_fields()
            .enumerate()
            .map(|(i, f)| format!("\"{}\" = ${}", f.column, i + 1))
            .collect();
        let mut params = record.values();
        params.push(SqlValue::Int(id));
        SqlResult {
            query: format!(
                "UPDATE \"{}\" SET {} WHERE \"{}\" = ${} RETURNING {}",
                self.descriptor.table,
                assignments.join(", "),
                self.descriptor.primary_key,
                params.len(),
                column_list(self.descriptor)
            ),
            params,
        }
    }

    pub fn delete(&self, id: i64) -> SqlResult {
        SqlResult {
            query: format!(
                "DELETE FROM \"{}\" WHERE \"{}\" = $1",
                self.descriptor.table, self.descriptor.primary_key
            ),
            params: vec![SqlValue::Int(id)],
        }
    }

}

/// Filtered, ordered SELECT over any registered entity
pub fn select_statement(descriptor: &EntityDescriptor, query: &ListQuery) -> SqlResult {
    let tail = query.to_sql();
    SqlResult {
        query: format!("{} {}", select_from(descriptor), tail.query),
        params: tail.params,
    }
}

fn select_from(descriptor: &EntityDescriptor) -> String {
    format!("SELECT {} FROM \"{}\"", column_list(descriptor), descriptor.table)
}

fn column_list(descriptor: &EntityDescriptor) -> String {
    descriptor
        .columns()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}

impl<T: Entity> Default for QueryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Text(s) => q.bind(s.as_str()),
        SqlValue::Decimal(d) => q.bind(*d),
        SqlValue::Null(FieldType::Int) => q.bind(None::<i64>),
        SqlValue::Null(FieldType::Text) => q.bind(None::<String>),
        SqlValue::Null(FieldType::Decimal) => q.bind(None::<Decimal>),
    }
}

pub(crate) fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Text(s) => q.bind(s.as_str()),
        SqlValue::Decimal(d) => q.bind(*d),
        SqlValue::Null(FieldType::Int) => q.bind(None::<i64>),
        SqlValue::Null(FieldType::Text) => q.bind(None::<String>),
        SqlValue::Null(FieldType::Decimal) => q.bind(None::<Decimal>),
    }
}
