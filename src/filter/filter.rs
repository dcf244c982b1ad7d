use crate::database::descriptor::EntityDescriptor;

use super::error::QueryError;
use super::filter_order::{build_sort, FilterOrder};
use super::filter_where::{build_filter, FilterWhere};
use super::types::{FilterClause, QueryParams, SortClause, SqlResult};

/// Validated filter and sort for one list request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: FilterClause,
    pub sort: SortClause,
}

impl ListQuery {
    /// Match everything, primary key order
    pub fn all(descriptor: &EntityDescriptor) -> Self {
        Self {
            filter: FilterClause::default(),
            sort: SortClause::by_primary_key(descriptor.primary_key),
        }
    }

    pub fn parse(descriptor: &EntityDescriptor, raw_query: &str) -> Result<Self, QueryError> {
        Self::from_params(descriptor, &QueryParams::parse(raw_query))
    }

    pub fn from_params(descriptor: &EntityDescriptor, params: &QueryParams) -> Result<Self, QueryError> {
        Ok(Self {
            filter: build_filter(descriptor, params)?,
            sort: build_sort(descriptor, params)?,
        })
    }

    /// WHERE and ORDER BY tail appended to a SELECT over the entity table
    pub fn to_sql(&self) -> SqlResult {
        let where_sql = FilterWhere::generate(&self.filter, 0);
        let order = FilterOrder::generate(&self.sort);
        let query = if where_sql.query.is_empty() {
            order
        } else {
            format!("WHERE {} {}", where_sql.query, order)
        };
        SqlResult { query, params: where_sql.params }
    }
}
