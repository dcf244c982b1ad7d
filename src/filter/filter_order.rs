use crate::database::descriptor::EntityDescriptor;

use super::error::QueryError;
use super::filter_where::resolve_key;
use super::types::{QueryParams, SortClause, SortDirection, SortKey};

/// Reserved query parameter holding the sort specification
pub const SORT_PARAM: &str = "sort";

/// Parse `sort=field,-field2` into sort keys. Filter keys are checked too, so
/// a query naming an unknown field never yields a sort clause.
pub fn build_sort(
    descriptor: &EntityDescriptor,
    params: &QueryParams,
) -> Result<SortClause, QueryError> {
    for (key, _) in params.iter().filter(|(k, _)| *k != SORT_PARAM) {
        resolve_key(descriptor, key)?;
    }

    let mut sort = SortClause::by_primary_key(descriptor.primary_key);
    let Some(raw) = params.get(SORT_PARAM) else {
        return Ok(sort);
    };

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (name, direction) = match token.strip_prefix('-') {
            Some(name) => (name.trim_start(), SortDirection::Desc),
            None => (token, SortDirection::Asc),
        };
        if name.is_empty() {
            return Err(QueryError::InvalidValue {
                key: SORT_PARAM.to_string(),
                value: token.to_string(),
            });
        }
        let field = descriptor
            .field(name)
            .ok_or_else(|| QueryError::UnknownField(name.to_string()))?;

        // first mention of a column decides its direction
        if sort.keys.iter().any(|k| k.column == field.column) {
            continue;
        }
        sort.keys.push(SortKey { column: field.column, direction });
    }
    Ok(sort)
}

pub struct FilterOrder;

impl FilterOrder {
    /// `ORDER BY` text; always ends on the primary key so row order is total
    pub fn generate(sort: &SortClause) -> String {
        let mut parts: Vec<String> = sort
            .keys
            .iter()
            .map(|k| format!("\"{}\" {}", k.column, k.direction.to_sql()))
            .collect();
        if !sort.keys.iter().any(|k| k.column == sort.primary_key) {
            parts.push(format!("\"{}\" ASC", sort.primary_key));
        }
        format!("ORDER BY {}", parts.join(", "))
    }
}
