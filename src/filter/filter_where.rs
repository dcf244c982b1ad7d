use crate::database::descriptor::{EntityDescriptor, FieldDescriptor};

use super::error::QueryError;
use super::filter_order::SORT_PARAM;
use super::types::{FilterClause, FilterCondition, FilterOp, QueryParams, SqlResult, SqlValue};

/// Validate every filter parameter against the descriptor and coerce its
/// value. Fails on the first bad key; no partial clause is returned.
pub fn build_filter(
    descriptor: &EntityDescriptor,
    params: &QueryParams,
) -> Result<FilterClause, QueryError> {
    let mut conditions = Vec::new();
    for (key, raw) in params.iter() {
        if key == SORT_PARAM {
            continue;
        }
        let (field, operator) = resolve_key(descriptor, key)?;
        let value = SqlValue::coerce(field.field_type, raw).ok_or_else(|| QueryError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })?;
        conditions.push(FilterCondition {
            key: key.to_string(),
            column: field.column,
            operator,
            value,
        });
    }
    Ok(FilterClause { conditions })
}

/// Split `field` / `field.op` and check both parts against the descriptor
pub(crate) fn resolve_key<'d>(
    descriptor: &'d EntityDescriptor,
    key: &str,
) -> Result<(&'d FieldDescriptor, FilterOp), QueryError> {
    let (name, op) = match key.split_once('.') {
        Some((name, op)) => (name, Some(op)),
        None => (key, None),
    };
    let field = descriptor
        .field(name)
        .ok_or_else(|| QueryError::UnknownField(key.to_string()))?;

    let operator = match op {
        None => FilterOp::Eq,
        Some(op) => FilterOp::parse(op)
            .filter(|o| FilterOp::allowed_for(field.field_type).contains(o))
            .ok_or_else(|| QueryError::UnsupportedOperator {
                key: name.to_string(),
                operator: op.to_string(),
            })?,
    };
    Ok((field, operator))
}

/// Renders a filter clause as a parameterized predicate
pub struct FilterWhere {
    param_values: Vec<SqlValue>,
    param_index: usize,
}

impl FilterWhere {
    fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Predicate text without the `WHERE` keyword (empty when the clause is
    /// empty). Placeholders start after `starting_param_index`.
    pub fn generate(clause: &FilterClause, starting_param_index: usize) -> SqlResult {
        let mut filter_where = Self::new(starting_param_index);
        let parts: Vec<String> = clause
            .conditions
            .iter()
            .map(|c| {
                let placeholder = filter_where.param(c.value.clone());
                format!("\"{}\" {} {}", c.column, c.operator.to_sql(), placeholder)
            })
            .collect();
        SqlResult {
            query: parts.join(" AND "),
            params: filter_where.param_values,
        }
    }

    fn param(&mut self, value: SqlValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
