use serde_json::json;

use crate::cli::utils::output;
use crate::cli::OutputFormat;
use crate::database::query_builder::select_statement;
use crate::database::{describe, EntityDescriptor};
use crate::filter::{ListQuery, SqlResult};

/// SELECT statement for `entity` with `query`, as the list endpoint would run it
pub fn explain(descriptor: &EntityDescriptor, query: &str) -> anyhow::Result<SqlResult> {
    let list = ListQuery::parse(descriptor, query)?;
    Ok(select_statement(descriptor, &list))
}

pub fn handle(entity: &str, query: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let descriptor = describe(entity)?;
    let statement = explain(descriptor, query)?;

    let params: Vec<String> = statement.params.iter().map(ToString::to_string).collect();
    let data = json!({ "sql": statement.query, "params": params });

    output(output_format, &data, || {
        let mut text = statement.query.clone();
        for (i, p) in params.iter().enumerate() {
            text.push_str(&format!("\n  ${} = {}", i + 1, p));
        }
        text
    })
}
