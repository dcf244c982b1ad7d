use serde_json::json;

use crate::cli::utils::{format_table, output};
use crate::cli::OutputFormat;
use crate::database::{describe, entities};
use crate::filter::FilterOp;

pub fn list(output_format: OutputFormat) -> anyhow::Result<()> {
    let all = entities();
    let data = json!(all
        .iter()
        .map(|d| json!({ "name": d.name, "table": d.table, "primary_key": d.primary_key }))
        .collect::<Vec<_>>());

    output(output_format, &data, || {
        let rows: Vec<Vec<String>> = all
            .iter()
            .map(|d| vec![d.name.to_string(), d.table.to_string(), d.primary_key.to_string()])
            .collect();
        format_table(&["entity", "table", "primary key"], &rows)
    })
}

pub fn show(entity: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let descriptor = describe(entity)?;

    let operators = |f: &crate::database::FieldDescriptor| -> Vec<&'static str> {
        FilterOp::allowed_for(f.field_type).iter().map(|op| op.as_str()).collect()
    };

    let fields: Vec<_> = descriptor
        .fields
        .iter()
        .map(|f| {
            json!({
                "name": f.param,
                "type": f.field_type.as_str(),
                "nullable": f.nullable,
                "writable": f.writable,
                "operators": operators(f),
            })
        })
        .collect();
    let data = json!({
        "name": descriptor.name,
        "table": descriptor.table,
        "primary_key": descriptor.primary_key,
        "fields": fields,
    });

    output(output_format, &data, || {
        let rows: Vec<Vec<String>> = descriptor
            .fields
            .iter()
            .map(|f| {
                vec![
                    f.param.to_string(),
                    f.field_type.as_str().to_string(),
                    if f.nullable { "yes" } else { "no" }.to_string(),
                    operators(f).join(" "),
                ]
            })
            .collect();
        format!(
            "{} (table {}, key {})\n\n{}",
            descriptor.name,
            descriptor.table,
            descriptor.primary_key,
            format_table(&["field", "type", "nullable", "operators"], &rows)
        )
    })
}
