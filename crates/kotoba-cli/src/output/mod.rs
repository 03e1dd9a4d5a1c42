use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Every kotoba response is a record or a list of records; anything else
/// has no tabular form.
fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(records) => Ok(list_table(&records)),
        Value::Object(record) => Ok(record_table(&record)),
        other => anyhow::bail!("no table layout for a bare {}", json_kind(&other)),
    }
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// One row per field, `id` first.
fn record_table(record: &Map<String, Value>) -> String {
    let rows = ordered_keys(std::iter::once(record))
        .into_iter()
        .map(|key| vec![key.to_string(), cell(&record[key])])
        .collect::<Vec<_>>();
    table::render_entity_table(&["field", "value"], &rows, table_options())
}

/// One row per record; columns are the union of fields, `id` first.
fn list_table(records: &[Value]) -> String {
    let records = records.iter().filter_map(Value::as_object).collect::<Vec<_>>();
    if records.is_empty() {
        return String::from("(no rows)");
    }
    let columns = ordered_keys(records.iter().copied());
    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(*column).map_or_else(|| String::from("-"), cell))
                .collect()
        })
        .collect::<Vec<Vec<String>>>();
    table::render_entity_table(&columns, &rows, table_options())
}

fn ordered_keys<'a>(records: impl Iterator<Item = &'a Map<String, Value>>) -> Vec<&'a str> {
    let mut keys = Vec::<&str>::new();
    for record in records {
        for key in record.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
    }
    keys.sort_by_key(|key| (*key != "id", *key));
    keys
}

/// Flatten a field for display; nested records (a class inside its detail,
/// lessons inside progress) collapse to a reference or a count.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Object(record) => record
            .get("id")
            .map_or_else(|| format!("{{{} fields}}", record.len()), |id| format!("#{}", cell(id))),
        Value::Array(items) if items.iter().any(Value::is_object) => match items.len() {
            1 => String::from("1 item"),
            n => format!("{n} items"),
        },
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
