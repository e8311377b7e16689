///
/// Result rendering for the terminal.
///
/// `table` prints the column names on one line and each row below it, all
/// tab-separated, with SQL NULL shown as `NULL`. `json` prints
/// `{"columns": [...], "rows": [[...]]}` on a single line.
///

use hostsql_sqlite3::{DynamicValue, Outcome, ResultSet};
use serde_json::{json, Value};

use crate::config::OutputFormat;

pub fn render_outcome(outcome: &Outcome, format: OutputFormat) -> String {
    match (outcome, format) {
        (Outcome::Rows(results), OutputFormat::Table) => render_table(results),
        (Outcome::Rows(results), OutputFormat::Json) => render_json(results),
        (Outcome::Done { executions, changes }, OutputFormat::Table) => {
            format!("OK: {} execution(s), {} change(s)\n", executions, changes)
        }
        (Outcome::Done { executions, changes }, OutputFormat::Json) => {
            let mut out = json!({ "executions": executions, "changes": changes }).to_string();
            out.push('\n');
            out
        }
    }
}

pub fn render_table(results: &ResultSet) -> String {
    let mut out = results.schema().names().collect::<Vec<_>>().join("\t");
    out.push('\n');
    for row in results.rows() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

pub fn render_json(results: &ResultSet) -> String {
    let rows: Vec<Value> = results
        .rows()
        .iter()
        .map(|row| Value::Array(row.iter().map(json_value).collect()))
        .collect();
    let mut out = json!({
        "columns": results.schema().names().collect::<Vec<_>>(),
        "rows": rows,
    })
    .to_string();
    out.push('\n');
    out
}

fn json_value(value: &DynamicValue) -> Value {
    match value {
        DynamicValue::Null => Value::Null,
        DynamicValue::Text(s) => Value::String(s.clone()),
        DynamicValue::Integer(i) => Value::from(*i),
        // Non-finite reals have no JSON form
        DynamicValue::Real(r) => serde_json::Number::from_f64(*r)
            .map(Value::Number)
            .unwrap_or(Value::Null),
    }
}
