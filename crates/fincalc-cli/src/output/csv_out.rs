use serde_json::Value;
use std::io;

use super::{flatten, result_of};

/// Write the result as two-column CSV (`field,value`) to stdout. Nested
/// objects and schedules are flattened into dotted field paths.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let mut rows = Vec::new();
    flatten("", result_of(value), &mut rows);

    let _ = wtr.write_record(["field", "value"]);
    for (field, cell) in &rows {
        let _ = wtr.write_record([field.as_str(), cell.as_str()]);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for (index, warning) in warnings.iter().enumerate() {
            if let Value::String(text) = warning {
                let _ = wtr.write_record([format!("warnings.{index}").as_str(), text.as_str()]);
            }
        }
    }

    let _ = wtr.flush();
}
