use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, flatten, result_of};

/// Format output as tables using the tabled crate.
///
/// Scalar and nested-object fields share one Field/Value table. Each array of
/// objects (schedules, bracket breakdowns) gets its own table below it.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Object(res_map) => print_result_table(res_map),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", cell(result)),
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_result_table(res_map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);

    let mut sections: Vec<(&str, &Vec<Value>)> = Vec::new();
    for (key, val) in res_map {
        match val {
            Value::Array(items) if items.iter().all(Value::is_object) => {
                sections.push((key.as_str(), items));
            }
            _ => {
                let mut rows = Vec::new();
                flatten(key, val, &mut rows);
                for (field, text) in rows {
                    builder.push_record([field, text]);
                }
            }
        }
    }
    println!("{}", Table::from(builder));

    for (name, items) in sections {
        if items.is_empty() {
            continue;
        }
        println!("\n{}:", name);
        print_array_table(items);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", cell(item));
        }
    }
}
