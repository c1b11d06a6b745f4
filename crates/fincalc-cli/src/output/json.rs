use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print the full envelope as JSON to stdout.
pub fn print_json(value: &Value) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = serde_json::to_writer_pretty(&mut stdout, value) {
        eprintln!("JSON serialization error: {}", e);
        return;
    }
    let _ = writeln!(stdout);
}
