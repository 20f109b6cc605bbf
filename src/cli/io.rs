//! JSON output for CLI commands
//!
//! One JSON object per command on stdout, UTF-8 only.

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::CliResult;

/// Write a success response to stdout.
pub fn write_response(data: Value) -> CliResult<()> {
    let response = json!({
        "status": "success",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
