//! Command output. Results go to stdout as pretty JSON so they can be piped
//! into `jq`; diagnostics go through `tracing` on stderr.

use std::io::Write;

use serde::Serialize;

use crate::error::CliError;

/// Write `value` as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns `CliError::Output` if serialization fails. A closed stdout is
/// ignored.
pub fn emit<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = render(value)?;
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{rendered}");
    Ok(())
}

/// Pretty JSON for `value`.
///
/// # Errors
///
/// Returns `CliError::Output` if serialization fails.
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
