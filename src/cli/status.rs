//! Status and validate CLI rendering.

use crate::models::{HealthStatus, IssueSeverity};
use std::io::{self, Write};

/// Writes a health status as human-readable text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_health_text<W: Write>(writer: &mut W, status: &HealthStatus) -> io::Result<()> {
    writeln!(writer, "Overall: {}", status.overall)?;

    if status.issues.is_empty() {
        writeln!(writer, "No issues found.")?;
        return Ok(());
    }

    writeln!(writer)?;
    for issue in &status.issues {
        let tag = match issue.severity {
            IssueSeverity::Error => "ERROR",
            IssueSeverity::Warning => "WARN ",
        };
        writeln!(writer, "{tag} {}: {}", issue.file, issue.message)?;
        if let Some(suggestion) = &issue.suggestion {
            writeln!(writer, "      {suggestion}")?;
        }
    }

    if !status.suggestions.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Suggestions:")?;
        for suggestion in &status.suggestions {
            writeln!(writer, "  - {suggestion}")?;
        }
    }
    Ok(())
}

/// Writes a health status as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_health_json<W: Write>(writer: &mut W, status: &HealthStatus) -> io::Result<()> {
    let json = serde_json::to_string_pretty(status)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}
