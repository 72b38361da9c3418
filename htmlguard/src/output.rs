//! Shared output formatting for validation outcomes.
//!
//! Provides JSON and plain-text formatters for [`ValidationOutcome`].
//! Terminal styling belongs to the CLI layer.

use std::io::Write;

use crate::outcome::ValidationOutcome;

/// Format a `ValidationOutcome` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(outcome: &ValidationOutcome, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(outcome)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `ValidationOutcome` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(outcome: &ValidationOutcome, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  HTML POLICY VALIDATOR")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  OK for web:         {}", outcome.ok_for_web())?;
    writeln!(
        writer,
        "  Changed by policy:  {}",
        outcome.has_difference_after_sanitizing()
    )?;
    writeln!(writer, "  Errors found:       {}", outcome.errors_count())?;
    writeln!(writer)?;

    if !outcome.errors().is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  POLICY VIOLATIONS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for error in outcome.errors() {
            writeln!(writer, "  - {error}")?;
        }
        writeln!(writer)?;
    }

    if let Some(sanitized) = outcome.sanitized_output() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  SANITIZED OUTPUT")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "{sanitized}")?;
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if !outcome.ok_for_web() {
        writeln!(
            writer,
            "\u{2717} {} policy violation(s) found, content must not be rendered",
            outcome.errors_count()
        )?;
    } else if outcome.has_difference_after_sanitizing() {
        writeln!(writer, "\u{2713} Content is safe once sanitized")?;
    } else {
        writeln!(writer, "\u{2713} Content passed validation unchanged")?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}
