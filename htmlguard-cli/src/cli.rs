use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use htmlguard::{HtmlValidator, PolicySelector, ValidationConfig, output, sanitize};
use tracing::info;

use crate::logging;

#[derive(Parser)]
#[command(name = "htmlguard", version, about = "Sanitize and validate third-party HTML")]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sanitized document, or fail with every policy violation
    Sanitize {
        /// The HTML document
        html: String,

        /// Creation time of the document (RFC 3339); selects the policy generation
        #[arg(long, value_parser = parse_instant)]
        created: Option<DateTime<Utc>>,
    },

    /// Report whether a document is safe to render
    Validate {
        /// The HTML document; read from stdin when neither this nor --file is given
        #[arg(conflicts_with = "file")]
        html: Option<String>,

        /// Read the document from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Creation time of the document (RFC 3339); selects the policy generation
        #[arg(long, value_parser = parse_instant)]
        created: Option<DateTime<Utc>>,

        /// Include the sanitized document when sanitizing changed it
        #[arg(long)]
        include_output: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Human,
    Json,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|instant| instant.with_timezone(&Utc))
}

/// Run the command line. Returns whether the document was acceptable.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Sanitize { html, created } => run_sanitize(&html, created),
        Commands::Validate {
            html,
            file,
            created,
            include_output,
            format,
        } => {
            let content = match (html, file) {
                (Some(html), _) => html.into_bytes(),
                (None, Some(path)) => {
                    fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?
                }
                (None, None) => {
                    let mut buf = Vec::new();
                    io::stdin()
                        .read_to_end(&mut buf)
                        .context("failed to read document from stdin")?;
                    buf
                }
            };
            run_validate(&content, created, include_output, format)
        }
    }
}

fn run_sanitize(html: &str, created: Option<DateTime<Utc>>) -> Result<bool> {
    let created = created.unwrap_or_else(Utc::now);
    let variant = PolicySelector::default().select(created);
    info!(?variant, %created, "sanitizing document");

    match sanitize(html, variant) {
        Ok(sanitized) => {
            println!("{sanitized}");
            Ok(true)
        }
        Err(err) => {
            for error in err.errors() {
                eprintln!("  - {error}");
            }
            Err(err.into())
        }
    }
}

fn run_validate(
    content: &[u8],
    created: Option<DateTime<Utc>>,
    include_output: bool,
    format: Format,
) -> Result<bool> {
    let config = if include_output {
        ValidationConfig::with_sanitized_output()
    } else {
        ValidationConfig::default()
    };
    let validator = HtmlValidator::with_config(config);
    let outcome = match created {
        Some(created) => validator.validate(content, created),
        None => validator.validate_now(content),
    };
    info!(ok_for_web = outcome.ok_for_web(), errors = outcome.errors_count(), "validated document");

    let mut stdout = io::stdout().lock();
    match format {
        Format::Human => output::write_human(&outcome, &mut stdout)?,
        Format::Json => output::write_json(&outcome, &mut stdout)?,
    }
    Ok(outcome.ok_for_web())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_instant() {
        let instant = parse_instant("2021-12-01T01:00:00+01:00").unwrap();
        assert_eq!(instant, *htmlguard::CSS_VALIDATION_CUTOVER);
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_parse_validate_arguments() {
        let cli = Cli::try_parse_from([
            "htmlguard",
            "-vv",
            "validate",
            "<p>x</p>",
            "--created",
            "2020-01-01T00:00:00Z",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Validate {
                html: Some(_),
                created: Some(_),
                format: Format::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_html_conflicts_with_file() {
        let result = Cli::try_parse_from(["htmlguard", "validate", "<p>x</p>", "--file", "doc.html"]);
        assert!(result.is_err());
    }
}
