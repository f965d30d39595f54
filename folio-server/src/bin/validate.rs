//! Folio Validate - offline check of the static content document.
//!
//! Runs the same shape checks and typed decode the resolver applies, but
//! reports every violation instead of stopping at the first.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio::config::DEFAULT_STATIC_CONFIG_PATH;
use folio::content::{fallback::parse_document, inspect, Rejection};

#[derive(Parser, Debug)]
#[command(name = "folio-validate", about = "Validate a portfolio content document")]
struct Args {
    /// JSON or JSONC content document
    #[arg(env = "STATIC_CONFIG_PATH", default_value = DEFAULT_STATIC_CONFIG_PATH)]
    path: PathBuf,
}

fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let display = args.path.display();

    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {display}"))?;

    let document = match parse_document(&text) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{display}: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    match inspect(document) {
        Ok(config) => {
            println!(
                "{display}: valid ({} case studies, {} maker projects, {} articles, {} resources)",
                config.case_studies.len(),
                config.maker_projects.len(),
                config.writing.len(),
                config.resources.len(),
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(Rejection::Invalid(violations)) => {
            eprintln!("{display}: {} problem(s) found", violations.len());
            for (index, violation) in violations.iter().enumerate() {
                eprintln!("  {}. {violation}", index + 1);
            }
            Ok(ExitCode::FAILURE)
        }
        Err(Rejection::Malformed(message)) => {
            eprintln!("{display}: {message}");
            Ok(ExitCode::FAILURE)
        }
    }
}
