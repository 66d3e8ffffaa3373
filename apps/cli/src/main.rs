//! `unitref` — resolve free-text unit codes to UCUM from the command line.
//!
//! Prints one `raw<TAB>resolved` line per input code. Unresolved codes come
//! back verbatim (exit code stays 0); pass `--report-invalid` to list them
//! on stderr afterwards.

use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unitref_lookup::{
    BidirectionalLookup, CodeResolver, JsonTableFile, TableSource, CURATED_SYNONYM_TABLE,
    GENERATED_SYNONYM_TABLE, UCUM_DISPLAY_TABLE,
};

#[derive(Parser)]
#[command(name = "unitref", version, about = "Normalize free-text unit codes to UCUM")]
struct Cli {
    /// Raw unit codes to resolve.
    codes: Vec<String>,

    /// Read additional codes from a file, one per line ('#' starts a comment).
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print display units instead of canonical codes.
    #[arg(long)]
    display: bool,

    /// Replace the embedded code→display table with a JSON file.
    #[arg(long, value_name = "PATH")]
    code_table: Option<PathBuf>,

    /// Replace the embedded generated synonym table with a JSON file.
    #[arg(long, value_name = "PATH")]
    synonyms: Option<PathBuf>,

    /// Replace the embedded curated synonym table with a JSON file.
    #[arg(long, value_name = "PATH")]
    curated_synonyms: Option<PathBuf>,

    /// Print every unresolved code to stderr after resolution.
    #[arg(long)]
    report_invalid: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let custom = custom_resolver(&cli)?;
    let resolver = match &custom {
        Some(r) => r,
        None => unitref_lookup::default_resolver(),
    };

    let codes = collect_codes(&cli)?;
    tracing::info!(codes = codes.len(), "resolving unit codes");
    for raw in &codes {
        let resolved = if cli.display {
            resolver.display_unit(raw)
        } else {
            resolver.valid_code(raw)
        };
        println!("{raw}\t{resolved}");
    }

    if cli.report_invalid {
        for code in resolver.invalid_codes() {
            eprintln!("invalid: {code}");
        }
    }

    Ok(())
}

fn collect_codes(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut codes = cli.codes.clone();
    if let Some(path) = &cli.file {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read code file {}", path.display()))?;
        codes.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    if codes.is_empty() {
        bail!("no codes given (pass codes as arguments or use --file)");
    }
    Ok(codes)
}

/// Build a resolver only when at least one table override is present;
/// otherwise the shared embedded-table resolver is used.
fn custom_resolver(cli: &Cli) -> anyhow::Result<Option<CodeResolver>> {
    if cli.code_table.is_none() && cli.synonyms.is_none() && cli.curated_synonyms.is_none() {
        return Ok(None);
    }

    let code_source: Box<dyn TableSource> = match &cli.code_table {
        Some(path) => Box::new(JsonTableFile::new(path.clone())),
        None => Box::new(UCUM_DISPLAY_TABLE),
    };
    let generated: Box<dyn TableSource> = match &cli.synonyms {
        Some(path) => Box::new(JsonTableFile::new(path.clone())),
        None => Box::new(GENERATED_SYNONYM_TABLE),
    };
    let curated: Box<dyn TableSource> = match &cli.curated_synonyms {
        Some(path) => Box::new(JsonTableFile::new(path.clone())),
        None => Box::new(CURATED_SYNONYM_TABLE),
    };

    let codes = BidirectionalLookup::from_sources(&[code_source.as_ref()])?;
    let synonyms = BidirectionalLookup::from_sources(&[generated.as_ref(), curated.as_ref()])?;
    Ok(Some(CodeResolver::new(codes, synonyms)))
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unitref=info,unitref_lookup=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
