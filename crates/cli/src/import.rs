//! `pbook import` — config-driven price-master import.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use pricebook_recon::model::{ImportInput, ImportResult, RowOutcome};
use pricebook_recon::ImportConfig;

use crate::exit_codes::{EXIT_IMPORT_BLOCKED, EXIT_IMPORT_INVALID_CONFIG, EXIT_IMPORT_RUNTIME};
use crate::CliError;

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Run an import from a TOML config file
    #[command(after_help = "\
Examples:
  pbook import run august.import.toml
  pbook import run august.import.toml --json
  pbook import run august.import.toml --output result.json
  pbook import run august.import.toml --dry-run")]
    Run {
        /// Path to the .import.toml config file
        config: PathBuf,

        /// Output the full result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Reconcile and report without touching the price master
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate an import config without running
    #[command(after_help = "\
Examples:
  pbook import validate august.import.toml")]
    Validate {
        /// Path to the .import.toml config file
        config: PathBuf,
    },
}

pub fn cmd_import(cmd: ImportCommands) -> Result<(), CliError> {
    match cmd {
        ImportCommands::Run { config, json, output, dry_run } => {
            cmd_import_run(config, json, output, dry_run)
        }
        ImportCommands::Validate { config } => cmd_import_validate(config),
    }
}

fn import_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn cmd_import_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    dry_run: bool,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| import_err(EXIT_IMPORT_RUNTIME, format!("cannot read config: {e}")))?;
    let config = ImportConfig::from_toml(&config_str)
        .map_err(|e| import_err(EXIT_IMPORT_INVALID_CONFIG, e.to_string()))?;

    // Resolve file paths relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let runtime = |e: &dyn std::fmt::Display| import_err(EXIT_IMPORT_RUNTIME, e.to_string());

    let rows = pricebook_io::load_rows(
        &base_dir.join(&config.files.rows),
        &config.columns,
        config.files.sheet.as_deref(),
    )
    .map_err(|e| runtime(&e))?;
    let catalog =
        pricebook_io::load_catalog(&base_dir.join(&config.files.catalog)).map_err(|e| runtime(&e))?;
    let rates = pricebook_io::load_rates(
        &base_dir.join(&config.files.rates),
        &config.base_currency,
        &config.period,
    )
    .map_err(|e| runtime(&e))?;

    let mut master_conn = match &config.files.master {
        Some(master) => {
            Some(pricebook_store::open_master(&base_dir.join(master)).map_err(|e| runtime(&e))?)
        }
        None => None,
    };
    let master = match &master_conn {
        Some(conn) => pricebook_store::load_master(conn, config.class).map_err(|e| runtime(&e))?,
        None => Vec::new(),
    };

    let input = ImportInput { rows, catalog, rates, master };
    let result = pricebook_recon::run(&config, &input).map_err(|e| runtime(&e))?;

    report(&result);

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| import_err(EXIT_IMPORT_RUNTIME, format!("JSON serialization error: {e}")))?;
    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| import_err(EXIT_IMPORT_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if json_output {
        println!("{json_str}");
    }

    if !result.batch.admissible {
        return Err(CliError {
            code: EXIT_IMPORT_BLOCKED,
            message: format!(
                "{} row(s) with unusable units block the batch, nothing was written",
                result.summary.blocked_invalid_unit
            ),
            hint: Some("fix the blocked-invalid-unit rows above and re-run".into()),
        });
    }

    if dry_run {
        eprintln!(
            "dry run: {} records would replace {} master rows",
            result.plan.records.len(),
            result.plan.delete_codes.len()
        );
        return Ok(());
    }

    match master_conn.as_mut() {
        Some(conn) => {
            let inserted =
                pricebook_store::apply_import(conn, &result).map_err(|e| runtime(&e))?;
            eprintln!(
                "wrote {inserted} records to the price master ({} replaced)",
                result.plan.delete_codes.len()
            );
        }
        None => eprintln!("no master file configured, nothing written"),
    }

    Ok(())
}

/// Per-row attention lines plus the one-line summary, on stderr. Plain
/// imports stay quiet; everything else names its row and rule.
fn report(result: &ImportResult) {
    for o in &result.outcomes {
        if o.outcome != RowOutcome::Imported {
            eprintln!("row {}: {} [{}] {}", o.row_number, o.outcome, o.canonical_code, o.detail);
        }
    }

    let s = &result.summary;
    eprintln!(
        "{} import: {} rows — {} imported ({} duplicate winners), {} zero-price warnings, {} superseded, {} rejected, {} blocked",
        result.meta.class,
        s.total_rows,
        s.imported + s.duplicate_winners + s.zero_price_warnings,
        s.duplicate_winners,
        s.zero_price_warnings,
        s.superseded,
        s.rejected_wrong_class + s.rejected_unresolved,
        s.blocked_invalid_unit,
    );
}

fn cmd_import_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| import_err(EXIT_IMPORT_RUNTIME, format!("cannot read config: {e}")))?;
    let config = ImportConfig::from_toml(&config_str)
        .map_err(|e| import_err(EXIT_IMPORT_INVALID_CONFIG, e.to_string()))?;

    eprintln!(
        "config OK: '{}' ({} import, base {}, period {})",
        config.name, config.class, config.base_currency, config.period
    );
    Ok(())
}
