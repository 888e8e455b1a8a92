//! ciinfo: print CI detection results for the current process.
//!
//! Reads the process environment, evaluates it against the configured vendor
//! table, and writes the result to stdout as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use ciinfo::config::Config;
use ciinfo::{Snapshot, Vendor, logging, vendor};
use clap::Parser;

/// Detect CI vendor and pull-request status from environment variables.
#[derive(Debug, Parser)]
#[command(name = "ciinfo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to merge over the defaults (instead of ~/.config/ciinfo/config.toml)
    #[arg(short, long, conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore the user config file
    #[arg(long)]
    no_config: bool,

    /// Extra JSON vendor table, appended after configured ones (repeatable)
    #[arg(long = "vendors", value_name = "FILE")]
    vendor_files: Vec<PathBuf>,

    /// Use only the built-in vendor table
    #[arg(long, conflicts_with = "vendor_files")]
    builtin_only: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Exit with status 0 in CI and 1 otherwise
    #[arg(long)]
    exit_code: bool,

    /// Print the effective vendor table instead of detecting
    #[arg(long)]
    list_vendors: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> ciinfo::Result<Config> {
    if cli.no_config {
        return Ok(Config::default_config());
    }
    match &cli.config {
        Some(path) => Config::load_file(path),
        None => Ok(Config::load()),
    }
}

fn vendor_table(cli: &Cli, config: &Config) -> ciinfo::Result<Vec<Vendor>> {
    if cli.builtin_only {
        return Ok(vendor::builtin().to_vec());
    }
    let mut table = config.vendor_table()?;
    for path in &cli.vendor_files {
        table.extend(vendor::load_table(path)?);
    }
    Ok(table)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn run(cli: &Cli) -> ciinfo::Result<ExitCode> {
    let config = load_config(cli)?;
    logging::init(&config.settings, cli.verbose)?;

    let table = vendor_table(cli, &config)?;
    log::debug!("vendor table has {} entries", table.len());

    if cli.list_vendors {
        let json = to_json(&table, cli.pretty).map_err(ciinfo::Error::Output)?;
        println!("{json}");
        return Ok(ExitCode::SUCCESS);
    }

    let info = ciinfo::detect(&Snapshot::from_process(), &table);
    logging::log_detection(&info);

    let json = to_json(&info, cli.pretty).map_err(ciinfo::Error::Output)?;
    println!("{json}");

    if cli.exit_code && !info.is_ci {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ciinfo: {e}");
            ExitCode::from(2)
        }
    }
}
