//! Scrutineering CLI - Main Entry Point
//!
//! Reference caller of the compliance engine: reads one logger export plus
//! the operator-supplied ambient temperature, runs load then evaluate,
//! prints the verdict, and writes the cleaned series to a CSV file.
//!
//! Exit codes: 0 = PASS, 1 = FAIL, 2 = engine or I/O error.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rule_engine::{evaluate, parse_ambient_temp, RuleConfig, Verdict};
use table_loader::{load, LoaderConfig};

#[derive(Parser, Debug)]
#[command(name = "scrutineer", version, about = "Engine run compliance checker")]
struct Args {
    /// Logger export to analyze
    logfile: PathBuf,

    /// Ambient temperature in °C (accepts "21.5" or "21,5")
    #[arg(long, short = 't')]
    ambient_temp: String,

    /// TOML file overriding the built-in loader/rule configuration
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Where to write the cleaned series CSV (default: result_<timestamp>.csv)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Free-form run location, echoed in the PASS banner
    #[arg(long, short = 'l')]
    location: Option<String>,
}

/// On-disk configuration; both sections optional
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    loader: LoaderConfig,
    #[serde(default)]
    rules: RuleConfig,
}

fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn load_config(path: Option<&PathBuf>) -> Result<FileConfig> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", p.display()))
        }
        None => Ok(FileConfig::default()),
    }
}

fn run(args: &Args) -> Result<Verdict> {
    let config = load_config(args.config.as_ref())?;
    let ambient = parse_ambient_temp(&args.ambient_temp)?;

    let raw = fs::read(&args.logfile)
        .with_context(|| format!("reading {}", args.logfile.display()))?;
    info!(file = %args.logfile.display(), bytes = raw.len(), ambient, "analyzing run");

    let table = load(&raw, &config.loader)?;
    let (series, verdict) = evaluate(&table, ambient, &config.rules)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("result_{}.csv", Utc::now().timestamp())));
    fs::write(&output, series.to_csv_string())
        .with_context(|| format!("writing {}", output.display()))?;
    info!(output = %output.display(), rows = series.len(), "cleaned series written");

    Ok(verdict)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(Verdict::Pass) => {
            let location = args.location.as_deref().unwrap_or("unspecified");
            println!("PASS | {location}");
            ExitCode::SUCCESS
        }
        Ok(Verdict::Fail { time, channels }) => {
            let names: Vec<String> = channels.iter().map(|c| c.to_string()).collect();
            println!("FAIL - onset at {time:.2} s ({})", names.join(", "));
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
