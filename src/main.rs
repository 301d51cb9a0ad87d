//! `clausal` command-line entry point.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use clausal::{ClausalError, DEFAULT_LOG_LEVEL, EngineConfig, Record, RuleSet, compose};

#[derive(Parser, Debug)]
#[command(name = "clausal")]
#[command(version, about = "Evaluate clause policy rules against extracted contract clauses")]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a rule document against a records file and print the fires.
    ///
    /// A missing or malformed rule document evaluates as no rules.
    Evaluate {
        /// Rule document (YAML or JSON). Defaults to the configured path.
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// JSON array of records.
        #[arg(long)]
        records: PathBuf,

        /// Document the records belong to.
        #[arg(short, long)]
        doc_id: String,

        /// Print per-rule hit counts and timing alongside the fires.
        #[arg(long)]
        detailed: bool,
    },

    /// Strictly load a rule document and report how many rules it holds.
    Validate {
        /// Rule document (YAML or JSON). Defaults to the configured path.
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Evaluate, then compose guidance items for every record.
    Guidance {
        /// Rule document (YAML or JSON). Defaults to the configured path.
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// JSON array of records.
        #[arg(long)]
        records: PathBuf,

        /// Document the records belong to.
        #[arg(short, long)]
        doc_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = EngineConfig::load();

    let level = cli.log_level.unwrap_or_else(|| match &loaded {
        Ok(config) => config.log_level.clone(),
        Err(_) => DEFAULT_LOG_LEVEL.to_owned(),
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .init();
    let config = config_or_default(loaded);

    match cli.command {
        Commands::Evaluate {
            rules,
            records,
            doc_id,
            detailed,
        } => {
            let ruleset = load_rules(&config, rules.as_deref());
            let records = read_records(&records)?;
            if detailed {
                let report = ruleset.evaluate_detailed(&records, &doc_id);
                tracing::info!(%report, "evaluation finished");
                print_json(&report)?;
            } else {
                print_json(&ruleset.evaluate(&records, &doc_id))?;
            }
        }
        Commands::Validate { rules } => {
            let path = rules.unwrap_or_else(|| config.resolve_rules_path());
            let ruleset = RuleSet::from_file(&path)
                .with_context(|| format!("invalid rule document {}", path.display()))?;
            println!("{}: {ruleset}", path.display());
        }
        Commands::Guidance {
            rules,
            records,
            doc_id,
        } => {
            let ruleset = load_rules(&config, rules.as_deref());
            let records = read_records(&records)?;
            let fires = ruleset.evaluate(&records, &doc_id);
            print_json(&compose(&records, &fires))?;
        }
    }

    Ok(())
}

/// A broken config file only matters when a command falls back on it, so
/// it never aborts the run.
fn config_or_default(loaded: Result<EngineConfig, ClausalError>) -> EngineConfig {
    loaded.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring configuration, using defaults");
        EngineConfig::default()
    })
}

fn load_rules(config: &EngineConfig, path: Option<&Path>) -> RuleSet {
    match path {
        Some(path) => RuleSet::load_or_empty(path),
        None => config.load_rules(),
    }
}

fn read_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("reading records from {}", path.display()))?;
    serde_json::from_str(&input)
        .with_context(|| format!("parsing records from {}", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
