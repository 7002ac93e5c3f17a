//! cf-harvest main entry point
//!
//! Command-line interface for the Codeforces statement and submission harvester.

use anyhow::Context;
use cf_harvest::batch::{
    harvest_statements, harvest_submissions, statement_failure_log, submission_failure_log,
    Selection,
};
use cf_harvest::config::{load_config_with_hash, validate, Config};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// cf-harvest: a patient Codeforces harvester
///
/// Walks the problem set or the contest list one entry at a time, appends
/// statements or submission counts to CSV tables, and records every entry it
/// could not fetch so a later run can retry just those.
#[derive(Parser, Debug)]
#[command(name = "cf-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A patient Codeforces harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch problem statements into the problems table
    Statements(RunArgs),

    /// Fetch per-problem submission counts into the submissions table
    Submissions(RunArgs),

    /// Print the identifiers recorded in a failure log, without fetching anything
    Failed {
        #[arg(value_enum)]
        workflow: Workflow,
    },

    /// Print the effective configuration and exit
    Check,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Only walk the first N catalog entries
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Pause between entries, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Retry only the entries recorded in the failure log
    #[arg(long)]
    retry_failed: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Workflow {
    Statements,
    Submissions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_ref())?;

    match cli.command {
        Command::Statements(args) => {
            let config = apply_overrides(config, &args)?;
            harvest_statements(&config, selection(&args)).await?;
        }
        Command::Submissions(args) => {
            let config = apply_overrides(config, &args)?;
            harvest_submissions(&config, selection(&args)).await?;
        }
        Command::Failed { workflow } => handle_failed(&config, workflow)?,
        Command::Check => handle_check(&config),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cf_harvest=info,warn"),
            1 => EnvFilter::new("cf_harvest=debug,info"),
            2 => EnvFilter::new("cf_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

fn apply_overrides(mut config: Config, args: &RunArgs) -> anyhow::Result<Config> {
    if let Some(limit) = args.limit {
        config.batch.max_items = Some(limit);
    }
    if let Some(delay_ms) = args.delay_ms {
        config.batch.rate_limit_ms = delay_ms;
    }
    validate(&config).context("invalid command-line override")?;
    Ok(config)
}

fn selection(args: &RunArgs) -> Selection {
    if args.retry_failed {
        Selection::RetryFailed
    } else {
        Selection::Catalog
    }
}

/// Handles `failed`: lists recovered identifiers, one per line
fn handle_failed(config: &Config, workflow: Workflow) -> anyhow::Result<()> {
    let log = match workflow {
        Workflow::Statements => statement_failure_log(config),
        Workflow::Submissions => submission_failure_log(config),
    };

    let recovered = log
        .recover()
        .with_context(|| format!("failed to read {}", log.path().display()))?;

    for entry in &recovered {
        println!("{}", entry.id);
    }
    tracing::info!(
        "{} failed entries in {}",
        recovered.len(),
        log.path().display()
    );

    Ok(())
}

/// Handles `check`: shows the configuration a run would use
fn handle_check(config: &Config) {
    println!("=== cf-harvest configuration ===\n");

    println!("Client:");
    println!("  Base URL: {}", config.client.base_url);
    println!("  User-Agent: {}", config.client.user_agent);
    println!("  Accept: {}", config.client.accept);
    println!("  Accept-Language: {}", config.client.accept_language);
    println!("  Accept-Encoding: {}", config.client.accept_encoding);
    println!("  Referer: {}", config.client.referer);
    println!("  Timeout: {}s", config.client.timeout_secs);

    println!("\nBatch:");
    println!("  Delay between entries: {}ms", config.batch.rate_limit_ms);
    match config.batch.max_items {
        Some(limit) => println!("  Max items: {}", limit),
        None => println!("  Max items: all"),
    }

    println!("\nOutput:");
    println!("  Problems table: {}", config.output.problems_path.display());
    println!(
        "  Submissions table: {}",
        config.output.submissions_path.display()
    );
    println!("  Problems failure log: {}", config.output.problems_log.display());
    println!(
        "  Submissions failure log: {}",
        config.output.submissions_log.display()
    );
    println!("  Failure log format: {:?}", config.output.log_format);

    println!("\n✓ Configuration is valid");
}
