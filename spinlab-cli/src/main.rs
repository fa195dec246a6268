//! SpinLab CLI — drive prediction sessions against a JSON file store.
//!
//! Commands:
//! - `init` — create or reset a session from a seed history of outcomes
//! - `spin` — record one observed outcome and print the next-round prediction
//! - `sequence` — print a session's recorded outcomes
//! - `stats` — print the per-strategy performance table

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use spinlab_core::domain::SessionId;
use spinlab_runner::config::ManagerConfig;
use spinlab_runner::manager::{RoundReport, StrategyManager};
use spinlab_runner::store::JsonFileStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "spinlab",
    about = "SpinLab CLI — adaptive roulette outcome prediction ensemble"
)]
struct Cli {
    /// Session identifier.
    #[arg(long, default_value = "default", global = true)]
    session: String,

    /// Document store directory.
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Path to a TOML config file. Defaults are used when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the master seed from the config.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or reset a session from a seed history (most recent first).
    Init {
        /// Observed outcomes, 0-36, most recent first.
        #[arg(required = true)]
        outcomes: Vec<i64>,
    },
    /// Record one observed outcome and print the next-round prediction.
    Spin {
        /// The outcome that just occurred, 0-36.
        outcome: i64,

        /// Print the full round report as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print a session's recorded outcomes, most recent first.
    Sequence,
    /// Print the per-strategy performance table.
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ManagerConfig::from_toml_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ManagerConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.master_seed = seed;
    }

    let store = Arc::new(
        JsonFileStore::new(&cli.data_dir)
            .with_context(|| format!("opening store at {}", cli.data_dir.display()))?,
    );
    let manager = StrategyManager::new(store, config);
    let session = SessionId::new(cli.session);

    match cli.command {
        Commands::Init { outcomes } => run_init(&manager, &session, &outcomes),
        Commands::Spin { outcome, json } => run_spin(&manager, &session, outcome, json),
        Commands::Sequence => run_sequence(&manager, &session),
        Commands::Stats => run_stats(&manager),
    }
}

fn run_init(manager: &StrategyManager, session: &SessionId, outcomes: &[i64]) -> Result<()> {
    let report = manager.initialize(session, outcomes);
    if !report.success {
        bail!(
            "initialize failed: {}",
            report.error.unwrap_or_else(|| "unknown error".into())
        );
    }
    println!(
        "Session '{}' initialized with {} outcome(s).",
        session.as_str(),
        report.count
    );
    Ok(())
}

fn run_spin(manager: &StrategyManager, session: &SessionId, outcome: i64, json: bool) -> Result<()> {
    let report = manager.add_outcome_and_predict(session, outcome);
    if !report.success {
        bail!(
            "round failed: {}",
            report.error.unwrap_or_else(|| "unknown error".into())
        );
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_round(&report);
    }
    Ok(())
}

fn run_sequence(manager: &StrategyManager, session: &SessionId) -> Result<()> {
    let Some(sequence) = manager.current_sequence(session)? else {
        bail!("session '{}' is not initialized", session.as_str());
    };
    println!(
        "Session '{}': {} outcome(s), most recent first",
        session.as_str(),
        sequence.len()
    );
    let values: Vec<String> = sequence.iter().map(|o| o.value().to_string()).collect();
    println!("{}", values.join(" "));
    Ok(())
}

fn run_stats(manager: &StrategyManager) -> Result<()> {
    let stats = manager.stats()?;
    if stats.is_empty() {
        println!("No graded predictions yet.");
        return Ok(());
    }

    println!(
        "{:<22} {:>8} {:>8} {:>9} {:>9} {:>8}",
        "Strategy", "Graded", "Correct", "Lifetime", "Rolling", "Weight"
    );
    println!("{}", "-".repeat(68));
    for perf in &stats {
        println!(
            "{:<22} {:>8} {:>8} {:>8.1}% {:>8.1}% {:>8.1}",
            perf.strategy_id.as_str(),
            perf.usage_count,
            perf.correct_count,
            perf.lifetime_accuracy() * 100.0,
            perf.rolling_accuracy() * 100.0,
            perf.dynamic_weight
        );
    }
    Ok(())
}

fn print_round(report: &RoundReport) {
    println!();
    println!("=== Round Result ===");
    if let Some(prediction) = report.prediction {
        println!("Prediction:     {}", prediction.value());
    }
    if let Some(name) = &report.strategy_name {
        println!("Source:         {name}");
    }
    println!("Sequence:       {} outcome(s)", report.current_sequence.len());
    if !report.top_strategies.is_empty() {
        println!();
        println!("--- Top Strategies ---");
        println!(
            "{:<22} {:>6} {:>9} {:>8}",
            "Strategy", "Pick", "Lifetime", "Weight"
        );
        for top in &report.top_strategies {
            println!(
                "{:<22} {:>6} {:>8.1}% {:>8.1}",
                top.strategy_name,
                top.prediction.value(),
                top.success_rate * 100.0,
                top.dynamic_weight
            );
        }
    }
    println!();
}
