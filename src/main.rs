use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;

use insert_guard_lib::bootstrap::{self, tracing::init_tracing_subscriber};
use insert_guard_lib::probe::{run_probe, ProbePlan};
use insert_guard_lib::GuardConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreKind {
    Sqlite,
    Memory,
}

/// Concurrent insert-if-absent load probe
#[derive(Debug, Parser)]
#[command(name = "insert-probe", version, about)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `[storage] database_path`
    #[arg(long)]
    database: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "sqlite")]
    store: StoreKind,

    /// Concurrent workers (K)
    #[arg(short, long, default_value_t = 20)]
    workers: usize,

    /// Inserts per worker (M / K)
    #[arg(short = 'n', long, default_value_t = 10)]
    per_worker: usize,

    /// Every worker submits the same identities
    #[arg(long)]
    shared_identities: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_subscriber(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => bootstrap::load_config(path)?,
        None => GuardConfig::default(),
    };
    if let Some(database) = cli.database {
        config.storage.database_path = database;
    }

    let deps = match cli.store {
        StoreKind::Sqlite => bootstrap::wire_sqlite(&config)?,
        StoreKind::Memory => bootstrap::wire_memory(&config),
    };

    let plan = ProbePlan {
        workers: cli.workers,
        per_worker: cli.per_worker,
        shared_identities: cli.shared_identities,
    };
    info!(?plan, store = ?cli.store, "Starting probe");

    let report = run_probe(plan, deps.insert_if_absent, deps.store).await?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
    } else {
        println!("inserted: {}", report.created);
        println!("stored:   {} (expected {})", report.stored, plan.expected_records());
        println!("failed:   {}", report.failed);
        println!("total:    {} ms", report.total_ms);
        println!("average:  {:.3} ms per insert", report.avg_ms);
    }

    if report.stored != plan.expected_records() as u64 {
        anyhow::bail!(
            "store holds {} records, expected {}",
            report.stored,
            plan.expected_records()
        );
    }
    Ok(())
}
