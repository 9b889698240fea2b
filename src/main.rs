use clap::Parser;
use miette::{IntoDiagnostic, Result};
use ride_lifecycle::application::engine::LifecycleEngine;
use ride_lifecycle::config::VaultConfig;
use ride_lifecycle::domain::clock::ManualClock;
use ride_lifecycle::domain::ports::{PaymentStoreBox, UserStoreBox};
use ride_lifecycle::domain::verification::{CodeGenerator, RandomCodeGenerator};
use ride_lifecycle::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryUserStore};
use ride_lifecycle::infrastructure::notifier::LogNotifier;
use ride_lifecycle::infrastructure::sweeper::spawn_sweeper;
use ride_lifecycle::interfaces::csv::command_reader::CommandReader;
use ride_lifecycle::interfaces::csv::outcome_writer::{CommandOutcome, OutcomeWriter};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file (command, subject, code, value)
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "RIDE_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Seed for the code generator, for reproducible replays.
    #[arg(long, env = "RIDE_CODE_SEED")]
    seed: Option<u64>,

    /// How long an issued code stays valid, in seconds.
    #[arg(long, env = "RIDE_CODE_TTL_SECS", default_value_t = 600)]
    code_ttl_secs: i64,

    /// Number of lock stripes in the code store.
    #[arg(long, env = "RIDE_CODE_SHARDS", default_value_t = 16)]
    shards: usize,

    /// Seconds between background sweeps of expired codes.
    #[arg(long, env = "RIDE_SWEEP_INTERVAL_SECS", default_value_t = 60)]
    sweep_interval_secs: u64,
}

impl Cli {
    fn vault_config(&self) -> ride_lifecycle::error::Result<VaultConfig> {
        VaultConfig::from_secs(self.code_ttl_secs, self.shards, self.sweep_interval_secs)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>) -> Result<(UserStoreBox, PaymentStoreBox)> {
    use ride_lifecycle::infrastructure::rocksdb::RocksDbStore;

    if let Some(db_path) = db_path {
        info!(path = %db_path.display(), "using RocksDB storage");
        let store = RocksDbStore::open(db_path).into_diagnostic()?;
        return Ok((Box::new(store.clone()), Box::new(store)));
    }
    Ok((
        Box::new(InMemoryUserStore::new()),
        Box::new(InMemoryPaymentStore::new()),
    ))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>) -> Result<(UserStoreBox, PaymentStoreBox)> {
    if db_path.is_some() {
        warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok((
        Box::new(InMemoryUserStore::new()),
        Box::new(InMemoryPaymentStore::new()),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.vault_config().into_diagnostic()?;

    let generator: Box<dyn CodeGenerator> = match cli.seed {
        Some(seed) => Box::new(RandomCodeGenerator::seeded(seed)),
        None => Box::new(RandomCodeGenerator::new()),
    };
    let (users, payments) = open_stores(cli.db_path.clone())?;

    let engine = LifecycleEngine::new(
        &config,
        generator,
        users,
        payments,
        Box::new(LogNotifier),
        Arc::new(ManualClock::default()),
    );
    let sweeper = spawn_sweeper(engine.vault(), config.sweep_interval);

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());

    for (line, cmd_result) in reader.commands() {
        match cmd_result {
            Ok(cmd) => {
                let result = engine.execute(&cmd).await;
                writer
                    .write(&CommandOutcome::new(line, &cmd, result))
                    .into_diagnostic()?;
            }
            Err(e) => {
                warn!(line, "Error reading command: {}", e);
            }
        }
    }
    writer.flush().into_diagnostic()?;

    let swept = sweeper.shutdown().await;
    info!(swept, remaining = engine.vault().live_records(), "replay finished");

    Ok(())
}
