use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

use apk_watch::config::{DEFAULT_PORT, MonitorConfig, StoreKind, log_dir};
use apk_watch::monitor::MonitorCycle;
use apk_watch::notify::{Notifier, TelegramNotifier};
use apk_watch::page::HttpPageFetcher;
use apk_watch::snapshot::SnapshotStore;
use apk_watch::snapshot::stores::{JsonFileSnapshotStore, SqliteSnapshotStore};

#[derive(Parser)]
#[command(name = "apk-watch")]
#[command(version, about = "Watches download pages for new APK releases")]
struct Cli {
    /// Config file (defaults to config.json in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one check; announce and save if a version increased
    Check,
    /// Fetch and announce the current links without saving anything
    Test,
    /// Print the last saved snapshot
    Status,
    /// Serve POST /check and POST /test over HTTP
    Serve {
        /// Listen port (defaults to $PORT, then 5000)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = apk_watch::logging::init(&log_dir()).context("failed to set up logging")?;
    let config = MonitorConfig::load(cli.config.as_deref()).context("failed to load config")?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, config))
}

async fn run(command: Command, config: MonitorConfig) -> anyhow::Result<()> {
    match command {
        Command::Check => {
            let report = build_cycle(&config)?.run_check().await;
            print!("{}", report.transcript.render());
        }
        Command::Test => {
            let report = build_cycle(&config)?.run_dry_run().await;
            print!("{}", report.transcript.render());
        }
        Command::Status => {
            let snapshot = open_store(&config)?.load()?;
            match snapshot {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => println!("No snapshot saved yet"),
            }
        }
        Command::Serve { port } => {
            let port = port
                .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
                .unwrap_or(DEFAULT_PORT);
            let cycle = Arc::new(build_cycle(&config)?);
            apk_watch::server::serve(cycle, port).await?;
        }
    }

    Ok(())
}

fn build_cycle(config: &MonitorConfig) -> anyhow::Result<MonitorCycle> {
    let timeout = Duration::from_millis(config.timeout_ms);

    let fetcher = HttpPageFetcher::new(&config.headers, timeout)?;

    let notifier: Option<Arc<dyn Notifier>> = if config.notify.is_active() {
        Some(Arc::new(TelegramNotifier::new(
            &config.notify.api_base,
            &config.notify.bot_token,
            &config.notify.chat_id,
            timeout,
        )?))
    } else {
        if config.notify.enabled {
            warn!("Telegram bot token or chat id missing; notifications disabled");
        }
        None
    };

    Ok(MonitorCycle::new(
        config.name.clone(),
        config.source_specs(),
        Arc::new(fetcher),
        notifier,
        open_store(config)?,
    ))
}

fn open_store(config: &MonitorConfig) -> anyhow::Result<Arc<dyn SnapshotStore>> {
    let path = config.store.resolved_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {:?}", parent))?;
    }

    let store: Arc<dyn SnapshotStore> = match config.store.kind {
        StoreKind::Sqlite => Arc::new(SqliteSnapshotStore::new(&path)?),
        StoreKind::Json => Arc::new(JsonFileSnapshotStore::new(path)),
    };
    Ok(store)
}
