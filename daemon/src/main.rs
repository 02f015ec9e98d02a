//! Disperse daemon: serves the contract over HTTP against a development ledger.

mod config;
mod genesis;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use config::DaemonConfig;
use disperse_engine::DisperseContract;
use disperse_rpc::{AppState, Ledger, RpcServer, SharedSnapshots, SharedStore};
use disperse_store::MemoryCommitStore;
use disperse_store_lmdb::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use disperse_utils::LogFormat;

#[derive(Parser)]
#[command(name = "disperse-daemon", about = "Batch dispersal and escrow daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "DISPERSE_CONFIG")]
    config: Option<PathBuf>,

    /// RPC server port.
    #[arg(long, env = "DISPERSE_RPC_PORT")]
    rpc_port: Option<u16>,

    /// LMDB directory for the escrow ledger and host snapshot (in-memory when omitted).
    #[arg(long, env = "DISPERSE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DISPERSE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "DISPERSE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve the RPC API.
    Run,
    /// Print the effective configuration as TOML and exit.
    ShowConfig,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<DaemonConfig> {
        let mut config = match &self.config {
            Some(path) => DaemonConfig::from_toml_file(path)?,
            None => DaemonConfig::default(),
        };
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

/// Escrow totals plus, when persistent, the host snapshot slot.
struct Storage {
    store: SharedStore,
    snapshots: Option<SharedSnapshots>,
}

fn open_storage(config: &DaemonConfig) -> anyhow::Result<Storage> {
    match &config.data_dir {
        Some(dir) => {
            let env = LmdbEnvironment::open(dir, DEFAULT_MAP_SIZE)?;
            Ok(Storage {
                store: Box::new(env.commit_store()),
                snapshots: Some(Box::new(env.snapshot_store())),
            })
        }
        None => {
            info!("no data directory configured, ledger is in-memory");
            Ok(Storage {
                store: Box::new(MemoryCommitStore::new()),
                snapshots: None,
            })
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    match cli.command {
        Command::ShowConfig => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Run => {
            disperse_utils::init_logging(config.log_format, &config.log_level)?;
            info!(
                contract = %config.contract_address,
                rpc_port = config.rpc_port,
                max_recipients = config.engine.max_recipients,
                "starting disperse daemon"
            );

            let storage = open_storage(&config)?;
            let host = match &storage.snapshots {
                Some(snapshots) => genesis::load_host(&config.genesis, snapshots)?,
                None => genesis::build_host(&config.genesis)?,
            };
            let contract = DisperseContract::new(config.contract_address, config.engine.clone(), storage.store);
            let mut ledger = Ledger::new(host, contract);
            if let Some(snapshots) = storage.snapshots {
                ledger = ledger.with_snapshots(snapshots);
            }
            let server = RpcServer::new(config.rpc_port, AppState::new(ledger));

            tokio::select! {
                result = server.start() => result?,
                _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
            }
            info!("disperse daemon exited cleanly");
        }
    }

    Ok(())
}
