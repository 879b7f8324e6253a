//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::fmp_client::FmpClient;
use crate::adapters::sqlite_store::SqliteStore;
use crate::domain::enrich::enrich_members;
use crate::domain::error::HousewatchError;
use crate::domain::price_cache::cache_prices;
use crate::domain::sync::sync_trades;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::TradeStore;

#[derive(Parser, Debug)]
#[command(name = "housewatch", about = "Congressional trading disclosure tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the disclosure feed and append trades newer than the stored max date
    UpdateTrades {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Fetch biographical detail for filers past the stored watermark
    UpdateMembers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Backfill daily price bars for filers past the stored watermark
    UpdatePrices {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the JSON query API consumed by the dashboard
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::UpdateTrades { config } => run_update_trades(&config),
        Command::UpdateMembers { config } => run_update_members(&config),
        Command::UpdatePrices { config } => run_update_prices(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = HousewatchError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Open the store and create/repair its schema. Every mode starts here.
fn open_store(config: &FileConfigAdapter) -> Result<SqliteStore, ExitCode> {
    let store = SqliteStore::from_config(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    store.ensure_schema().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok(store)
}

fn build_feed(config: &FileConfigAdapter) -> Result<FmpClient, ExitCode> {
    FmpClient::from_config(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_update_trades(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let feed = match build_feed(&config) {
        Ok(f) => f,
        Err(code) => return code,
    };

    match sync_trades(&feed, &store) {
        Ok(appended) => {
            eprintln!("Appended {appended} new trades");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_update_members(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let feed = match build_feed(&config) {
        Ok(f) => f,
        Err(code) => return code,
    };

    match enrich_members(&feed, &store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_update_prices(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let feed = match build_feed(&config) {
        Ok(f) => f,
        Err(code) => return code,
    };

    let today = chrono::Local::now().date_naive();
    match cache_prices(&feed, &store, today) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    use crate::adapters::web::{AppState, build_router};
    use std::net::SocketAddr;
    use std::sync::Arc;

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let addr: SocketAddr = config
        .get_string("web", "listen")
        .unwrap_or_else(|| "127.0.0.1:8067".to_string())
        .parse()
        .unwrap_or_else(|_| "127.0.0.1:8067".parse().unwrap());

    eprintln!("Starting query API on {addr}");

    let state = AppState {
        store: Arc::new(store),
    };
    let router = build_router(state);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    runtime.block_on(async {
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(l) => l,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(1);
            }
        };
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
        ExitCode::SUCCESS
    })
}
