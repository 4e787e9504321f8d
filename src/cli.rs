//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sqlite_store::SqliteStore;
use crate::domain::csv_import::parse_trades;
use crate::domain::error::JournalError;
use crate::domain::summary::compute_summary;
use crate::ports::trade_store::TradeStore;

#[derive(Parser, Debug)]
#[command(name = "tradelog", about = "Single-user trade journal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import trades from a CSV file
    Import {
        #[arg(short, long)]
        config: PathBuf,
        /// CSV file with a header row
        file: PathBuf,
    },
    /// List stored trades
    List {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the aggregate performance summary
    Summary {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Import { config, file } => run_import(&config, &file),
        Command::List { config } => run_list(&config),
        Command::Summary { config } => run_summary(&config),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = JournalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn open_store(config: &FileConfigAdapter) -> Result<SqliteStore, ExitCode> {
    let store = match SqliteStore::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };

    if let Err(e) = store.initialize_schema() {
        eprintln!("error: {e}");
        return Err((&e).into());
    }

    Ok(store)
}

fn run_import(config_path: &PathBuf, file: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    eprintln!("Reading {}", file.display());
    let content = match fs::read(file) {
        Ok(c) => c,
        Err(e) => {
            let err = JournalError::from(e);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let inputs = match parse_trades(&content) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if inputs.is_empty() {
        let err = JournalError::EmptyImport;
        eprintln!("error: {err}");
        return (&err).into();
    }

    for input in &inputs {
        if let Err(e) = store.insert(input) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    println!("Imported {} trades", inputs.len());
    ExitCode::SUCCESS
}

fn run_list(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let trades = match store.list() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if trades.is_empty() {
        println!("No trades recorded");
        return ExitCode::SUCCESS;
    }

    for trade in &trades {
        println!(
            "{:>4}  {:<10} {:<4} entry {:>10.2} exit {:>10.2} size {:>8.2} pnl {:>10.2}",
            trade.id,
            trade.symbol,
            trade.direction.as_str(),
            trade.entry_price,
            trade.exit_price,
            trade.size,
            trade.pnl,
        );
    }

    ExitCode::SUCCESS
}

fn run_summary(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let trades = match store.list() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report = compute_summary(&trades);
    println!("Trades:    {}", report.num_trades);
    println!("Total PnL: {:.2}", report.total_pnl);
    println!("Win rate:  {:.1}%", report.win_rate);
    println!("Avg win:   {:.2}", report.avg_win);
    println!("Avg loss:  {:.2}", report.avg_loss);

    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::build_router;
        use crate::ports::config_port::ConfigPort;
        use std::net::SocketAddr;
        use std::sync::Arc;

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tradelog=info,tower_http=debug".into()),
            )
            .init();

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        let store = match open_store(&config) {
            Ok(s) => s,
            Err(code) => return code,
        };

        let addr: SocketAddr = config
            .get_string("server", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:3000".parse().unwrap());

        eprintln!("Starting web server on {}", addr);

        let state = crate::adapters::web::AppState {
            store: Arc::new(store) as Arc<dyn TradeStore + Send + Sync>,
        };

        let router = build_router(state);

        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
            axum::serve(listener, router).await.unwrap();
        });

        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
