#![cfg(feature = "sqlite")]
//! CLI integration tests with real config and CSV files on disk.

mod common;

use std::fs;
use std::path::PathBuf;

use common::SAMPLE_CSV;
use tradelog::adapters::file_config_adapter::FileConfigAdapter;
use tradelog::adapters::sqlite_store::SqliteStore;
use tradelog::cli::{self, Cli, Command};
use tradelog::ports::trade_store::TradeStore;

fn write_config(dir: &tempfile::TempDir) -> PathBuf {
    let db_path = dir.path().join("journal.db");
    let config_path = dir.path().join("tradelog.ini");
    fs::write(
        &config_path,
        format!("[sqlite]\npath = {}\npool_size = 1\n", db_path.display()),
    )
    .unwrap();
    config_path
}

#[test]
fn load_config_reads_ini() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = write_config(&dir);

    let config = cli::load_config(&config_path).unwrap();
    let store = SqliteStore::from_config(&config).unwrap();
    store.initialize_schema().unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn load_config_missing_file_is_error() {
    assert!(cli::load_config(&PathBuf::from("/does/not/exist.ini")).is_err());
}

#[test]
fn import_command_persists_parseable_rows() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = write_config(&dir);
    let csv_path = dir.path().join("fills.csv");
    fs::write(&csv_path, SAMPLE_CSV).unwrap();

    let _ = cli::run(Cli {
        command: Command::Import {
            config: config_path.clone(),
            file: csv_path,
        },
    });

    let config = FileConfigAdapter::from_file(&config_path).unwrap();
    let store = SqliteStore::from_config(&config).unwrap();
    let trades = store.list().unwrap();
    assert_eq!(trades.len(), 3);
}

#[test]
fn import_command_appends_on_repeat() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = write_config(&dir);
    let csv_path = dir.path().join("fills.csv");
    fs::write(&csv_path, SAMPLE_CSV).unwrap();

    for _ in 0..2 {
        let _ = cli::run(Cli {
            command: Command::Import {
                config: config_path.clone(),
                file: csv_path.clone(),
            },
        });
    }

    // Imports append; the journal does not dedup rows.
    let config = FileConfigAdapter::from_file(&config_path).unwrap();
    let store = SqliteStore::from_config(&config).unwrap();
    assert_eq!(store.list().unwrap().len(), 6);
}
