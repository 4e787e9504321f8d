//! SQLite trade store adapter.

use chrono::{NaiveDateTime, Timelike, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Row, params};

use crate::domain::error::JournalError;
use crate::domain::trade::{Direction, Trade, TradeInput};
use crate::ports::config_port::ConfigPort;
use crate::ports::trade_store::TradeStore;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const TRADE_COLUMNS: &str = "id, symbol, entry_price, exit_price, size, direction, fees, \
     strategy, notes, entry_time, exit_time, pnl, created_at";

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, JournalError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| JournalError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| JournalError::Database {
                    reason: e.to_string(),
                })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, JournalError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| JournalError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), JournalError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| JournalError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS trades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                entry_price REAL NOT NULL,
                exit_price REAL NOT NULL,
                size REAL NOT NULL,
                direction TEXT NOT NULL,
                fees REAL NOT NULL,
                strategy TEXT,
                notes TEXT,
                entry_time TEXT,
                exit_time TEXT,
                pnl REAL NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_trades_symbol ON trades(symbol);
            CREATE INDEX IF NOT EXISTS idx_trades_exit_time ON trades(exit_time);",
        )
        .map_err(|e: rusqlite::Error| JournalError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn parse_datetime_column(idx: usize, value: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_trade(row: &Row) -> rusqlite::Result<Trade> {
    let direction_str: String = row.get(5)?;
    let direction = match direction_str.as_str() {
        "buy" => Direction::Buy,
        "sell" => Direction::Sell,
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::other(format!(
                    "unknown direction: {other}"
                ))),
            ));
        }
    };

    let entry_time: Option<String> = row.get(9)?;
    let entry_time = entry_time
        .map(|v| parse_datetime_column(9, &v))
        .transpose()?;
    let exit_time: Option<String> = row.get(10)?;
    let exit_time = exit_time
        .map(|v| parse_datetime_column(10, &v))
        .transpose()?;
    let created_at_str: String = row.get(12)?;
    let created_at = parse_datetime_column(12, &created_at_str)?;

    Ok(Trade {
        id: row.get(0)?,
        symbol: row.get(1)?,
        entry_price: row.get(2)?,
        exit_price: row.get(3)?,
        size: row.get(4)?,
        direction,
        fees: row.get(6)?,
        strategy: row.get(7)?,
        notes: row.get(8)?,
        entry_time,
        exit_time,
        pnl: row.get(11)?,
        created_at,
    })
}

impl TradeStore for SqliteStore {
    fn insert(&self, input: &TradeInput) -> Result<Trade, JournalError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| JournalError::Database {
                reason: e.to_string(),
            })?;

        let pnl = input.pnl();
        // Stored with second precision, so truncate before returning the
        // in-memory copy to keep it identical to a later read.
        let created_at = Utc::now().naive_utc().with_nanosecond(0).unwrap();

        conn.execute(
            "INSERT INTO trades (symbol, entry_price, exit_price, size, direction, fees, \
             strategy, notes, entry_time, exit_time, pnl, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                input.symbol,
                input.entry_price,
                input.exit_price,
                input.size,
                input.direction.as_str(),
                input.fees,
                input.strategy,
                input.notes,
                input.entry_time.as_ref().map(format_datetime),
                input.exit_time.as_ref().map(format_datetime),
                pnl,
                format_datetime(&created_at),
            ],
        )
        .map_err(|e: rusqlite::Error| JournalError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        let id = conn.last_insert_rowid();

        Ok(Trade {
            id,
            symbol: input.symbol.clone(),
            entry_price: input.entry_price,
            exit_price: input.exit_price,
            size: input.size,
            direction: input.direction,
            fees: input.fees,
            strategy: input.strategy.clone(),
            notes: input.notes.clone(),
            entry_time: input.entry_time,
            exit_time: input.exit_time,
            pnl,
            created_at,
        })
    }

    fn get(&self, id: i64) -> Result<Trade, JournalError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| JournalError::Database {
                reason: e.to_string(),
            })?;

        let query = format!("SELECT {TRADE_COLUMNS} FROM trades WHERE id = ?1");
        conn.query_row(&query, params![id], row_to_trade)
            .map_err(|e: rusqlite::Error| match e {
                rusqlite::Error::QueryReturnedNoRows => JournalError::TradeNotFound { id },
                other => JournalError::DatabaseQuery {
                    reason: other.to_string(),
                },
            })
    }

    fn list(&self) -> Result<Vec<Trade>, JournalError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| JournalError::Database {
                reason: e.to_string(),
            })?;

        let query = format!("SELECT {TRADE_COLUMNS} FROM trades ORDER BY exit_time ASC");
        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| JournalError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

        let rows = stmt
            .query_map([], row_to_trade)
            .map_err(|e: rusqlite::Error| JournalError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut trades = Vec::new();
        for row in rows {
            trades.push(
                row.map_err(|e: rusqlite::Error| JournalError::DatabaseQuery {
                    reason: e.to_string(),
                })?,
            );
        }

        Ok(trades)
    }

    fn update(&self, id: i64, input: &TradeInput) -> Result<Trade, JournalError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| JournalError::Database {
                reason: e.to_string(),
            })?;

        let pnl = input.pnl();

        let changed = conn
            .execute(
                "UPDATE trades SET symbol = ?1, entry_price = ?2, exit_price = ?3, size = ?4, \
                 direction = ?5, fees = ?6, strategy = ?7, notes = ?8, entry_time = ?9, \
                 exit_time = ?10, pnl = ?11 WHERE id = ?12",
                params![
                    input.symbol,
                    input.entry_price,
                    input.exit_price,
                    input.size,
                    input.direction.as_str(),
                    input.fees,
                    input.strategy,
                    input.notes,
                    input.entry_time.as_ref().map(format_datetime),
                    input.exit_time.as_ref().map(format_datetime),
                    pnl,
                    id,
                ],
            )
            .map_err(|e: rusqlite::Error| JournalError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        if changed == 0 {
            return Err(JournalError::TradeNotFound { id });
        }

        drop(conn);
        self.get(id)
    }

    fn delete(&self, id: i64) -> Result<(), JournalError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| JournalError::Database {
                reason: e.to_string(),
            })?;

        let deleted = conn
            .execute("DELETE FROM trades WHERE id = ?1", params![id])
            .map_err(|e: rusqlite::Error| JournalError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        if deleted == 0 {
            return Err(JournalError::TradeNotFound { id });
        }

        Ok(())
    }
}
