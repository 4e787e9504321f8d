#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Mutex;

use tradelog::domain::error::JournalError;
use tradelog::domain::trade::{Direction, Trade, TradeInput};
use tradelog::ports::trade_store::TradeStore;

/// Mixed-quality import document: one buy, one sell via secondary aliases,
/// one row with an unparseable price (dropped), one date-less long row.
pub const SAMPLE_CSV: &str = "\
ticker,Open_Time,close_time,buy_price,sell_price,qty,commission,tag,comment,side
BHP,2024-01-15 09:30:00,2024-01-15 15:45:00,100.0,110.0,10,5.0,breakout,first,buy
CBA,2024-01-16,2024-01-17,50.0,45.0,2,0.0,,second,sell
BAD,2024-01-18,2024-01-19,oops,45.0,1,0,,,buy
WBC,,,20.0,20.0,1,0,,,long
";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

pub fn make_input(symbol: &str, entry: f64, exit: f64, direction: Direction) -> TradeInput {
    TradeInput {
        symbol: symbol.into(),
        entry_price: entry,
        exit_price: exit,
        size: 1.0,
        direction,
        fees: 0.0,
        strategy: None,
        notes: None,
        entry_time: None,
        exit_time: None,
    }
}

struct MemoryInner {
    trades: Vec<Trade>,
    next_id: i64,
}

/// In-memory store honoring the persistence contract: PnL recomputed on
/// every write, ids assigned on first insert, created_at preserved across
/// updates.
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                trades: Vec::new(),
                next_id: 0,
            }),
        }
    }
}

impl TradeStore for MemoryStore {
    fn insert(&self, input: &TradeInput) -> Result<Trade, JournalError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let trade = Trade {
            id: inner.next_id,
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
            pnl: input.pnl(),
            created_at: datetime(2024, 1, 1, 0, 0),
        };
        inner.trades.push(trade.clone());
        Ok(trade)
    }

    fn get(&self, id: i64) -> Result<Trade, JournalError> {
        let inner = self.inner.lock().unwrap();
        inner
            .trades
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(JournalError::TradeNotFound { id })
    }

    fn list(&self) -> Result<Vec<Trade>, JournalError> {
        let inner = self.inner.lock().unwrap();
        let mut trades = inner.trades.clone();
        trades.sort_by_key(|t| t.exit_time);
        Ok(trades)
    }

    fn update(&self, id: i64, input: &TradeInput) -> Result<Trade, JournalError> {
        let mut inner = self.inner.lock().unwrap();
        let trade = inner
            .trades
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(JournalError::TradeNotFound { id })?;

        trade.symbol = input.symbol.clone();
        trade.entry_price = input.entry_price;
        trade.exit_price = input.exit_price;
        trade.size = input.size;
        trade.direction = input.direction;
        trade.fees = input.fees;
        trade.strategy = input.strategy.clone();
        trade.notes = input.notes.clone();
        trade.entry_time = input.entry_time;
        trade.exit_time = input.exit_time;
        trade.pnl = input.pnl();

        Ok(trade.clone())
    }

    fn delete(&self, id: i64) -> Result<(), JournalError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.trades.len();
        inner.trades.retain(|t| t.id != id);
        if inner.trades.len() == before {
            return Err(JournalError::TradeNotFound { id });
        }
        Ok(())
    }
}
