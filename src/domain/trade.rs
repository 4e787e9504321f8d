//! Trade records and per-trade profit/loss.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Trade side. A buy profits when price rises, a sell when it falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Buy,
    Sell,
}

impl Direction {
    /// Lenient mapping used by the CSV importer: `buy` and `long` map to
    /// [`Direction::Buy`], every other value to [`Direction::Sell`].
    pub fn from_cell(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "buy" | "long" => Direction::Buy,
            _ => Direction::Sell,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }
}

/// An unpersisted trade, as submitted over the API or produced by the CSV
/// importer. Consumed once by the store, which assigns identity and PnL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeInput {
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub fees: f64,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub entry_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub exit_time: Option<NaiveDateTime>,
}

fn default_size() -> f64 {
    1.0
}

impl TradeInput {
    /// PnL for this input's current fields. The store calls this on every
    /// insert and full-field update; `pnl` is never accepted from a caller.
    pub fn pnl(&self) -> f64 {
        compute_pnl(
            self.direction,
            self.entry_price,
            self.exit_price,
            self.size,
            self.fees,
        )
    }
}

/// A stored trade. `id` and `created_at` are assigned by the store on first
/// insert; `pnl` is recomputed from the other fields at every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub direction: Direction,
    pub fees: f64,
    pub strategy: Option<String>,
    pub notes: Option<String>,
    pub entry_time: Option<NaiveDateTime>,
    pub exit_time: Option<NaiveDateTime>,
    pub pnl: f64,
    pub created_at: NaiveDateTime,
}

/// Signed, direction-aware profit/loss. Exact floating-point arithmetic,
/// no rounding.
pub fn compute_pnl(
    direction: Direction,
    entry_price: f64,
    exit_price: f64,
    size: f64,
    fees: f64,
) -> f64 {
    let gross = match direction {
        Direction::Buy => (exit_price - entry_price) * size,
        Direction::Sell => (entry_price - exit_price) * size,
    };
    gross - fees
}
