//! Trade persistence port trait.

use crate::domain::error::JournalError;
use crate::domain::trade::{Trade, TradeInput};

/// Persistence boundary for trades. Implementations own identity and the
/// creation timestamp, and must recompute PnL from the input's fields on
/// every insert and update.
pub trait TradeStore {
    fn insert(&self, input: &TradeInput) -> Result<Trade, JournalError>;

    fn get(&self, id: i64) -> Result<Trade, JournalError>;

    /// All stored trades, ordered by exit time ascending.
    fn list(&self) -> Result<Vec<Trade>, JournalError>;

    /// Full-field replacement. `id` and `created_at` are preserved.
    fn update(&self, id: i64, input: &TradeInput) -> Result<Trade, JournalError>;

    fn delete(&self, id: i64) -> Result<(), JournalError>;
}
