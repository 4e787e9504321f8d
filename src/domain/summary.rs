//! Aggregate performance statistics over stored trades.

use serde::{Deserialize, Serialize};

use super::trade::Trade;

/// Aggregate report over a collection of trades. All values are 0 for the
/// empty collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total_pnl: f64,
    pub num_trades: usize,
    /// Percentage of trades with positive PnL, 0..=100.
    pub win_rate: f64,
    pub avg_win: f64,
    /// Signed mean over losing trades, so always <= 0.
    pub avg_loss: f64,
}

/// Order-independent summary of `trades`. A win is `pnl > 0`; a loss is
/// `pnl <= 0`, so a break-even trade counts as a loss, not a win.
pub fn compute_summary(trades: &[Trade]) -> SummaryReport {
    let mut total_pnl = 0.0_f64;
    let mut wins = 0usize;
    let mut win_sum = 0.0_f64;
    let mut losses = 0usize;
    let mut loss_sum = 0.0_f64;

    for trade in trades {
        total_pnl += trade.pnl;
        if trade.pnl > 0.0 {
            wins += 1;
            win_sum += trade.pnl;
        } else {
            losses += 1;
            loss_sum += trade.pnl;
        }
    }

    let num_trades = trades.len();
    let win_rate = if num_trades > 0 {
        wins as f64 / num_trades as f64 * 100.0
    } else {
        0.0
    };

    let avg_win = if wins > 0 { win_sum / wins as f64 } else { 0.0 };
    let avg_loss = if losses > 0 {
        loss_sum / losses as f64
    } else {
        0.0
    };

    SummaryReport {
        total_pnl,
        num_trades,
        win_rate,
        avg_win,
        avg_loss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Direction;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_trade(id: i64, pnl: f64) -> Trade {
        Trade {
            id,
            symbol: "BHP".into(),
            entry_price: 100.0,
            exit_price: 100.0,
            size: 1.0,
            direction: Direction::Buy,
            fees: 0.0,
            strategy: None,
            notes: None,
            entry_time: None,
            exit_time: None,
            pnl,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn summary_empty_is_all_zero() {
        let report = compute_summary(&[]);
        assert_eq!(report.num_trades, 0);
        assert!((report.total_pnl - 0.0).abs() < f64::EPSILON);
        assert!((report.win_rate - 0.0).abs() < f64::EPSILON);
        assert!((report.avg_win - 0.0).abs() < f64::EPSILON);
        assert!((report.avg_loss - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_mixed_trades() {
        let trades: Vec<Trade> = [10.0, -5.0, 0.0, 20.0]
            .iter()
            .enumerate()
            .map(|(i, &pnl)| make_trade(i as i64 + 1, pnl))
            .collect();

        let report = compute_summary(&trades);
        assert_eq!(report.num_trades, 4);
        assert_relative_eq!(report.total_pnl, 25.0);
        assert_relative_eq!(report.win_rate, 50.0);
        assert_relative_eq!(report.avg_win, 15.0);
        assert_relative_eq!(report.avg_loss, -2.5);
    }

    #[test]
    fn summary_break_even_counts_as_loss() {
        let report = compute_summary(&[make_trade(1, 0.0)]);
        assert!((report.win_rate - 0.0).abs() < f64::EPSILON);
        assert!((report.avg_win - 0.0).abs() < f64::EPSILON);
        assert!((report.avg_loss - 0.0).abs() < f64::EPSILON);
        assert_eq!(report.num_trades, 1);
    }

    #[test]
    fn summary_all_wins() {
        let trades = vec![make_trade(1, 10.0), make_trade(2, 30.0)];
        let report = compute_summary(&trades);
        assert_relative_eq!(report.win_rate, 100.0);
        assert_relative_eq!(report.avg_win, 20.0);
        assert!((report.avg_loss - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_all_losses() {
        let trades = vec![make_trade(1, -10.0), make_trade(2, -30.0)];
        let report = compute_summary(&trades);
        assert!((report.win_rate - 0.0).abs() < f64::EPSILON);
        assert!((report.avg_win - 0.0).abs() < f64::EPSILON);
        assert_relative_eq!(report.avg_loss, -20.0);
        assert_relative_eq!(report.total_pnl, -40.0);
    }

    #[test]
    fn summary_is_order_independent() {
        let forward: Vec<Trade> = [3.0, -2.0, 8.0]
            .iter()
            .enumerate()
            .map(|(i, &pnl)| make_trade(i as i64, pnl))
            .collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(compute_summary(&forward), compute_summary(&reversed));
    }
}
