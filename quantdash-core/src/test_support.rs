//! Test helpers for building tasks and results.

use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

use crate::domain::{BacktestResult, BacktestTask, TaskStatus};

pub fn result(task_id: &str, symbol: &str, final_return: f64) -> BacktestResult {
    BacktestResult {
        task_id: task_id.to_string(),
        symbol: symbol.to_string(),
        strategy: "MA".to_string(),
        parameters: BTreeMap::new(),
        final_return,
        annual_return: final_return * 0.8,
        max_drawdown: -0.1,
        sharpe_ratio: 1.0,
        win_rate: 0.5,
        total_trades: 20,
        profit_factor: Some(1.5),
        profit_loss_ratio: None,
        volatility: Some(0.2),
        equity_curve: vec![],
        trade_records: vec![],
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn completed(task_id: &str, symbols: &[&str]) -> BacktestTask {
    let results = symbols
        .iter()
        .enumerate()
        .map(|(i, s)| result(task_id, s, 0.1 * (i + 1) as f64))
        .collect();
    BacktestTask::new(task_id, TaskStatus::Completed).with_results(results)
}

pub fn with_status(task_id: &str, status: TaskStatus) -> BacktestTask {
    BacktestTask::new(task_id, status)
}
