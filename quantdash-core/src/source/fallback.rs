//! Deterministic demonstration data shown when the backend is unreachable.
//!
//! The dataset is a fixed constant: same ids, metrics and timestamps on every
//! call, so "is this fallback data" can be asserted through the store's
//! `error` field alone.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::BTreeMap;

use crate::domain::{BacktestResult, BacktestTask, TaskStatus};

/// Advisory set on the store when fallback data replaces a failed refresh.
pub const FALLBACK_ADVISORY: &str = "backend unavailable, showing demo data";

/// Ids of the fallback tasks, in listing order.
const FALLBACK_TASK_IDS: [&str; 2] = ["demo_task_1", "demo_task_2"];

/// The fallback task list: two completed single-symbol tasks.
pub fn fallback_tasks() -> Vec<BacktestTask> {
    vec![
        demo_task(demo_result(
            FALLBACK_TASK_IDS[0],
            "BTCUSDT",
            "MA_Cross",
            params(&[("fast_period", 10), ("slow_period", 20)]),
            DemoMetrics {
                final_return: 15.23,
                annual_return: 12.45,
                max_drawdown: -8.67,
                sharpe_ratio: 1.24,
                win_rate: 65.4,
                total_trades: 156,
                profit_factor: 1.85,
                volatility: 18.9,
            },
            fixed_time(2024, 1, 2),
        )),
        demo_task(demo_result(
            FALLBACK_TASK_IDS[1],
            "ETHUSDT",
            "RSI_Strategy",
            params(&[("rsi_period", 14), ("oversold", 30), ("overbought", 70)]),
            DemoMetrics {
                final_return: -5.12,
                annual_return: -3.45,
                max_drawdown: -12.34,
                sharpe_ratio: 0.85,
                win_rate: 45.2,
                total_trades: 89,
                profit_factor: 0.92,
                volatility: 22.1,
            },
            fixed_time(2024, 1, 1),
        )),
    ]
}

struct DemoMetrics {
    final_return: f64,
    annual_return: f64,
    max_drawdown: f64,
    sharpe_ratio: f64,
    win_rate: f64,
    total_trades: u64,
    profit_factor: f64,
    volatility: f64,
}

fn demo_task(result: BacktestResult) -> BacktestTask {
    let mut task =
        BacktestTask::new(result.task_id.clone(), TaskStatus::Completed).with_results(vec![result]);
    task.progress = 100.0;
    task.message = "backtest complete".to_string();
    task
}

fn demo_result(
    task_id: &str,
    symbol: &str,
    strategy: &str,
    parameters: BTreeMap<String, serde_json::Value>,
    m: DemoMetrics,
    created_at: DateTime<Utc>,
) -> BacktestResult {
    BacktestResult {
        task_id: task_id.to_string(),
        symbol: symbol.to_string(),
        strategy: strategy.to_string(),
        parameters,
        final_return: m.final_return,
        annual_return: m.annual_return,
        max_drawdown: m.max_drawdown,
        sharpe_ratio: m.sharpe_ratio,
        win_rate: m.win_rate,
        total_trades: m.total_trades,
        profit_factor: Some(m.profit_factor),
        profit_loss_ratio: None,
        volatility: Some(m.volatility),
        equity_curve: Vec::new(),
        trade_records: Vec::new(),
        created_at,
    }
}

fn params(pairs: &[(&str, i64)]) -> BTreeMap<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

fn fixed_time(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_deterministic() {
        assert_eq!(fallback_tasks(), fallback_tasks());
    }

    #[test]
    fn fallback_has_completed_task_with_results() {
        let tasks = fallback_tasks();
        assert!(!tasks.is_empty());
        assert!(tasks
            .iter()
            .any(|t| t.status == TaskStatus::Completed && !t.results.is_empty()));
    }

    #[test]
    fn fallback_results_belong_to_their_task() {
        for task in fallback_tasks() {
            for r in &task.results {
                assert_eq!(r.task_id, task.task_id);
            }
        }
    }

    #[test]
    fn fallback_ids_match_constant() {
        let ids: Vec<String> = fallback_tasks().into_iter().map(|t| t.task_id).collect();
        assert_eq!(ids, FALLBACK_TASK_IDS);
    }
}
