//! Per-task result summary: symbol count, mean return, best symbol.

use serde::{Deserialize, Serialize};

use crate::domain::BacktestResult;
use crate::metric::{best_index, Metric};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total_symbols: usize,
    pub avg_return: f64,
    pub best_symbol: Option<String>,
}

impl TaskSummary {
    /// Summarise one task's results. An empty set averages to 0.0 and has no
    /// best symbol.
    pub fn from_results(results: &[BacktestResult]) -> Self {
        let total_symbols = results.len();
        let avg_return = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.final_return).sum::<f64>() / total_symbols as f64
        };
        let best_symbol =
            best_index(results, Metric::FinalReturn).map(|i| results[i].symbol.clone());
        Self {
            total_symbols,
            avg_return,
            best_symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::result;

    #[test]
    fn summarises_multi_symbol_task() {
        let rs = vec![
            result("t1", "BTCUSDT", 0.10),
            result("t1", "ETHUSDT", 0.30),
            result("t1", "SOLUSDT", -0.10),
        ];
        let s = TaskSummary::from_results(&rs);
        assert_eq!(s.total_symbols, 3);
        assert!((s.avg_return - 0.10).abs() < 1e-12);
        assert_eq!(s.best_symbol.as_deref(), Some("ETHUSDT"));
    }

    #[test]
    fn empty_results() {
        let s = TaskSummary::from_results(&[]);
        assert_eq!(s.total_symbols, 0);
        assert_eq!(s.avg_return, 0.0);
        assert!(s.best_symbol.is_none());
    }
}
