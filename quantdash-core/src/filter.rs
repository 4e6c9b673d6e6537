//! Result filtering and sorting for list views.
//!
//! A filter is a pure projection over the store's flattened results: it
//! returns indices, never copies or edits results.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::domain::BacktestResult;
use crate::metric::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFilter {
    /// Allowed strategies; empty allows all.
    pub strategies: BTreeSet<String>,
    /// Allowed symbols; empty allows all.
    pub symbols: BTreeSet<String>,
    pub only_profitable: bool,
    pub min_trades: u64,
    /// `None` keeps store order.
    pub sort_by: Option<Metric>,
    pub sort_order: SortOrder,
}

impl Default for ResultFilter {
    fn default() -> Self {
        Self {
            strategies: BTreeSet::new(),
            symbols: BTreeSet::new(),
            only_profitable: false,
            min_trades: 0,
            sort_by: None,
            sort_order: SortOrder::Desc,
        }
    }
}

impl ResultFilter {
    pub fn matches(&self, r: &BacktestResult) -> bool {
        (self.strategies.is_empty() || self.strategies.contains(&r.strategy))
            && (self.symbols.is_empty() || self.symbols.contains(&r.symbol))
            && (!self.only_profitable || r.is_profitable())
            && r.total_trades >= self.min_trades
    }

    /// Indices into `results` that pass the filter, in display order.
    /// Sorting is stable, so equal values keep store order.
    pub fn apply(&self, results: &[BacktestResult]) -> Vec<usize> {
        let mut idx: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect();

        if let Some(metric) = self.sort_by {
            idx.sort_by(|&a, &b| {
                let ord = metric
                    .value(&results[a])
                    .partial_cmp(&metric.value(&results[b]))
                    .unwrap_or(Ordering::Equal);
                match self.sort_order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        idx
    }

    /// Step through sort keys: unsorted → each metric → unsorted.
    pub fn cycle_sort(&mut self) {
        self.sort_by = match self.sort_by {
            None => Some(Metric::ALL[0]),
            Some(m) if m == Metric::ALL[Metric::ALL.len() - 1] => None,
            Some(m) => Some(m.next()),
        };
    }
}

/// Distinct strategy names present in `results`, sorted.
pub fn available_strategies(results: &[BacktestResult]) -> BTreeSet<String> {
    results.iter().map(|r| r.strategy.clone()).collect()
}

/// Distinct symbols present in `results`, sorted.
pub fn available_symbols(results: &[BacktestResult]) -> BTreeSet<String> {
    results.iter().map(|r| r.symbol.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::result;

    fn sample() -> Vec<BacktestResult> {
        let mut rs = vec![
            result("t1", "BTCUSDT", 0.15),
            result("t2", "ETHUSDT", -0.05),
            result("t3", "SOLUSDT", 0.40),
        ];
        rs[1].strategy = "RSI".into();
        rs[2].total_trades = 3;
        rs
    }

    #[test]
    fn default_filter_keeps_everything_in_order() {
        let rs = sample();
        assert_eq!(ResultFilter::default().apply(&rs), vec![0, 1, 2]);
    }

    #[test]
    fn profitable_only_and_min_trades() {
        let rs = sample();
        let f = ResultFilter {
            only_profitable: true,
            min_trades: 10,
            ..Default::default()
        };
        assert_eq!(f.apply(&rs), vec![0]);
    }

    #[test]
    fn strategy_allow_list() {
        let rs = sample();
        let f = ResultFilter {
            strategies: ["RSI".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(f.apply(&rs), vec![1]);
    }

    #[test]
    fn symbol_allow_list() {
        let rs = sample();
        let f = ResultFilter {
            symbols: ["SOLUSDT".to_string(), "BTCUSDT".to_string()]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        assert_eq!(f.apply(&rs), vec![0, 2]);
    }

    #[test]
    fn sorts_by_metric_both_ways() {
        let rs = sample();
        let mut f = ResultFilter {
            sort_by: Some(Metric::FinalReturn),
            ..Default::default()
        };
        assert_eq!(f.apply(&rs), vec![2, 0, 1]);
        f.sort_order = f.sort_order.toggle();
        assert_eq!(f.apply(&rs), vec![1, 0, 2]);
    }

    #[test]
    fn cycle_sort_wraps_back_to_unsorted() {
        let mut f = ResultFilter::default();
        f.cycle_sort();
        assert_eq!(f.sort_by, Some(Metric::FinalReturn));
        for _ in 1..Metric::ALL.len() {
            f.cycle_sort();
        }
        assert_eq!(f.sort_by, Some(Metric::Volatility));
        f.cycle_sort();
        assert_eq!(f.sort_by, None);
    }

    #[test]
    fn available_sets() {
        let rs = sample();
        assert_eq!(available_strategies(&rs).len(), 2);
        assert_eq!(available_symbols(&rs).len(), 3);
    }
}
