//! Metric catalogue — which result field a column shows and which way is better.

use serde::{Deserialize, Serialize};

use crate::domain::BacktestResult;

/// A comparable performance metric of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    FinalReturn,
    AnnualReturn,
    MaxDrawdown,
    SharpeRatio,
    WinRate,
    TotalTrades,
    ProfitFactor,
    Volatility,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::FinalReturn,
        Metric::AnnualReturn,
        Metric::MaxDrawdown,
        Metric::SharpeRatio,
        Metric::WinRate,
        Metric::TotalTrades,
        Metric::ProfitFactor,
        Metric::Volatility,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::FinalReturn => "Return",
            Metric::AnnualReturn => "Annual",
            Metric::MaxDrawdown => "MaxDD",
            Metric::SharpeRatio => "Sharpe",
            Metric::WinRate => "WinRate",
            Metric::TotalTrades => "Trades",
            Metric::ProfitFactor => "PF",
            Metric::Volatility => "Vol",
        }
    }

    /// Direction of "better". Drawdowns are reported as negative numbers, so
    /// the larger (closer to zero) value wins.
    pub fn higher_is_better(self) -> bool {
        !matches!(self, Metric::Volatility)
    }

    /// Metric value of a result. Optional metrics missing from the payload
    /// read as 0.0.
    pub fn value(self, result: &BacktestResult) -> f64 {
        match self {
            Metric::FinalReturn => result.final_return,
            Metric::AnnualReturn => result.annual_return,
            Metric::MaxDrawdown => result.max_drawdown,
            Metric::SharpeRatio => result.sharpe_ratio,
            Metric::WinRate => result.win_rate,
            Metric::TotalTrades => result.total_trades as f64,
            Metric::ProfitFactor => result.profit_factor.unwrap_or(0.0),
            Metric::Volatility => result.volatility.unwrap_or(0.0),
        }
    }

    /// Next metric in `ALL`, wrapping around.
    pub fn next(self) -> Metric {
        let i = Metric::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Metric::ALL[(i + 1) % Metric::ALL.len()]
    }
}

/// Index of the best result for `metric`. Ties keep the earliest entry.
/// `None` for an empty slice.
pub fn best_index<'a, I>(results: I, metric: Metric) -> Option<usize>
where
    I: IntoIterator<Item = &'a BacktestResult>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, r) in results.into_iter().enumerate() {
        let v = metric.value(r);
        let better = match best {
            None => true,
            Some((_, b)) if metric.higher_is_better() => v > b,
            Some((_, b)) => v < b,
        };
        if better {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::result;

    #[test]
    fn best_index_higher_is_better() {
        let rs = vec![
            result("a", "X", 0.1),
            result("b", "X", 0.3),
            result("c", "X", 0.2),
        ];
        assert_eq!(best_index(&rs, Metric::FinalReturn), Some(1));
    }

    #[test]
    fn best_index_lower_is_better_for_volatility() {
        let mut rs = vec![result("a", "X", 0.1), result("b", "X", 0.1)];
        rs[0].volatility = Some(0.3);
        rs[1].volatility = Some(0.1);
        assert_eq!(best_index(&rs, Metric::Volatility), Some(1));
    }

    #[test]
    fn drawdown_closer_to_zero_wins() {
        let mut rs = vec![result("a", "X", 0.1), result("b", "X", 0.1)];
        rs[0].max_drawdown = -0.25;
        rs[1].max_drawdown = -0.05;
        assert_eq!(best_index(&rs, Metric::MaxDrawdown), Some(1));
    }

    #[test]
    fn ties_keep_first() {
        let rs = vec![result("a", "X", 0.2), result("b", "X", 0.2)];
        assert_eq!(best_index(&rs, Metric::FinalReturn), Some(0));
    }

    #[test]
    fn empty_has_no_best() {
        let rs: Vec<BacktestResult> = vec![];
        assert_eq!(best_index(&rs, Metric::SharpeRatio), None);
    }

    #[test]
    fn missing_optional_metric_reads_zero() {
        let mut r = result("a", "X", 0.2);
        r.profit_factor = None;
        assert_eq!(Metric::ProfitFactor.value(&r), 0.0);
    }

    #[test]
    fn next_cycles_through_all() {
        let mut m = Metric::FinalReturn;
        for _ in 0..Metric::ALL.len() {
            m = m.next();
        }
        assert_eq!(m, Metric::FinalReturn);
    }
}
