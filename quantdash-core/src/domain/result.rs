//! Per-symbol backtest outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::task::TaskId;

/// One symbol/strategy outcome within a task.
///
/// Identity is the pair (`task_id`, `symbol`). Metric fields are carried
/// through as reported by the backend; nothing here recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub task_id: TaskId,
    pub symbol: String,
    pub strategy: String,

    /// Strategy parameters (e.g. `fast_period`), opaque to the dashboard.
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,

    pub final_return: f64,
    pub annual_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub win_rate: f64,
    pub total_trades: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_loss_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,

    /// Raw equity curve points, passed through to chart collaborators.
    #[serde(default)]
    pub equity_curve: Vec<serde_json::Value>,
    #[serde(default)]
    pub trade_records: Vec<serde_json::Value>,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl BacktestResult {
    /// Short "SYMBOL / strategy" label for pickers and table rows.
    pub fn label(&self) -> String {
        format!("{} / {}", self.symbol, self.strategy)
    }

    pub fn is_profitable(&self) -> bool {
        self.final_return > 0.0
    }
}

/// `created_at` accepts RFC 3339 as well as the naive ISO-8601 form the
/// backend emits for timezone-less datetimes; naive values are taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const WIRE: &str = r#"{
        "task_id": "t1",
        "symbol": "BTCUSDT",
        "strategy": "MA",
        "parameters": {"fast_period": 10, "slow_period": 20},
        "final_return": 0.15,
        "annual_return": 0.12,
        "max_drawdown": -0.08,
        "sharpe_ratio": 1.24,
        "win_rate": 0.65,
        "total_trades": 156,
        "equity_curve": [{"date": "2024-01-01", "equity": 10000.0}],
        "created_at": "2024-03-01T12:30:00.250000"
    }"#;

    #[test]
    fn parses_backend_payload() {
        let r: BacktestResult = serde_json::from_str(WIRE).unwrap();
        assert_eq!(r.task_id, "t1");
        assert_eq!(r.symbol, "BTCUSDT");
        assert_eq!(r.total_trades, 156);
        assert_eq!(r.parameters["fast_period"], 10);
        assert_eq!(r.equity_curve.len(), 1);
        assert!(r.profit_factor.is_none());
        assert!(r.trade_records.is_empty());
        assert_eq!(
            r.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
                + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn accepts_rfc3339_with_offset() {
        let parsed = timestamp::parse("2024-03-01T14:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn accepts_space_separated_naive() {
        assert!(timestamp::parse("2024-03-01 12:30:00").is_some());
    }

    #[test]
    fn rejects_garbage_timestamp() {
        let bad = WIRE.replace("2024-03-01T12:30:00.250000", "yesterday");
        let parsed: Result<BacktestResult, _> = serde_json::from_str(&bad);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_required_metric_is_rejected() {
        let bad = WIRE.replace("\"sharpe_ratio\": 1.24,", "");
        let parsed: Result<BacktestResult, _> = serde_json::from_str(&bad);
        assert!(parsed.is_err());
    }

    #[test]
    fn label_and_profitability() {
        let r: BacktestResult = serde_json::from_str(WIRE).unwrap();
        assert_eq!(r.label(), "BTCUSDT / MA");
        assert!(r.is_profitable());
    }
}
