//! QuantDash Core — results store, remote result sources, and analytics.
//!
//! This crate holds everything the dashboard front ends share:
//! - Domain types (tasks, per-symbol results, status)
//! - The results store: selection, comparison set, refresh with fallback
//! - Result sources (HTTP backend, offline stub) behind one trait
//! - Deterministic demo data used when the backend is unreachable
//! - Metric catalogue, filtering/sorting, per-task summaries
//! - TOML configuration with environment overrides

pub mod config;
pub mod domain;
pub mod filter;
pub mod metric;
pub mod source;
pub mod store;
pub mod summary;

#[cfg(test)]
mod test_support;

pub use config::QuantDashConfig;
pub use domain::{BacktestResult, BacktestTask, TaskId, TaskStatus};
pub use source::{ResultSource, SourceError};
pub use store::{CompareOutcome, RefreshOutcome, RefreshPhase, ResultsStore, MAX_COMPARE};
