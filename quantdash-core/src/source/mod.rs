//! Remote result sources and structured error types.
//!
//! The ResultSource trait abstracts over where task listings come from (the
//! HTTP backend, an always-offline stub, test doubles) so the store never
//! depends on a concrete transport.

pub mod fallback;
pub mod http;

use thiserror::Error;

use crate::domain::BacktestTask;

pub use fallback::{fallback_tasks, FALLBACK_ADVISORY};
pub use http::{HttpResultSource, TaskResults};

/// Structured error types for source operations.
///
/// Every variant is treated the same way by the store: the refresh failed.
/// The distinction only matters for logs and CLI output.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("offline mode: no backend requests are made")]
    Offline,

    #[error("worker disconnected before the refresh completed")]
    Disconnected,
}

/// Trait for remote result sources.
pub trait ResultSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// List every task the backend knows about, in backend order.
    fn list_tasks(&self) -> Result<Vec<BacktestTask>, SourceError>;
}

/// A source that never reaches a backend. Every listing fails, which sends
/// the store down its fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSource;

impl ResultSource for OfflineSource {
    fn name(&self) -> &str {
        "offline"
    }

    fn list_tasks(&self) -> Result<Vec<BacktestTask>, SourceError> {
        Err(SourceError::Offline)
    }
}

impl<S: ResultSource + ?Sized> ResultSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_tasks(&self) -> Result<Vec<BacktestTask>, SourceError> {
        (**self).list_tasks()
    }
}
