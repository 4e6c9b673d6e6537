//! Domain types — tasks, per-symbol results, and their wire representation.

pub mod result;
pub mod task;

pub use result::BacktestResult;
pub use task::{BacktestTask, TaskId, TaskStatus};
