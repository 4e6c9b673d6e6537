//! Backtest tasks as reported by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::result::BacktestResult;

/// Opaque backend-assigned task identifier.
pub type TaskId = String;

/// Lifecycle status of a backtest task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// True once the task will no longer change status.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One submitted backtest job.
///
/// Only `task_id` and `status` are required on the wire; the backend's task
/// listing omits results and the progress counters are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestTask {
    pub task_id: TaskId,
    pub status: TaskStatus,

    /// Percent complete, 0–100.
    #[serde(default)]
    pub progress: f64,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub symbols_total: usize,

    #[serde(default)]
    pub symbols_completed: usize,

    /// Per-symbol results, in backend order. Populated once completed.
    #[serde(default)]
    pub results: Vec<BacktestResult>,
}

impl BacktestTask {
    /// A bare task with no progress information and no results.
    pub fn new(task_id: impl Into<TaskId>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            progress: 0.0,
            message: String::new(),
            symbols_total: 0,
            symbols_completed: 0,
            results: Vec::new(),
        }
    }

    /// Attach results, marking the symbol counters accordingly.
    pub fn with_results(mut self, results: Vec<BacktestResult>) -> Self {
        self.symbols_total = self.symbols_total.max(results.len());
        self.symbols_completed = results.len();
        self.results = results;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Results contributed to the flattened view: only completed tasks count.
    pub fn completed_results(&self) -> &[BacktestResult] {
        if self.is_completed() {
            &self.results
        } else {
            &[]
        }
    }
}
