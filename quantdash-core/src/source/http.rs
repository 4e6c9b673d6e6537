//! HTTP result source backed by the backtest service's REST API.
//!
//! Endpoints (relative to the configured base URL):
//! - `GET backtest/tasks` — task listing, bare array or `{"tasks": [...]}`
//! - `GET backtest/status/{id}` — one task
//! - `GET backtest/results/{id}` — results and summary of a completed task
//! - `DELETE backtest/tasks/{id}` — remove a task
//!
//! No retries: a failed request is reported once and the caller decides.

use reqwest::blocking::{Client, Response};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ResultSource, SourceError};
use crate::config::ApiConfig;
use crate::domain::{BacktestResult, BacktestTask, TaskStatus};

/// Longest error body kept in `SourceError::Status`.
const MAX_ERROR_BODY: usize = 200;

/// Task listing as returned by the backend. Older builds return the bare
/// array; current ones wrap it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskListing {
    Bare(Vec<BacktestTask>),
    Wrapped { tasks: Vec<BacktestTask> },
}

impl TaskListing {
    fn into_tasks(self) -> Vec<BacktestTask> {
        match self {
            TaskListing::Bare(tasks) | TaskListing::Wrapped { tasks } => tasks,
        }
    }
}

/// Response of the per-task results endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResults {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub results: Vec<BacktestResult>,
    /// Backend-computed summary, passed through untouched.
    #[serde(default)]
    pub summary: Option<serde_json::Value>,
}

/// Result source that talks to the backtest backend over HTTP.
pub struct HttpResultSource {
    client: Client,
    base_url: Url,
    timeout_secs: u64,
    hydrate_results: bool,
}

impl HttpResultSource {
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SourceError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("quantdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout_secs: config.timeout_secs,
            hydrate_results: config.hydrate_results,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the current state of one task.
    pub fn task_status(&self, task_id: &str) -> Result<BacktestTask, SourceError> {
        self.get_json(&["backtest", "status", task_id])
    }

    /// Fetch the results and summary of a completed task.
    pub fn task_results(&self, task_id: &str) -> Result<TaskResults, SourceError> {
        self.get_json(&["backtest", "results", task_id])
    }

    /// Delete a task on the backend.
    pub fn delete_task(&self, task_id: &str) -> Result<(), SourceError> {
        let url = self.endpoint(&["backtest", "tasks", task_id])?;
        log::info!("DELETE {url}");
        self.send(Method::DELETE, url).map(|_| ())
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, SourceError> {
        let url = self.endpoint(segments)?;
        log::debug!("GET {url}");
        let response = self.send(Method::GET, url)?;
        let body = response.text().map_err(|e| self.map_transport(e))?;
        serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn send(&self, method: Method, url: Url) -> Result<Response, SourceError> {
        let response = self
            .client
            .request(method, url)
            .send()
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn map_transport(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else {
            SourceError::Unreachable(err.to_string())
        }
    }

    /// The listing endpoint omits results; fill them in for completed tasks.
    /// A task whose results are gone (404) was deleted after the listing and
    /// is dropped; any other failure fails the whole listing.
    fn hydrate(&self, tasks: Vec<BacktestTask>) -> Result<Vec<BacktestTask>, SourceError> {
        let mut hydrated = Vec::with_capacity(tasks.len());
        for mut task in tasks {
            if task.is_completed() && task.results.is_empty() {
                match self.task_results(&task.task_id) {
                    Ok(fetched) => {
                        task.symbols_completed = task.symbols_completed.max(fetched.results.len());
                        task.results = fetched.results;
                    }
                    Err(SourceError::Status { status: 404, .. }) => {
                        log::info!("task {} vanished before its results were fetched", task.task_id);
                        continue;
                    }
                    Err(err) => return Err(err),
                }
            }
            hydrated.push(task);
        }
        Ok(hydrated)
    }
}

impl ResultSource for HttpResultSource {
    fn name(&self) -> &str {
        "http"
    }

    fn list_tasks(&self) -> Result<Vec<BacktestTask>, SourceError> {
        let listing: TaskListing = self.get_json(&["backtest", "tasks"])?;
        let mut tasks = listing.into_tasks();
        if self.hydrate_results {
            tasks = self.hydrate(tasks)?;
        }
        log::debug!("listed {} tasks from {}", tasks.len(), self.base_url);
        Ok(tasks)
    }
}
