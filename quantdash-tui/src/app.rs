//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here, the results store included. The worker thread
//! owns the result source and communicates via channels.

use std::collections::BTreeSet;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use quantdash_core::config::UiConfig;
use quantdash_core::filter::{available_strategies, available_symbols, ResultFilter};
use quantdash_core::{
    BacktestResult, BacktestTask, CompareOutcome, RefreshOutcome, ResultsStore, SourceError,
    MAX_COMPARE,
};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Tasks,
    Results,
    Compare,
    Help,
}

impl Panel {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            Panel::Tasks => 0,
            Panel::Results => 1,
            Panel::Compare => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Tasks),
            1 => Some(Panel::Results),
            2 => Some(Panel::Compare),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Tasks => "Tasks",
            Panel::Results => "Results",
            Panel::Compare => "Compare",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Tasks)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Tasks)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    /// Detail of the store's selected task.
    Detail,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,
    pub overlay: Overlay,

    // Data
    pub store: ResultsStore,
    pub filter: ResultFilter,

    // Cursors
    pub tasks_cursor: usize,
    /// Index into the filtered results view, not into `store.results()`.
    pub results_cursor: usize,
    pub compare_cursor: usize,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    pub source_name: String,

    // Refresh timing
    pub auto_refresh: Option<Duration>,
    pub last_refresh: Option<Instant>,

    pub status_message: Option<(String, StatusLevel)>,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        source_name: impl Into<String>,
        ui: &UiConfig,
    ) -> Self {
        Self {
            active_panel: Panel::Tasks,
            running: true,
            overlay: if ui.welcome {
                Overlay::Welcome
            } else {
                Overlay::None
            },
            store: ResultsStore::new(),
            filter: ResultFilter::default(),
            tasks_cursor: 0,
            results_cursor: 0,
            compare_cursor: 0,
            worker_tx,
            worker_rx,
            source_name: source_name.into(),
            auto_refresh: ui.auto_refresh_secs.filter(|s| *s > 0).map(Duration::from_secs),
            last_refresh: None,
            status_message: None,
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Ask the worker for a fresh task list. Requests made while one is in
    /// flight queue behind it on the channel.
    pub fn request_refresh(&mut self) {
        self.store.begin_refresh();
        self.last_refresh = Some(Instant::now());
        if self.worker_tx.send(WorkerCommand::Refresh).is_err() {
            log::error!("worker channel closed; refresh cannot be sent");
            self.apply_refresh(Err(SourceError::Disconnected));
            self.set_error("Background worker stopped; showing demo data");
            return;
        }
        self.set_status(format!("Refreshing from {}...", self.source_name));
    }

    /// Land a refresh outcome in the store and keep cursors in range.
    pub fn apply_refresh(&mut self, fetched: Result<Vec<BacktestTask>, SourceError>) {
        match self.store.finish_refresh(fetched) {
            RefreshOutcome::Live { tasks } => {
                self.set_status(format!(
                    "Loaded {tasks} tasks, {} results",
                    self.store.results().len()
                ));
            }
            RefreshOutcome::Fallback => {
                self.set_warning("Backend unavailable, showing demo data (r to retry)");
            }
        }
        self.clamp_cursors();
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Refreshed(fetched) => self.apply_refresh(fetched),
        }
    }

    /// True when auto-refresh is on, nothing is in flight, and the interval
    /// has elapsed since the last request.
    pub fn refresh_due(&self, now: Instant) -> bool {
        let Some(every) = self.auto_refresh else {
            return false;
        };
        if self.store.loading() {
            return false;
        }
        match self.last_refresh {
            Some(last) => now.saturating_duration_since(last) >= every,
            None => true,
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Filtered, sorted indices into `store.results()`.
    pub fn visible_results(&self) -> Vec<usize> {
        self.filter.apply(self.store.results())
    }

    pub fn cursor_task(&self) -> Option<&BacktestTask> {
        self.store.tasks().get(self.tasks_cursor)
    }

    pub fn cursor_result(&self) -> Option<&BacktestResult> {
        let visible = self.visible_results();
        visible
            .get(self.results_cursor)
            .map(|&i| &self.store.results()[i])
    }

    pub fn clamp_cursors(&mut self) {
        self.tasks_cursor = clamp(self.tasks_cursor, self.store.tasks().len());
        self.results_cursor = clamp(self.results_cursor, self.visible_results().len());
        self.compare_cursor = clamp(self.compare_cursor, self.store.compare_task_ids().len());
    }

    // ── Selection & comparison ───────────────────────────────────────

    pub fn select(&mut self, task_id: &str) {
        if self.store.select_task(task_id) {
            self.overlay = Overlay::Detail;
        } else {
            self.set_warning(format!("Task {task_id} has no results yet"));
        }
    }

    /// Add the task to the comparison set, or take it out if already there.
    pub fn toggle_compared(&mut self, task_id: &str) {
        if !self.store.compare_mode() {
            self.set_warning("Compare mode is off (press c)");
            return;
        }
        if self.store.remove_from_compare(task_id) {
            self.set_status(format!("Removed {task_id} from comparison"));
            self.clamp_cursors();
            return;
        }
        match self.store.add_to_compare(task_id) {
            CompareOutcome::Added => self.set_status(format!(
                "Comparing {}/{MAX_COMPARE}",
                self.store.compare_task_ids().len()
            )),
            CompareOutcome::AtCapacity => {
                self.set_warning(format!("At most {MAX_COMPARE} tasks can be compared"))
            }
            CompareOutcome::AlreadyPresent => {}
        }
    }

    pub fn toggle_compare_mode(&mut self) {
        if self.store.toggle_compare_mode() {
            self.set_status("Compare mode on: Space adds the task under the cursor");
        } else {
            self.set_status("Compare mode off");
        }
        self.clamp_cursors();
    }

    // ── Filter ───────────────────────────────────────────────────────

    /// Step the strategy allow-list through: all → each strategy → all.
    pub fn cycle_strategy_filter(&mut self) {
        let options = available_strategies(self.store.results());
        step_allow_list(&mut self.filter.strategies, &options);
        self.results_cursor = 0;
    }

    /// Same as the strategy cycle, over symbols.
    pub fn cycle_symbol_filter(&mut self) {
        let options = available_symbols(self.store.results());
        step_allow_list(&mut self.filter.symbols, &options);
        self.results_cursor = 0;
    }

    // ── Status ───────────────────────────────────────────────────────

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

/// Replace a single-entry allow-list with the option after it; past the
/// last option the list empties again (all allowed).
fn step_allow_list(allowed: &mut BTreeSet<String>, options: &BTreeSet<String>) {
    let next = match allowed.iter().next() {
        None => options.iter().next().cloned(),
        Some(current) => options.iter().find(|o| *o > current).cloned(),
    };
    allowed.clear();
    allowed.extend(next);
}

fn clamp(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}
