//! Results store — single owner of tasks, results, selection and comparison.
//!
//! Canonical state is `tasks`; `results` is its flattened projection (results
//! of completed tasks, in task order). Selection and comparison are kept as
//! task ids, and the resolved views are recomputed from scratch whenever
//! `results` or the ids change, so they can never point at a result from an
//! earlier refresh.
//!
//! All mutation goes through `&mut self`, which makes the store the only
//! writer without any locking.

use crate::domain::{BacktestResult, BacktestTask, TaskId};
use crate::source::{fallback_tasks, ResultSource, SourceError, FALLBACK_ADVISORY};

/// Maximum number of tasks in the comparison set.
pub const MAX_COMPARE: usize = 4;

/// Refresh state machine. `refresh_data` always ends in `Loaded` or
/// `LoadedWithFallback`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshPhase {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A refresh is in flight; previous tasks are still shown.
    Loading,
    Loaded,
    /// The source failed and demo data replaced the task list.
    LoadedWithFallback,
}

/// What `add_to_compare` did. Rejections are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    Added,
    AlreadyPresent,
    AtCapacity,
}

/// How a refresh landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Live { tasks: usize },
    Fallback,
}

#[derive(Debug, Default)]
pub struct ResultsStore {
    tasks: Vec<BacktestTask>,
    results: Vec<BacktestResult>,

    selected_task_id: Option<TaskId>,
    /// Index into `results` of the first result of the selected task.
    selected_index: Option<usize>,

    compare_mode: bool,
    compare_task_ids: Vec<TaskId>,
    /// Indices into `results`, grouped in `compare_task_ids` order.
    compare_indices: Vec<usize>,

    phase: RefreshPhase,
    error: Option<String>,
}

impl ResultsStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Read access ──────────────────────────────────────────────────

    pub fn tasks(&self) -> &[BacktestTask] {
        &self.tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&BacktestTask> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn results(&self) -> &[BacktestResult] {
        &self.results
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        self.selected_task_id.as_deref()
    }

    /// First result of the selected task. Multi-symbol tasks resolve to
    /// their first symbol here; see `selected_results` for all of them.
    pub fn selected_result(&self) -> Option<&BacktestResult> {
        self.selected_index.map(|i| &self.results[i])
    }

    /// Every result of the selected task, in `results` order.
    pub fn selected_results(&self) -> Vec<&BacktestResult> {
        match &self.selected_task_id {
            Some(id) => self.results.iter().filter(|r| &r.task_id == id).collect(),
            None => Vec::new(),
        }
    }

    pub fn compare_mode(&self) -> bool {
        self.compare_mode
    }

    pub fn compare_task_ids(&self) -> &[TaskId] {
        &self.compare_task_ids
    }

    pub fn is_compared(&self, task_id: &str) -> bool {
        self.compare_task_ids.iter().any(|id| id == task_id)
    }

    pub fn compare_results(&self) -> Vec<&BacktestResult> {
        self.compare_indices.iter().map(|&i| &self.results[i]).collect()
    }

    pub fn loading(&self) -> bool {
        self.phase == RefreshPhase::Loading
    }

    /// Advisory message for a non-blocking banner. Set only by a failed
    /// refresh; cleared when the next refresh starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn is_fallback(&self) -> bool {
        self.phase == RefreshPhase::LoadedWithFallback
    }

    // ── Canonical data ───────────────────────────────────────────────

    /// Replace the task list. Results of completed tasks are flattened into
    /// `results`, then selection and comparison are re-resolved against them.
    pub fn set_tasks(&mut self, tasks: Vec<BacktestTask>) {
        let results = tasks
            .iter()
            .flat_map(|t| t.completed_results().iter().cloned())
            .collect();
        self.tasks = tasks;
        self.set_results(results);
    }

    /// Replace the flat result list directly and re-resolve derived views.
    /// `tasks` is left as is; `set_tasks` is the normal entry point.
    pub fn set_results(&mut self, results: Vec<BacktestResult>) {
        self.results = results;
        self.resolve_selection();
        self.resolve_compare();
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Select a task. The id does not have to be known yet; it is kept and
    /// resolved again on every refresh. Returns whether a result was found.
    pub fn select_task(&mut self, task_id: impl Into<TaskId>) -> bool {
        self.selected_task_id = Some(task_id.into());
        self.resolve_selection();
        self.selected_index.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.selected_task_id = None;
        self.selected_index = None;
    }

    // ── Comparison ───────────────────────────────────────────────────

    /// Flip compare mode and return the new value. Leaving compare mode
    /// empties the comparison set; entering it does not restore one.
    pub fn toggle_compare_mode(&mut self) -> bool {
        let was_on = self.compare_mode;
        self.compare_mode = !was_on;
        if was_on {
            self.clear_compare();
        }
        self.compare_mode
    }

    pub fn add_to_compare(&mut self, task_id: impl Into<TaskId>) -> CompareOutcome {
        let task_id = task_id.into();
        if self.is_compared(&task_id) {
            return CompareOutcome::AlreadyPresent;
        }
        if self.compare_task_ids.len() >= MAX_COMPARE {
            return CompareOutcome::AtCapacity;
        }
        self.compare_task_ids.push(task_id);
        self.resolve_compare();
        CompareOutcome::Added
    }

    /// Returns whether the id was in the set.
    pub fn remove_from_compare(&mut self, task_id: &str) -> bool {
        let before = self.compare_task_ids.len();
        self.compare_task_ids.retain(|id| id != task_id);
        let removed = self.compare_task_ids.len() != before;
        if removed {
            self.resolve_compare();
        }
        removed
    }

    pub fn clear_compare(&mut self) {
        self.compare_task_ids.clear();
        self.compare_indices.clear();
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch the task list from `source` and apply it. Never fails: a source
    /// error swaps in the fallback dataset and sets the advisory `error`.
    /// The loading flag is released on every exit, unwinding included.
    pub fn refresh_data<S: ResultSource + ?Sized>(&mut self, source: &S) -> RefreshOutcome {
        let mut guard = RefreshGuard::begin(self);
        let fetched = source.list_tasks();
        guard.store.finish_refresh(fetched)
    }

    /// First half of a refresh whose fetch runs elsewhere (e.g. a worker
    /// thread): enter `Loading` and clear the advisory.
    pub fn begin_refresh(&mut self) {
        self.phase = RefreshPhase::Loading;
        self.error = None;
    }

    /// Second half of a split refresh. Selection and comparison changes made
    /// since `begin_refresh` are honoured because both are resolved by id.
    pub fn finish_refresh(
        &mut self,
        fetched: Result<Vec<BacktestTask>, SourceError>,
    ) -> RefreshOutcome {
        match fetched {
            Ok(tasks) => {
                let count = tasks.len();
                self.set_tasks(tasks);
                self.error = None;
                self.phase = RefreshPhase::Loaded;
                log::info!("refreshed {count} tasks ({} results)", self.results.len());
                RefreshOutcome::Live { tasks: count }
            }
            Err(err) => {
                log::warn!("backend not available, using demo data: {err}");
                self.set_tasks(fallback_tasks());
                self.error = Some(FALLBACK_ADVISORY.to_string());
                self.phase = RefreshPhase::LoadedWithFallback;
                RefreshOutcome::Fallback
            }
        }
    }

    // ── Derived views ────────────────────────────────────────────────

    fn resolve_selection(&mut self) {
        self.selected_index = self
            .selected_task_id
            .as_ref()
            .and_then(|id| self.results.iter().position(|r| &r.task_id == id));
    }

    fn resolve_compare(&mut self) {
        let ids = &self.compare_task_ids;
        self.compare_indices = self
            .results
            .iter()
            .enumerate()
            .filter(|(_, r)| ids.contains(&r.task_id))
            .map(|(i, _)| i)
            .collect();
    }
}

/// Holds the store in `Loading` for the duration of a fetch and drops it
/// back to `Idle` if the fetch unwinds before `finish_refresh` ran.
struct RefreshGuard<'a> {
    store: &'a mut ResultsStore,
}

impl<'a> RefreshGuard<'a> {
    fn begin(store: &'a mut ResultsStore) -> Self {
        store.begin_refresh();
        Self { store }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if self.store.phase == RefreshPhase::Loading {
            self.store.phase = RefreshPhase::Idle;
        }
    }
}
