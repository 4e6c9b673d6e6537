//! Property tests for results store invariants.
//!
//! Uses proptest to verify:
//! 1. Flatten — `results` is exactly the completed tasks' results, in order
//! 2. Compare set — never more than four ids, never a duplicate
//! 3. Derived views — selection and comparison always point at current results
//! 4. Filter — `apply` returns a subset of matching indices, each once

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

use quantdash_core::filter::ResultFilter;
use quantdash_core::metric::Metric;
use quantdash_core::{BacktestResult, BacktestTask, ResultsStore, TaskStatus, MAX_COMPARE};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::Running),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Failed),
    ]
}

fn arb_result(task_id: String) -> impl Strategy<Value = BacktestResult> {
    (
        prop::sample::select(vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]),
        prop::sample::select(vec!["MA_Cross", "RSI_Strategy"]),
        -0.5..1.0_f64,
        0u64..200,
    )
        .prop_map(move |(symbol, strategy, ret, trades)| BacktestResult {
            task_id: task_id.clone(),
            symbol: symbol.to_string(),
            strategy: strategy.to_string(),
            parameters: BTreeMap::new(),
            final_return: ret,
            annual_return: ret * 0.9,
            max_drawdown: -0.1,
            sharpe_ratio: ret * 2.0,
            win_rate: 0.5,
            total_trades: trades,
            profit_factor: None,
            profit_loss_ratio: None,
            volatility: None,
            equity_curve: vec![],
            trade_records: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        })
}

/// Task ids are drawn from a small pool so duplicates and misses both occur.
fn arb_task_id() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|n| format!("t{n}"))
}

fn arb_task() -> impl Strategy<Value = BacktestTask> {
    (arb_task_id(), arb_status()).prop_flat_map(|(id, status)| {
        prop::collection::vec(arb_result(id.clone()), 0..4).prop_map(move |results| {
            let mut task = BacktestTask::new(id.clone(), status);
            task.results = results;
            task
        })
    })
}

fn arb_tasks() -> impl Strategy<Value = Vec<BacktestTask>> {
    prop::collection::vec(arb_task(), 0..8)
}

#[derive(Debug, Clone)]
enum Op {
    Select(String),
    ClearSelection,
    Toggle,
    Add(String),
    Remove(String),
    ClearCompare,
    SetTasks(Vec<BacktestTask>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_task_id().prop_map(Op::Select),
        Just(Op::ClearSelection),
        Just(Op::Toggle),
        arb_task_id().prop_map(Op::Add),
        arb_task_id().prop_map(Op::Remove),
        Just(Op::ClearCompare),
        arb_tasks().prop_map(Op::SetTasks),
    ]
}

fn apply(store: &mut ResultsStore, op: Op) {
    match op {
        Op::Select(id) => {
            store.select_task(id);
        }
        Op::ClearSelection => store.clear_selection(),
        Op::Toggle => {
            store.toggle_compare_mode();
        }
        Op::Add(id) => {
            store.add_to_compare(id);
        }
        Op::Remove(id) => {
            store.remove_from_compare(&id);
        }
        Op::ClearCompare => store.clear_compare(),
        Op::SetTasks(tasks) => store.set_tasks(tasks),
    }
}

// ── 1. Flatten ───────────────────────────────────────────────────────

proptest! {
    /// `results` equals the concatenation of completed tasks' results.
    #[test]
    fn results_are_flattened_completed_tasks(tasks in arb_tasks()) {
        let expected: Vec<BacktestResult> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .flat_map(|t| t.results.iter().cloned())
            .collect();

        let mut store = ResultsStore::new();
        store.set_tasks(tasks.clone());

        prop_assert_eq!(store.results(), expected.as_slice());
        prop_assert_eq!(store.tasks(), tasks.as_slice());
    }
}

// ── 2. Compare set bounds ────────────────────────────────────────────

proptest! {
    /// Any sequence of operations keeps the set bounded and duplicate-free,
    /// and switching compare mode off always leaves it empty.
    #[test]
    fn compare_set_bounded_and_unique(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut store = ResultsStore::new();
        for op in ops {
            let was_comparing = store.compare_mode();
            let toggled = matches!(op, Op::Toggle);
            apply(&mut store, op);
            if toggled && was_comparing {
                prop_assert!(store.compare_task_ids().is_empty());
            }

            let ids = store.compare_task_ids();
            prop_assert!(ids.len() <= MAX_COMPARE);
            let unique: HashSet<&String> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());
        }
    }

    /// Adding to a full set never changes it.
    #[test]
    fn full_compare_set_rejects_new_ids(extra in "[a-z]{1,6}") {
        let mut store = ResultsStore::new();
        for id in ["t0", "t1", "t2", "t3"] {
            store.add_to_compare(id);
        }
        let before = store.compare_task_ids().to_vec();
        store.add_to_compare(extra);
        prop_assert_eq!(store.compare_task_ids(), before.as_slice());
    }
}

// ── 3. Derived views stay consistent ─────────────────────────────────

proptest! {
    /// After any operation sequence, derived views match a from-scratch
    /// resolution over the current results.
    #[test]
    fn derived_views_match_current_results(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut store = ResultsStore::new();
        for op in ops {
            apply(&mut store, op);

            let expected_selected = store
                .selected_task_id()
                .and_then(|id| store.results().iter().find(|r| r.task_id == id));
            prop_assert_eq!(store.selected_result(), expected_selected);

            let expected_compare: Vec<&BacktestResult> = store
                .results()
                .iter()
                .filter(|r| store.compare_task_ids().contains(&r.task_id))
                .collect();
            prop_assert_eq!(store.compare_results(), expected_compare);
        }
    }
}

// ── 4. Filter projection ─────────────────────────────────────────────

proptest! {
    /// Filtered indices are in range, unique, and each one matches.
    #[test]
    fn filter_returns_unique_matching_indices(
        tasks in arb_tasks(),
        only_profitable in any::<bool>(),
        min_trades in 0u64..150,
        sort in prop::option::of(prop::sample::select(Metric::ALL.to_vec())),
    ) {
        let mut store = ResultsStore::new();
        store.set_tasks(tasks);
        let filter = ResultFilter {
            only_profitable,
            min_trades,
            sort_by: sort,
            ..Default::default()
        };

        let idx = filter.apply(store.results());
        let unique: HashSet<usize> = idx.iter().copied().collect();
        prop_assert_eq!(unique.len(), idx.len());
        for &i in &idx {
            prop_assert!(i < store.results().len());
            prop_assert!(filter.matches(&store.results()[i]));
        }
        let matching = store.results().iter().filter(|r| filter.matches(r)).count();
        prop_assert_eq!(idx.len(), matching);
    }
}
