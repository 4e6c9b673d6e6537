//! Plain-text rendering of store views for terminal output.

use std::fmt::Write;

use quantdash_core::metric::{best_index, Metric};
use quantdash_core::summary::TaskSummary;
use quantdash_core::{BacktestResult, BacktestTask};

pub fn tasks_table(tasks: &[BacktestTask]) -> String {
    let mut out = String::new();
    if tasks.is_empty() {
        out.push_str("No tasks.\n");
        return out;
    }
    let _ = writeln!(
        out,
        "{:<28} {:<10} {:>8} {:>9} {:>8}  {}",
        "TASK", "STATUS", "PROGRESS", "SYMBOLS", "RESULTS", "MESSAGE"
    );
    for t in tasks {
        let _ = writeln!(
            out,
            "{:<28} {:<10} {:>7.0}% {:>4}/{:<4} {:>8}  {}",
            t.task_id,
            t.status.label(),
            t.progress,
            t.symbols_completed,
            t.symbols_total,
            t.completed_results().len(),
            t.message
        );
    }
    out
}

/// Status of a single task. Unfinished tasks get a hint to poll again.
pub fn task_status(task: &BacktestTask) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task:      {}", task.task_id);
    let _ = writeln!(out, "Status:    {}", task.status);
    let _ = writeln!(
        out,
        "Progress:  {:.0}% ({}/{} symbols)",
        task.progress, task.symbols_completed, task.symbols_total
    );
    if !task.message.is_empty() {
        let _ = writeln!(out, "Message:   {}", task.message);
    }
    if !task.status.is_terminal() {
        let _ = writeln!(out, "\nStill in progress; run `quantdash status {}` again.", task.task_id);
    }
    out
}

/// Full detail for one result, followed by the task summary when the task
/// has more than one symbol.
pub fn result_detail(selected: &BacktestResult, all: &[BacktestResult]) -> String {
    let mut out = String::new();
    let r = selected;
    let _ = writeln!(out, "Task:          {}", r.task_id);
    let _ = writeln!(out, "Symbol:        {}", r.symbol);
    let _ = writeln!(out, "Strategy:      {}", r.strategy);
    let _ = writeln!(out, "Created:       {}", r.created_at.to_rfc3339());
    out.push('\n');
    for metric in Metric::ALL {
        let _ = writeln!(out, "{:<14} {}", format!("{}:", metric.label()), format_metric(metric, r));
    }
    if let Some(pl) = r.profit_loss_ratio {
        let _ = writeln!(out, "{:<14} {pl:.2}", "P/L ratio:");
    }
    if !r.parameters.is_empty() {
        out.push_str("\nParameters:\n");
        for (name, value) in &r.parameters {
            let _ = writeln!(out, "  {name} = {value}");
        }
    }

    if all.len() > 1 {
        let summary = TaskSummary::from_results(all);
        out.push('\n');
        let _ = writeln!(
            out,
            "Summary: {} symbols, avg return {:.2}, best {}",
            summary.total_symbols,
            summary.avg_return,
            summary.best_symbol.as_deref().unwrap_or("-")
        );
        for other in all {
            let _ = writeln!(
                out,
                "  {:<12} {:>8.2}  sharpe {:.2}",
                other.symbol, other.final_return, other.sharpe_ratio
            );
        }
    }
    out
}

/// Metrics side by side, one column per result, best value starred.
pub fn compare_table(results: &[&BacktestResult]) -> String {
    let mut out = String::new();
    if results.is_empty() {
        out.push_str("Nothing to compare: none of the tasks have completed results.\n");
        return out;
    }

    let _ = write!(out, "{:<10}", "");
    for r in results {
        let _ = write!(out, " {:>20}", format!("{}/{}", r.task_id, r.symbol));
    }
    out.push('\n');

    for metric in Metric::ALL {
        let best = best_index(results.iter().copied(), metric);
        let _ = write!(out, "{:<10}", metric.label());
        for (i, r) in results.iter().enumerate() {
            let star = if best == Some(i) && results.len() > 1 { "*" } else { " " };
            let _ = write!(out, " {:>19}{star}", format_metric(metric, r));
        }
        out.push('\n');
    }
    out
}

fn format_metric(metric: Metric, r: &BacktestResult) -> String {
    match metric {
        Metric::TotalTrades => r.total_trades.to_string(),
        Metric::ProfitFactor => r.profit_factor.map_or("-".into(), |v| format!("{v:.2}")),
        Metric::Volatility => r.volatility.map_or("-".into(), |v| format!("{v:.2}")),
        _ => format!("{:.2}", metric.value(r)),
    }
}
