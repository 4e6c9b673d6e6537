//! Panel 3 — Compare: side-by-side metrics for the comparison set, best value
//! per metric starred.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use quantdash_core::metric::{best_index, Metric};
use quantdash_core::{BacktestResult, MAX_COMPARE};

use crate::app::AppState;
use crate::theme;
use crate::ui::truncate;

const LABEL_WIDTH: usize = 10;
const COLUMN_WIDTH: usize = 18;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let store = &app.store;
    let mut lines: Vec<Line> = Vec::new();

    let mode = if store.compare_mode() { "on" } else { "off" };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{}/{MAX_COMPARE} tasks", store.compare_task_ids().len()),
            theme::accent(),
        ),
        Span::styled(format!(" | compare mode {mode}"), theme::muted()),
        Span::styled("  [h/l]move [d]remove [x]clear [c]toggle mode", theme::muted()),
    ]));
    lines.push(Line::from(""));

    let compared = store.compare_results();
    if compared.is_empty() {
        let hint = if store.compare_task_ids().is_empty() {
            "Nothing to compare. Press c, then Space on tasks or results."
        } else {
            "Compared tasks have no completed results yet."
        };
        lines.push(Line::from(Span::styled(hint, theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let columns = ((area.width as usize).saturating_sub(LABEL_WIDTH) / COLUMN_WIDTH).max(1);
    let shown: Vec<&BacktestResult> = compared.into_iter().take(columns).collect();
    let focused = store.compare_task_ids().get(app.compare_cursor);

    // Column headers: task id, then symbol / strategy
    let mut task_row = vec![Span::raw(" ".repeat(LABEL_WIDTH))];
    let mut symbol_row = vec![Span::raw(" ".repeat(LABEL_WIDTH))];
    for r in &shown {
        let style = if focused == Some(&r.task_id) {
            theme::cursor()
        } else {
            theme::accent_bold()
        };
        task_row.push(Span::styled(
            format!("{:>w$}", truncate(&r.task_id, COLUMN_WIDTH - 1), w = COLUMN_WIDTH),
            style,
        ));
        symbol_row.push(Span::styled(
            format!(
                "{:>w$}",
                truncate(&format!("{} {}", r.symbol, r.strategy), COLUMN_WIDTH - 1),
                w = COLUMN_WIDTH
            ),
            theme::muted(),
        ));
    }
    lines.push(Line::from(task_row));
    lines.push(Line::from(symbol_row));

    for metric in Metric::ALL {
        let best = best_index(shown.iter().copied(), metric);
        let mut row = vec![Span::styled(
            format!("{:<w$}", metric.label(), w = LABEL_WIDTH),
            theme::accent(),
        )];
        for (i, r) in shown.iter().enumerate() {
            let is_best = best == Some(i) && shown.len() > 1;
            let cell = format!("{}{}", format_metric(metric, r), if is_best { " ★" } else { "  " });
            let mut style = metric_style(metric, r);
            if is_best {
                style = style.add_modifier(Modifier::BOLD);
            }
            row.push(Span::styled(format!("{cell:>w$}", w = COLUMN_WIDTH), style));
        }
        lines.push(Line::from(row));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn format_metric(metric: Metric, r: &BacktestResult) -> String {
    match metric {
        Metric::TotalTrades => r.total_trades.to_string(),
        Metric::ProfitFactor => r.profit_factor.map_or("—".to_string(), |v| format!("{v:.2}")),
        Metric::Volatility => r.volatility.map_or("—".to_string(), |v| format!("{v:.2}")),
        _ => format!("{:.2}", metric.value(r)),
    }
}

fn metric_style(metric: Metric, r: &BacktestResult) -> ratatui::style::Style {
    match metric {
        Metric::FinalReturn | Metric::AnnualReturn => theme::pnl(metric.value(r)),
        Metric::MaxDrawdown => theme::negative(),
        Metric::SharpeRatio => theme::sharpe(r.sharpe_ratio),
        Metric::WinRate => theme::win_rate(r.win_rate),
        _ => theme::text(),
    }
}
