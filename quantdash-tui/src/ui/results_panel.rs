//! Panel 2 — Results: flattened per-symbol results with filter, sort, select
//! and compare toggles.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::{scroll_offset, truncate};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let visible = app.visible_results();
    let results = app.store.results();
    let mut lines: Vec<Line> = Vec::new();

    // Header: counts and active filter
    let sort = match app.filter.sort_by {
        Some(m) => format!("{} {}", m.label(), app.filter.sort_order.arrow()),
        None => "none".to_string(),
    };
    let strategy = app
        .filter
        .strategies
        .iter()
        .next()
        .map(String::as_str)
        .unwrap_or("all");
    let symbol = app
        .filter
        .symbols
        .iter()
        .next()
        .map(String::as_str)
        .unwrap_or("all");
    lines.push(Line::from(vec![
        Span::styled(
            format!("{}/{} results", visible.len(), results.len()),
            theme::accent(),
        ),
        Span::styled(
            format!(
                " | sort: {sort} | strategy: {strategy} | symbol: {symbol} | profitable only: {}",
                if app.filter.only_profitable { "yes" } else { "no" }
            ),
            theme::muted(),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        "[j/k]move [Enter]select [Space]compare [s]ort [o]rder [p]rofitable [f]strategy s[y]mbol [x]reset",
        theme::muted(),
    )));

    if visible.is_empty() {
        lines.push(Line::from(""));
        let hint = if results.is_empty() {
            "No completed results yet."
        } else {
            "No results match the current filter (x to reset)."
        };
        lines.push(Line::from(Span::styled(hint, theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "  {:<14} {:<10} {:<14} {:>8} {:>8} {:>8} {:>7} {:>7} {:>6}",
            "Task", "Symbol", "Strategy", "Return%", "Annual%", "MaxDD%", "Sharpe", "Win%", "Trades"
        ),
        theme::accent_bold(),
    )));

    let height = area.height.saturating_sub(3) as usize;
    let start = scroll_offset(app.results_cursor, height);
    let end = (start + height).min(visible.len());

    for (row, &idx) in visible.iter().enumerate().take(end).skip(start) {
        let r = &results[idx];
        let is_cursor = row == app.results_cursor;
        let selected = app.store.selected_task_id() == Some(r.task_id.as_str());
        let compared = app.store.is_compared(&r.task_id);

        let marker = match (selected, compared) {
            (true, _) => "▶",
            (false, true) => "◆",
            _ => " ",
        };
        let base = if is_cursor { theme::cursor() } else { theme::text() };
        let pick = |style: Style| if is_cursor { base } else { style };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), base),
            Span::styled(format!("{:<14} ", truncate(&r.task_id, 14)), base),
            Span::styled(format!("{:<10} ", truncate(&r.symbol, 10)), base),
            Span::styled(format!("{:<14} ", truncate(&r.strategy, 14)), base),
            Span::styled(format!("{:>8.2} ", r.final_return), pick(theme::pnl(r.final_return))),
            Span::styled(format!("{:>8.2} ", r.annual_return), pick(theme::pnl(r.annual_return))),
            Span::styled(format!("{:>8.2} ", r.max_drawdown), pick(theme::negative())),
            Span::styled(format!("{:>7.2} ", r.sharpe_ratio), pick(theme::sharpe(r.sharpe_ratio))),
            Span::styled(format!("{:>7.1} ", r.win_rate), pick(theme::win_rate(r.win_rate))),
            Span::styled(format!("{:>6}", r.total_trades), base),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
