//! Overlay widgets — welcome, selected-task detail.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use quantdash_core::summary::TaskSummary;
use quantdash_core::BacktestResult;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Welcome to QuantDash ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled("  1. Press r to load tasks from the backend", theme::muted())),
        Line::from(Span::styled("  2. Press 2 for results, Enter to inspect one", theme::muted())),
        Line::from(Span::styled("  3. Press c, then Space to pick up to 4 to compare", theme::muted())),
        Line::from(Span::styled("  4. Press 3 to see them side by side", theme::muted())),
        Line::from(""),
        Line::from(Span::styled(
            "If the backend is down you will see demo data and a banner.",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Detail of the selected task: first result in full, the rest summarised.
pub fn render_detail(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(75, 80, area);
    f.render_widget(Clear, popup);

    let task_id = app.store.selected_task_id().unwrap_or("-");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(" {task_id} [Esc]close [Space]compare "))
        .title_style(theme::accent_bold());

    let Some(result) = app.store.selected_result() else {
        let para = Paragraph::new(Span::styled("No result for this task yet.", theme::muted()))
            .block(block);
        f.render_widget(para, popup);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    if let Some(task) = app.store.task(task_id) {
        lines.push(Line::from(vec![
            Span::styled("Status: ", theme::muted()),
            Span::styled(task.status.label(), theme::status(task.status)),
            Span::styled(format!("  {}", task.message), theme::muted()),
        ]));
    }
    if app.store.is_compared(task_id) {
        lines.push(Line::from(Span::styled("In comparison set", theme::neutral())));
    }
    lines.push(Line::from(""));
    push_result(&mut lines, result);

    let all: Vec<BacktestResult> = app.store.selected_results().into_iter().cloned().collect();
    if all.len() > 1 {
        let summary = TaskSummary::from_results(&all);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "Task summary: {} symbols, avg return {:.2}, best {}",
                summary.total_symbols,
                summary.avg_return,
                summary.best_symbol.as_deref().unwrap_or("-")
            ),
            theme::accent_bold(),
        )));
        for r in all.iter().skip(1) {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<10} ", r.symbol), theme::text()),
                Span::styled(format!("{:>8.2} ", r.final_return), theme::pnl(r.final_return)),
                Span::styled(format!("sharpe {:.2}", r.sharpe_ratio), theme::sharpe(r.sharpe_ratio)),
            ]));
        }
    }

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

fn push_result<'a>(lines: &mut Vec<Line<'a>>, r: &BacktestResult) {
    lines.push(Line::from(Span::styled(r.label(), theme::accent_bold())));
    lines.push(Line::from(Span::styled(
        format!("Created {}", r.created_at.format("%Y-%m-%d %H:%M UTC")),
        theme::muted(),
    )));
    lines.push(Line::from(""));

    field(lines, "Final return", format!("{:.2}", r.final_return), theme::pnl(r.final_return));
    field(lines, "Annual return", format!("{:.2}", r.annual_return), theme::pnl(r.annual_return));
    field(lines, "Max drawdown", format!("{:.2}", r.max_drawdown), theme::negative());
    field(lines, "Sharpe", format!("{:.2}", r.sharpe_ratio), theme::sharpe(r.sharpe_ratio));
    field(lines, "Win rate", format!("{:.1}", r.win_rate), theme::win_rate(r.win_rate));
    field(lines, "Trades", r.total_trades.to_string(), theme::text());
    if let Some(pf) = r.profit_factor {
        field(lines, "Profit factor", format!("{pf:.2}"), theme::text());
    }
    if let Some(pl) = r.profit_loss_ratio {
        field(lines, "P/L ratio", format!("{pl:.2}"), theme::text());
    }
    if let Some(vol) = r.volatility {
        field(lines, "Volatility", format!("{vol:.2}"), theme::text());
    }

    if !r.parameters.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Parameters", theme::accent_bold())));
        for (name, value) in &r.parameters {
            field(lines, name, value.to_string(), theme::text());
        }
    }
    if !r.equity_curve.is_empty() || !r.trade_records.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(
                "{} equity points, {} trade records",
                r.equity_curve.len(),
                r.trade_records.len()
            ),
            theme::muted(),
        )));
    }
}

fn field<'a>(lines: &mut Vec<Line<'a>>, name: &str, value: String, style: ratatui::style::Style) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {name:<16}"), theme::muted()),
        Span::styled(value, style),
    ]));
}
