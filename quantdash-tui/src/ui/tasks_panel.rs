//! Panel 1 — Tasks: every backend task with status, progress and counters.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use quantdash_core::TaskStatus;

use crate::app::AppState;
use crate::theme;
use crate::ui::{scroll_offset, truncate};

const BAR_WIDTH: usize = 12;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let tasks = app.store.tasks();
    let mut lines: Vec<Line> = Vec::new();

    let running = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Running)
        .count();
    lines.push(Line::from(vec![
        Span::styled(format!("{} tasks", tasks.len()), theme::accent()),
        Span::styled(format!(" | {running} running"), theme::muted()),
        Span::styled(
            "  [j/k]move [Enter]detail [Space]compare [r]efresh",
            theme::muted(),
        ),
    ]));
    lines.push(Line::from(""));

    if tasks.is_empty() {
        let hint = if app.store.loading() {
            "Loading tasks..."
        } else {
            "No tasks. Press r to refresh."
        };
        lines.push(Line::from(Span::styled(hint, theme::muted())));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "  {:<24} {:<10} {:<14} {:>7}  {}",
            "Task", "Status", "Progress", "Symbols", "Message"
        ),
        theme::accent_bold(),
    )));

    let height = area.height.saturating_sub(3) as usize;
    let start = scroll_offset(app.tasks_cursor, height);
    let end = (start + height).min(tasks.len());

    for (i, task) in tasks.iter().enumerate().take(end).skip(start) {
        let is_cursor = i == app.tasks_cursor;
        let selected = app.store.selected_task_id() == Some(task.task_id.as_str());
        let compared = app.store.is_compared(&task.task_id);

        let marker = match (selected, compared) {
            (true, _) => "▶",
            (false, true) => "◆",
            _ => " ",
        };
        let base = if is_cursor { theme::cursor() } else { theme::text() };
        let status_style = if is_cursor {
            base
        } else {
            theme::status(task.status)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), base),
            Span::styled(format!("{:<24} ", truncate(&task.task_id, 24)), base),
            Span::styled(format!("{:<10} ", task.status.label()), status_style),
            Span::styled(format!("{:<14} ", progress_bar(task.progress)), status_style),
            Span::styled(
                format!("{:>3}/{:<3} ", task.symbols_completed, task.symbols_total),
                base,
            ),
            Span::styled(truncate(&task.message, 40), theme::muted()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

/// Fixed-width text progress bar for a 0–100 percentage.
fn progress_bar(progress: f64) -> String {
    let pct = if progress.is_finite() {
        progress.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(progress_bar(100.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(progress_bar(50.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
        assert_eq!(progress_bar(250.0).chars().count(), BAR_WIDTH);
        assert_eq!(progress_bar(f64::NAN).chars().count(), BAR_WIDTH);
    }
}
