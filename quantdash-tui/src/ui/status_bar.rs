//! Bottom status bar — loading indicator, data origin, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use quantdash_core::RefreshPhase;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    let (phase, style) = match app.store.phase() {
        RefreshPhase::Idle => ("idle", theme::muted()),
        RefreshPhase::Loading => ("⟳ loading", theme::warning()),
        RefreshPhase::Loaded => ("● live", theme::positive()),
        RefreshPhase::LoadedWithFallback => ("● demo", theme::warning()),
    };
    spans.push(Span::styled(format!(" {phase} "), style));
    spans.push(Span::styled(format!("[{}]", app.source_name), theme::muted()));

    if let Some(id) = app.store.selected_task_id() {
        spans.push(Span::styled(format!(" sel:{id}"), theme::neutral()));
    }

    spans.push(Span::styled(" 1:Tasks 2:Results 3:Compare 4:Help", theme::muted()));
    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
