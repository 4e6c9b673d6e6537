//! Panel 4 — Help: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "r", "Refresh tasks from the backend");
    key(&mut lines, "c", "Toggle compare mode (off clears the set)");
    key(&mut lines, "Esc", "Clear selection");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Tasks");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "g / G", "Jump to first / last");
    key(&mut lines, "Enter", "Select task and open detail");
    key(&mut lines, "Space", "Add / remove task in comparison");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Results");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "Enter", "Select result's task and open detail");
    key(&mut lines, "Space", "Add / remove result's task in comparison");
    key(&mut lines, "s / o", "Cycle sort metric / flip sort order");
    key(&mut lines, "p", "Toggle profitable only");
    key(&mut lines, "f", "Cycle strategy filter");
    key(&mut lines, "y", "Cycle symbol filter");
    key(&mut lines, "x", "Reset filters");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Compare");
    key(&mut lines, "h / l", "Move between compared tasks");
    key(&mut lines, "d", "Remove focused task");
    key(&mut lines, "x", "Clear comparison");
    key(&mut lines, "★", "Best value for that metric");
    lines.push(Line::from(""));

    section(&mut lines, "Markers");
    key(&mut lines, "▶", "Selected task");
    key(&mut lines, "◆", "In comparison set");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
