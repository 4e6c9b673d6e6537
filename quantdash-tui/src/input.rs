//! Keyboard input dispatch — overlays → global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Detail => {
            handle_detail_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Tasks; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Results; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Compare; return; }
        KeyCode::Char('4') | KeyCode::Char('?') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('r') => {
            app.request_refresh();
            return;
        }
        KeyCode::Char('c') => {
            app.toggle_compare_mode();
            return;
        }
        KeyCode::Esc => {
            app.store.clear_selection();
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Tasks => handle_tasks_key(app, key),
        Panel::Results => handle_results_key(app, key),
        Panel::Compare => handle_compare_key(app, key),
        Panel::Help => {} // display only
    }
}

fn handle_detail_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.store.selected_task_id().map(str::to_string) {
                app.toggle_compared(&id);
            }
        }
        _ => {}
    }
}

fn handle_tasks_key(app: &mut AppState, key: KeyEvent) {
    let count = app.store.tasks().len();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 && app.tasks_cursor + 1 < count {
                app.tasks_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.tasks_cursor = app.tasks_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.tasks_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.tasks_cursor = count.saturating_sub(1),
        KeyCode::Enter => {
            if let Some(id) = app.cursor_task().map(|t| t.task_id.clone()) {
                app.select(&id);
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.cursor_task().map(|t| t.task_id.clone()) {
                app.toggle_compared(&id);
            }
        }
        _ => {}
    }
}

fn handle_results_key(app: &mut AppState, key: KeyEvent) {
    let count = app.visible_results().len();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 && app.results_cursor + 1 < count {
                app.results_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.results_cursor = app.results_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.results_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.results_cursor = count.saturating_sub(1),
        KeyCode::Enter => {
            if let Some(id) = app.cursor_result().map(|r| r.task_id.clone()) {
                app.select(&id);
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.cursor_result().map(|r| r.task_id.clone()) {
                app.toggle_compared(&id);
            }
        }
        KeyCode::Char('s') => {
            app.filter.cycle_sort();
            app.results_cursor = 0;
        }
        KeyCode::Char('o') => {
            app.filter.sort_order = app.filter.sort_order.toggle();
        }
        KeyCode::Char('p') => {
            app.filter.only_profitable = !app.filter.only_profitable;
            app.results_cursor = 0;
        }
        KeyCode::Char('f') => app.cycle_strategy_filter(),
        KeyCode::Char('y') => app.cycle_symbol_filter(),
        KeyCode::Char('x') => {
            app.filter = Default::default();
            app.results_cursor = 0;
            app.set_status("Filters cleared");
        }
        _ => {}
    }
}

fn handle_compare_key(app: &mut AppState, key: KeyEvent) {
    let count = app.store.compare_task_ids().len();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('l') | KeyCode::Right => {
            if count > 0 && app.compare_cursor + 1 < count {
                app.compare_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up | KeyCode::Char('h') | KeyCode::Left => {
            app.compare_cursor = app.compare_cursor.saturating_sub(1);
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.store.compare_task_ids().get(app.compare_cursor).cloned() {
                app.store.remove_from_compare(&id);
                app.clamp_cursors();
                app.set_status(format!("Removed {id} from comparison"));
            }
        }
        KeyCode::Char('x') => {
            app.store.clear_compare();
            app.compare_cursor = 0;
            app.set_status("Comparison cleared");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{demo_tasks, test_app};
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_keys(app: &mut AppState, keys: &[KeyCode]) {
        for k in keys {
            handle_key(app, press(*k));
        }
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx, _tx) = test_app();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key(&mut app, release);
        assert!(app.running);
    }

    #[test]
    fn welcome_overlay_swallows_first_key() {
        let (mut app, _rx, _tx) = test_app();
        app.overlay = Overlay::Welcome;
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn number_keys_switch_panels() {
        let (mut app, _rx, _tx) = test_app();
        type_keys(&mut app, &[KeyCode::Char('3')]);
        assert_eq!(app.active_panel, Panel::Compare);
        type_keys(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.active_panel, Panel::Help);
        type_keys(&mut app, &[KeyCode::BackTab, KeyCode::BackTab]);
        assert_eq!(app.active_panel, Panel::Results);
    }

    #[test]
    fn r_sends_refresh() {
        let (mut app, rx, _tx) = test_app();
        type_keys(&mut app, &[KeyCode::Char('r')]);
        assert!(app.store.loading());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn enter_on_result_selects_and_opens_detail() {
        let (mut app, _rx, _tx) = test_app();
        app.apply_refresh(Ok(demo_tasks()));
        app.active_panel = Panel::Results;

        type_keys(&mut app, &[KeyCode::Char('j'), KeyCode::Enter]);
        assert_eq!(app.store.selected_task_id(), Some("demo_task_2"));
        assert_eq!(app.overlay, Overlay::Detail);

        type_keys(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.overlay, Overlay::None);
        // Esc outside overlays clears the selection.
        type_keys(&mut app, &[KeyCode::Esc]);
        assert!(app.store.selected_task_id().is_none());
    }

    #[test]
    fn compare_flow_from_tasks_panel() {
        let (mut app, _rx, _tx) = test_app();
        app.apply_refresh(Ok(demo_tasks()));

        type_keys(
            &mut app,
            &[
                KeyCode::Char('c'),
                KeyCode::Char(' '),
                KeyCode::Char('j'),
                KeyCode::Char(' '),
            ],
        );
        assert_eq!(app.store.compare_task_ids(), ["demo_task_1", "demo_task_2"]);
        assert_eq!(app.store.compare_results().len(), 2);

        // Remove the first entry from the compare panel.
        type_keys(&mut app, &[KeyCode::Char('3'), KeyCode::Char('d')]);
        assert_eq!(app.store.compare_task_ids(), ["demo_task_2"]);

        // Leaving compare mode clears what is left.
        type_keys(&mut app, &[KeyCode::Char('c')]);
        assert!(!app.store.compare_mode());
        assert!(app.store.compare_task_ids().is_empty());
    }

    #[test]
    fn results_sort_and_profitable_filter() {
        let (mut app, _rx, _tx) = test_app();
        app.apply_refresh(Ok(demo_tasks()));
        app.active_panel = Panel::Results;

        type_keys(&mut app, &[KeyCode::Char('p')]);
        assert_eq!(app.visible_results().len(), 1);
        assert_eq!(app.cursor_result().unwrap().symbol, "BTCUSDT");

        type_keys(&mut app, &[KeyCode::Char('x'), KeyCode::Char('s'), KeyCode::Char('o')]);
        // Sorted ascending by final return: ETH (-5.12) before BTC (15.23).
        assert_eq!(app.cursor_result().unwrap().symbol, "ETHUSDT");
    }

    #[test]
    fn y_filters_results_by_symbol() {
        let (mut app, _rx, _tx) = test_app();
        app.apply_refresh(Ok(demo_tasks()));
        app.active_panel = Panel::Results;

        type_keys(&mut app, &[KeyCode::Char('y'), KeyCode::Char('y')]);
        assert_eq!(app.visible_results().len(), 1);
        assert_eq!(app.cursor_result().unwrap().symbol, "ETHUSDT");

        type_keys(&mut app, &[KeyCode::Char('x')]);
        assert!(app.filter.symbols.is_empty());
    }

    #[test]
    fn cursor_stops_at_last_task() {
        let (mut app, _rx, _tx) = test_app();
        app.apply_refresh(Ok(demo_tasks()));
        type_keys(&mut app, &[KeyCode::Char('j'); 5]);
        assert_eq!(app.tasks_cursor, 1);
        type_keys(&mut app, &[KeyCode::Char('g')]);
        assert_eq!(app.tasks_cursor, 0);
    }

    #[test]
    fn q_quits() {
        let (mut app, _rx, _tx) = test_app();
        type_keys(&mut app, &[KeyCode::Char('q')]);
        assert!(!app.running);
    }
}
