//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`]; remember the help text in
//! [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

const PAGE: u16 = 10;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('R') => app.load_manifest(),
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_down(PAGE),
        KeyCode::PageUp | KeyCode::Char('b') => app.scroll_up(PAGE),
        KeyCode::Char('J') => app.scroll_down(1),
        KeyCode::Char('K') => app.scroll_up(1),
        _ => {}
    }
}
