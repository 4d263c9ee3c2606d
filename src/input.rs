//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] changes (typing, scrolling, focus) and
//! to [`Action`]s the engine has to carry out.  Adding a new keybinding is a
//! single match arm.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. If it needs the engine, add an [`Action`] variant and handle it in
//!    `main.rs`; otherwise add a method on [`App`].
//! 2. Add a `KeyCode` match arm in the handler for the right focus.
//! 3. Update the help text in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Focus};

/// Something the engine has to do in response to a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Subscribe to the URL typed in the input field.
    Submit(String),
    /// Show a post in the detail popup.
    Open(String),
    /// Close the detail popup.
    Close,
    /// Poll every feed now.
    Refresh,
}

/// Process a single key event.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return None;
    }

    if app.detail.is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::Close),
            _ => None,
        };
    }

    match app.focus {
        Focus::Input => handle_input_key(app, key),
        Focus::Posts => handle_posts_key(app, key),
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Tab | KeyCode::Esc => app.toggle_focus(),
        KeyCode::Enter if app.input_enabled() => {
            return Some(Action::Submit(app.input.trim().to_string()));
        }
        KeyCode::Backspace if app.input_enabled() => {
            app.input.pop();
        }
        KeyCode::Char(c) if app.input_enabled() => app.input.push(c),
        _ => {}
    }
    None
}

fn handle_posts_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab | KeyCode::Char('a') => app.toggle_focus(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('r') => return Some(Action::Refresh),
        KeyCode::Enter => return app.selected_guid().map(|g| Action::Open(g.to_string())),
        _ => {}
    }
    None
}
