// Key bindings

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{Action, Focus, Mode};

/// Translate a terminal event into an action for the current mode
pub fn action_for(event: &Event, mode: Mode) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => key_action(key, mode),
        Event::Resize(width, height) => Some(Action::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn key_action(key: &KeyEvent, mode: Mode) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        Mode::List(Focus::Search) | Mode::List(Focus::DateRange) => text_action(key),
        Mode::List(Focus::Table) => list_action(key),
        Mode::Detail => detail_action(key),
    }
}

fn text_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char(c) => Some(Action::Input(c)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Enter | KeyCode::Tab => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        _ => None,
    }
}

fn list_action(key: &KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Char(' ') | KeyCode::Char('e') => Action::ToggleExpand,
        KeyCode::Enter => Action::Open,
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('n') => Action::Newer,
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('o') => Action::Older,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('s') => Action::CycleStatus,
        KeyCode::Char('/') => Action::FocusSearch,
        KeyCode::Char('d') => Action::FocusDateRange,
        KeyCode::Char('c') => Action::ClearFilters,
        _ => return None,
    };
    Some(action)
}

fn detail_action(key: &KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => Action::Back,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Char(' ') | KeyCode::Char('e') | KeyCode::Enter => Action::ToggleExpand,
        KeyCode::Char('r') => Action::Refresh,
        _ => return None,
    };
    Some(action)
}

/// One-line key reference for the footer
pub fn help_line(mode: Mode) -> &'static str {
    match mode {
        Mode::List(Focus::Search) => "type to search  enter/esc done",
        Mode::List(Focus::DateRange) => "YYYY-MM-DD..YYYY-MM-DD  enter apply  esc cancel",
        Mode::List(Focus::Table) => {
            "/ search  s status  d dates  c clear  n/o newer/older  r refresh  space expand  enter open  q quit"
        }
        Mode::Detail => "↑/↓ select  space expand  r reload  esc back  q quit",
    }
}
