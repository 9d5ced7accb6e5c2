//! Key bindings: arrows plus the classic q/w rotate keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Command;

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Quit,
    None,
}

/// Map key event to an action. Exactly five keys drive the game; Esc and Ctrl-C quit
/// the host, everything else is ignored.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL {
        return match code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Left => Action::Game(Command::MoveLeft),
        KeyCode::Right => Action::Game(Command::MoveRight),
        KeyCode::Down => Action::Game(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('q' | 'Q') => Action::Game(Command::RotateCw),
        KeyCode::Char('w' | 'W') => Action::Game(Command::RotateCcw),
        _ => Action::None,
    }
}
