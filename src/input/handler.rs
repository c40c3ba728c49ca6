use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Steering, buffered until the next tick
    GameAction(Action),
    /// `P` or Space: the pause/resume button
    TogglePause,
    /// `R`: start a new round at any time
    Restart,
    /// `+`/`=`: shorten the tick delay
    Faster,
    /// `-`/`_`: lengthen the tick delay
    Slower,
    /// `Q`, Esc or Ctrl+C
    Quit,
    None,
}

/// Keyboard layout of the game: arrows or WASD steer, the rest are the
/// pause, restart, speed and quit controls.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = steering(key.code) {
            return KeyAction::GameAction(Action::Move(direction));
        }

        match key.code {
            KeyCode::Char('+' | '=') => KeyAction::Faster,
            KeyCode::Char('-' | '_') => KeyAction::Slower,
            KeyCode::Char('p' | 'P' | ' ') => KeyAction::TogglePause,
            KeyCode::Char('r' | 'R') => KeyAction::Restart,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }
}

/// Arrow keys, or WASD in either case
fn steering(code: KeyCode) -> Option<Direction> {
    let direction = match code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Direction::Up,
        KeyCode::Down | KeyCode::Char('s' | 'S') => Direction::Down,
        KeyCode::Left | KeyCode::Char('a' | 'A') => Direction::Left,
        KeyCode::Right | KeyCode::Char('d' | 'D') => Direction::Right,
        _ => return None,
    };
    Some(direction)
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
