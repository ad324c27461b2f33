use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Request a new heading for the next tick
    Steer(Direction),
    Restart,
    Quit,
    None,
}

/// Maps keyboard events and text commands onto `KeyAction`s
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char(c) => Self::handle_char(c),
            _ => KeyAction::None,
        }
    }

    /// WASD and vi keys steer; `r` restarts; `q` quits
    fn handle_char(c: char) -> KeyAction {
        match c.to_ascii_lowercase() {
            'w' | 'k' => KeyAction::Steer(Direction::Up),
            's' | 'j' => KeyAction::Steer(Direction::Down),
            'a' | 'h' => KeyAction::Steer(Direction::Left),
            'd' | 'l' => KeyAction::Steer(Direction::Right),
            'r' => KeyAction::Restart,
            'q' => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }

    /// Parse one line of the headless protocol: a direction name,
    /// `start`/`restart`, or `quit`. Blank and unknown lines map to `None`.
    pub fn handle_command(&self, line: &str) -> KeyAction {
        let command = line.trim();
        if let Ok(direction) = command.parse::<Direction>() {
            return KeyAction::Steer(direction);
        }

        match command.to_ascii_lowercase().as_str() {
            "start" | "restart" => KeyAction::Restart,
            "quit" | "exit" => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            KeyAction::Steer(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            KeyAction::Steer(Direction::Left)
        );
    }

    #[test]
    fn test_letter_keys_ignore_case() {
        let handler = InputHandler::new();
        let shifted = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(shifted),
            KeyAction::Steer(Direction::Right)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('j'))),
            KeyAction::Steer(Direction::Down)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('R'))),
            KeyAction::Restart
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('q'))),
            KeyAction::Quit
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('x'))),
            KeyAction::None
        );
    }

    #[test]
    fn test_text_commands() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_command("down\n"),
            KeyAction::Steer(Direction::Down)
        );
        assert_eq!(handler.handle_command("Restart"), KeyAction::Restart);
        assert_eq!(handler.handle_command("quit"), KeyAction::Quit);
        assert_eq!(handler.handle_command(""), KeyAction::None);
        assert_eq!(handler.handle_command("jump"), KeyAction::None);
    }
}
