use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Message;

/// A key as understood by the keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
    Backspace,
    /// Ctrl-C
    Interrupt,
    Char(char),
    /// Anything the keymap has no binding for
    Unknown,
}

impl Key {
    /// Parse one raw terminal input chunk.
    ///
    /// ```
    /// use sandbox::app::Key;
    ///
    /// assert_eq!(Key::from_raw("\x1b[A"), Key::Up);
    /// assert_eq!(Key::from_raw("q"), Key::Char('q'));
    /// ```
    pub fn from_raw(token: &str) -> Self {
        match token {
            "\u{3}" => Self::Interrupt,
            "\r" | "\n" | "\r\n" => Self::Enter,
            "\u{1b}" => Self::Escape,
            "\u{1b}[A" | "\u{1b}OA" => Self::Up,
            "\u{1b}[B" | "\u{1b}OB" => Self::Down,
            "\u{7f}" | "\u{8}" => Self::Backspace,
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Self::Char(c),
                    _ => Self::Unknown,
                }
            }
        }
    }

    /// Map a crossterm key event; `None` for releases and repeats.
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let key = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Self::Interrupt,
            KeyCode::Up => Self::Up,
            KeyCode::Down => Self::Down,
            KeyCode::Enter => Self::Enter,
            KeyCode::Esc => Self::Escape,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Self::Char(c),
            _ => Self::Unknown,
        };
        Some(key)
    }

    pub const fn is_quit(self) -> bool {
        matches!(self, Self::Interrupt | Self::Char('q'))
    }
}

/// Translate a terminal event into a message.
pub(super) fn message_for_event(event: &Event) -> Option<Message> {
    match event {
        Event::Key(key) => Key::from_key_event(*key).map(Message::KeyPress),
        Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_tokens_map_to_keys() {
        assert_eq!(Key::from_raw("\u{3}"), Key::Interrupt);
        assert_eq!(Key::from_raw("\r"), Key::Enter);
        assert_eq!(Key::from_raw("\u{1b}"), Key::Escape);
        assert_eq!(Key::from_raw("\u{1b}[B"), Key::Down);
        assert_eq!(Key::from_raw("\u{7f}"), Key::Backspace);
        assert_eq!(Key::from_raw("j"), Key::Char('j'));
    }

    #[test]
    fn test_unrecognized_raw_tokens_are_unknown() {
        assert_eq!(Key::from_raw("\u{1b}[C"), Key::Unknown);
        assert_eq!(Key::from_raw("pasted text"), Key::Unknown);
        assert_eq!(Key::from_raw(""), Key::Unknown);
        assert_eq!(Key::from_raw("\u{1}"), Key::Unknown);
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Key::from_key_event(key), Some(Key::Interrupt));
        assert!(Key::Interrupt.is_quit());
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(Key::from_key_event(key), None);
    }

    #[test]
    fn test_resize_event_becomes_message() {
        assert_eq!(
            message_for_event(&Event::Resize(100, 40)),
            Some(Message::Resize(100, 40))
        );
        assert_eq!(message_for_event(&Event::FocusGained), None);
    }
}
