//! Keyboard input.
//!
//! A [`KeyMsg`] is what the host delivers for every key press. Its
//! [`Display`](fmt::Display) form is the chord text that key maps are written
//! in (`"enter"`, `"ctrl+c"`, `"alt+x"`, `"y"`).

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press.
///
/// # Example
///
/// ```rust
/// use promptkit::{KeyMsg, KeyType};
///
/// assert_eq!(KeyMsg::from_type(KeyType::Enter).to_string(), "enter");
/// assert_eq!(KeyMsg::from_char('y').to_string(), "y");
/// assert_eq!(KeyMsg::from_type(KeyType::Ctrl('c')).to_string(), "ctrl+c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMsg {
    /// The kind of key.
    pub key_type: KeyType,
    /// For [`KeyType::Runes`], the characters typed.
    pub runes: Vec<char>,
    /// Whether Alt was held.
    pub alt: bool,
    /// Whether the runes arrived through bracketed paste.
    pub paste: bool,
}

impl KeyMsg {
    /// A key press of a named key.
    #[must_use]
    pub const fn from_type(key_type: KeyType) -> Self {
        Self {
            key_type,
            runes: Vec::new(),
            alt: false,
            paste: false,
        }
    }

    /// A single typed character.
    #[must_use]
    pub fn from_char(c: char) -> Self {
        Self::from_runes(vec![c])
    }

    /// Several characters delivered at once (IME, paste).
    #[must_use]
    pub const fn from_runes(runes: Vec<char>) -> Self {
        Self {
            key_type: KeyType::Runes,
            runes,
            alt: false,
            paste: false,
        }
    }

    /// Marks the key as pressed together with Alt.
    #[must_use]
    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Marks the runes as pasted.
    #[must_use]
    pub const fn with_paste(mut self) -> Self {
        self.paste = true;
        self
    }

    /// The characters this key would insert into a text field, if any.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self.key_type {
            KeyType::Runes if !self.alt => Some(self.runes.iter().collect()),
            KeyType::Space if !self.alt => Some(" ".to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for KeyMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.key_type != KeyType::Runes {
            return write!(f, "{}", self.key_type);
        }
        if self.paste {
            f.write_str("[")?;
        }
        for c in &self.runes {
            write!(f, "{c}")?;
        }
        if self.paste {
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Kind of key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Printable characters, carried in [`KeyMsg::runes`].
    Runes,
    Enter,
    Tab,
    ShiftTab,
    Esc,
    Backspace,
    Delete,
    Insert,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PgUp,
    PgDown,
    CtrlLeft,
    CtrlRight,
    /// Control plus a character, stored lowercase (`ctrl+w`).
    Ctrl(char),
    /// Function key `F1`..`F20`.
    F(u8),
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Runes => "runes",
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::ShiftTab => "shift+tab",
            Self::Esc => "esc",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Space => " ",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
            Self::End => "end",
            Self::PgUp => "pgup",
            Self::PgDown => "pgdown",
            Self::CtrlLeft => "ctrl+left",
            Self::CtrlRight => "ctrl+right",
            Self::Ctrl(c) => return write!(f, "ctrl+{c}"),
            Self::F(n) => return write!(f, "f{n}"),
        };
        f.write_str(name)
    }
}

impl From<KeyType> for KeyMsg {
    fn from(key_type: KeyType) -> Self {
        Self::from_type(key_type)
    }
}

impl From<char> for KeyMsg {
    fn from(c: char) -> Self {
        Self::from_char(c)
    }
}

impl From<KeyEvent> for KeyMsg {
    fn from(event: KeyEvent) -> Self {
        from_crossterm_key(event.code, event.modifiers)
    }
}

/// Converts a crossterm key code and modifiers into a [`KeyMsg`].
#[must_use]
pub fn from_crossterm_key(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    let alt = modifiers.contains(KeyModifiers::ALT);

    let mut msg = match code {
        // Terminals report ctrl+i and ctrl+m as tab and enter.
        KeyCode::Char('i' | 'I') if ctrl => KeyMsg::from_type(KeyType::Tab),
        KeyCode::Char('m' | 'M') if ctrl => KeyMsg::from_type(KeyType::Enter),
        KeyCode::Char(c) if ctrl => KeyMsg::from_type(KeyType::Ctrl(c.to_ascii_lowercase())),
        KeyCode::Char(' ') => KeyMsg::from_type(KeyType::Space),
        KeyCode::Char(c) => KeyMsg::from_char(c),
        KeyCode::Enter => KeyMsg::from_type(KeyType::Enter),
        KeyCode::Backspace => KeyMsg::from_type(KeyType::Backspace),
        KeyCode::Tab if shift => KeyMsg::from_type(KeyType::ShiftTab),
        KeyCode::BackTab => KeyMsg::from_type(KeyType::ShiftTab),
        KeyCode::Tab => KeyMsg::from_type(KeyType::Tab),
        KeyCode::Esc => KeyMsg::from_type(KeyType::Esc),
        KeyCode::Delete => KeyMsg::from_type(KeyType::Delete),
        KeyCode::Insert => KeyMsg::from_type(KeyType::Insert),
        KeyCode::Up => KeyMsg::from_type(KeyType::Up),
        KeyCode::Down => KeyMsg::from_type(KeyType::Down),
        KeyCode::Left if ctrl => KeyMsg::from_type(KeyType::CtrlLeft),
        KeyCode::Left => KeyMsg::from_type(KeyType::Left),
        KeyCode::Right if ctrl => KeyMsg::from_type(KeyType::CtrlRight),
        KeyCode::Right => KeyMsg::from_type(KeyType::Right),
        KeyCode::Home => KeyMsg::from_type(KeyType::Home),
        KeyCode::End => KeyMsg::from_type(KeyType::End),
        KeyCode::PageUp => KeyMsg::from_type(KeyType::PgUp),
        KeyCode::PageDown => KeyMsg::from_type(KeyType::PgDown),
        KeyCode::F(n) => KeyMsg::from_type(KeyType::F(n)),
        _ => KeyMsg::from_runes(Vec::new()),
    };
    msg.alt = alt;
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_msg_display() {
        assert_eq!(KeyMsg::from_type(KeyType::Enter).to_string(), "enter");
        assert_eq!(KeyMsg::from_char('a').to_string(), "a");
        assert_eq!(KeyMsg::from_char('a').with_alt().to_string(), "alt+a");
        assert_eq!(
            KeyMsg::from_runes("hello".chars().collect())
                .with_paste()
                .to_string(),
            "[hello]"
        );
    }

    #[test]
    fn test_key_type_display() {
        assert_eq!(KeyType::Ctrl('c').to_string(), "ctrl+c");
        assert_eq!(KeyType::PgDown.to_string(), "pgdown");
        assert_eq!(KeyType::F(5).to_string(), "f5");
        assert_eq!(KeyType::Space.to_string(), " ");
    }

    #[test]
    fn test_text() {
        assert_eq!(KeyMsg::from_char('x').text().as_deref(), Some("x"));
        assert_eq!(KeyMsg::from_type(KeyType::Space).text().as_deref(), Some(" "));
        assert_eq!(KeyMsg::from_char('x').with_alt().text(), None);
        assert_eq!(KeyMsg::from_type(KeyType::Enter).text(), None);
    }

    #[test]
    fn test_from_crossterm() {
        let k = from_crossterm_key(KeyCode::Char('C'), KeyModifiers::CONTROL);
        assert_eq!(k.to_string(), "ctrl+c");

        let k = from_crossterm_key(KeyCode::Char('Y'), KeyModifiers::SHIFT);
        assert_eq!(k.to_string(), "Y");

        let k = from_crossterm_key(KeyCode::Tab, KeyModifiers::SHIFT);
        assert_eq!(k.key_type, KeyType::ShiftTab);

        let k = from_crossterm_key(KeyCode::Char('m'), KeyModifiers::CONTROL);
        assert_eq!(k.key_type, KeyType::Enter);

        let k = from_crossterm_key(KeyCode::Char('b'), KeyModifiers::ALT);
        assert_eq!(k.to_string(), "alt+b");
    }
}
