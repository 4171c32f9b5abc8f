//! Single-line text editor shared by the selection filter and the text
//! input prompt.
//!
//! The editor owns a character buffer and a cursor. Prompts translate their
//! key maps into [`EditOp`]s and apply them with [`Editor::apply`].

use unicode_width::UnicodeWidthChar;

use crate::key::{KeyMsg, KeyType};
use crate::style;

/// How the buffer is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// Show the text as typed.
    #[default]
    Normal,
    /// Show one mask character per typed character.
    Password(char),
}

/// A low level edit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Insert text at the cursor (sanitized, limited to the char limit).
    Insert(String),
    MoveBackward,
    MoveForward,
    WordBackward,
    WordForward,
    JumpToBeginning,
    JumpToEnd,
    /// Backspace.
    DeleteBeforeCursor,
    DeleteWordBeforeCursor,
    /// Delete the character under the cursor.
    DeleteUnderCursor,
    DeleteAllAfterCursor,
    DeleteAllBeforeCursor,
}

impl EditOp {
    /// Maps a key press to the conventional edit operation for it.
    ///
    /// This is the fallback for keys that no prompt action claimed.
    #[must_use]
    pub fn from_key(key: &KeyMsg) -> Option<Self> {
        if let Some(text) = key.text() {
            return Some(Self::Insert(text));
        }
        let op = match key.key_type {
            KeyType::Left | KeyType::Ctrl('b') => Self::MoveBackward,
            KeyType::Right | KeyType::Ctrl('f') => Self::MoveForward,
            KeyType::CtrlLeft => Self::WordBackward,
            KeyType::CtrlRight => Self::WordForward,
            KeyType::Home | KeyType::Ctrl('a') => Self::JumpToBeginning,
            KeyType::End | KeyType::Ctrl('e') => Self::JumpToEnd,
            KeyType::Backspace | KeyType::Ctrl('h') => Self::DeleteBeforeCursor,
            KeyType::Ctrl('w') => Self::DeleteWordBeforeCursor,
            KeyType::Delete | KeyType::Ctrl('d') => Self::DeleteUnderCursor,
            KeyType::Ctrl('k') => Self::DeleteAllAfterCursor,
            KeyType::Ctrl('u') => Self::DeleteAllBeforeCursor,
            _ => return None,
        };
        Some(op)
    }
}

/// Removes control characters; tabs and line breaks become single spaces.
#[must_use]
pub fn sanitize(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' | '\t' => out.push(' '),
            '\u{FFFD}' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// A single-line text buffer with a cursor.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    value: Vec<char>,
    pos: usize,
    /// Maximum number of characters; 0 means unlimited.
    pub char_limit: usize,
    /// Visible width of the text area; 0 means unlimited.
    pub width: usize,
    /// Shown faint while the buffer is empty.
    pub placeholder: String,
    pub echo_mode: EchoMode,
    // Visible window [offset, offset_right) when `width` is set.
    offset: usize,
    offset_right: usize,
}

impl Editor {
    /// Creates an empty editor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current text.
    #[must_use]
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Replaces the text and moves the cursor to its end.
    pub fn set_value(&mut self, text: &str) {
        let mut value = sanitize(text);
        if self.char_limit > 0 {
            value.truncate(self.char_limit);
        }
        self.value = value;
        self.set_cursor(self.value.len());
    }

    /// Moves the cursor, clamped to the buffer.
    pub fn set_cursor(&mut self, pos: usize) {
        self.pos = pos.min(self.value.len());
        self.handle_overflow();
    }

    /// Applies an edit operation. Returns true if the text changed.
    pub fn apply(&mut self, op: &EditOp) -> bool {
        let before = self.value.len();
        match op {
            EditOp::Insert(text) => return self.insert(text),
            EditOp::MoveBackward => self.set_cursor(self.pos.saturating_sub(1)),
            EditOp::MoveForward => self.set_cursor(self.pos + 1),
            EditOp::WordBackward => {
                let target = self.word_start_before(self.pos);
                self.set_cursor(target);
            }
            EditOp::WordForward => {
                let target = self.word_end_after(self.pos);
                self.set_cursor(target);
            }
            EditOp::JumpToBeginning => self.set_cursor(0),
            EditOp::JumpToEnd => self.set_cursor(self.value.len()),
            EditOp::DeleteBeforeCursor => {
                if self.pos > 0 {
                    self.value.remove(self.pos - 1);
                    self.set_cursor(self.pos - 1);
                }
            }
            EditOp::DeleteWordBeforeCursor => {
                let start = match self.echo_mode {
                    EchoMode::Normal => self.word_start_before(self.pos),
                    EchoMode::Password(_) => 0,
                };
                self.value.drain(start..self.pos);
                self.set_cursor(start);
            }
            EditOp::DeleteUnderCursor => {
                if self.pos < self.value.len() {
                    self.value.remove(self.pos);
                    self.handle_overflow();
                }
            }
            EditOp::DeleteAllAfterCursor => {
                self.value.truncate(self.pos);
                self.handle_overflow();
            }
            EditOp::DeleteAllBeforeCursor => {
                self.value.drain(..self.pos);
                self.offset = 0;
                self.set_cursor(0);
            }
        }
        self.value.len() != before
    }

    fn insert(&mut self, text: &str) -> bool {
        let mut chars = sanitize(text);
        if self.char_limit > 0 {
            chars.truncate(self.char_limit.saturating_sub(self.value.len()));
        }
        if chars.is_empty() {
            return false;
        }
        let n = chars.len();
        self.value.splice(self.pos..self.pos, chars);
        self.set_cursor(self.pos + n);
        true
    }

    /// Start of the word left of `pos`, skipping whitespace first.
    fn word_start_before(&self, pos: usize) -> usize {
        let mut i = pos;
        while i > 0 && self.value[i - 1].is_whitespace() {
            i -= 1;
        }
        while i > 0 && !self.value[i - 1].is_whitespace() {
            i -= 1;
        }
        i
    }

    /// End of the word right of `pos`, skipping whitespace first.
    fn word_end_after(&self, pos: usize) -> usize {
        let len = self.value.len();
        let mut i = pos;
        while i < len && self.value[i].is_whitespace() {
            i += 1;
        }
        while i < len && !self.value[i].is_whitespace() {
            i += 1;
        }
        i
    }

    /// Keeps the cursor inside the visible window.
    fn handle_overflow(&mut self) {
        let total: usize = self.value.iter().map(|c| c.width().unwrap_or(0)).sum();
        if self.width == 0 || total <= self.width {
            self.offset = 0;
            self.offset_right = self.value.len();
            return;
        }

        self.offset = self.offset.min(self.value.len());
        self.offset_right = self.offset_right.min(self.value.len());

        if self.pos < self.offset {
            self.offset = self.pos;
            self.offset_right = self.offset + self.fit_forward(self.offset);
        } else if self.pos >= self.offset_right {
            self.offset_right = self.pos;
            self.offset = self.fit_backward(self.offset_right);
        } else {
            self.offset_right = self.offset + self.fit_forward(self.offset);
        }
    }

    /// Number of characters starting at `from` that fit into the width.
    fn fit_forward(&self, from: usize) -> usize {
        let mut w = 0;
        self.value[from..]
            .iter()
            .take_while(|c| {
                w += c.width().unwrap_or(0);
                w <= self.width
            })
            .count()
    }

    /// First index such that `[index, to)` fits into the width.
    fn fit_backward(&self, to: usize) -> usize {
        let mut w = 0;
        let fitting = self.value[..to]
            .iter()
            .rev()
            .take_while(|c| {
                w += c.width().unwrap_or(0);
                // One cell is reserved for the cursor at the end.
                w < self.width
            })
            .count();
        to - fitting
    }

    fn echo(&self, chars: &[char]) -> String {
        match self.echo_mode {
            EchoMode::Normal => chars.iter().collect(),
            EchoMode::Password(mask) => std::iter::repeat_n(mask, chars.len()).collect(),
        }
    }

    /// Renders the buffer with a reverse-video cursor, or the placeholder if
    /// the buffer is empty.
    #[must_use]
    pub fn view(&self) -> String {
        if self.value.is_empty() {
            let mut chars = self.placeholder.chars();
            return match chars.next() {
                Some(first) => {
                    let rest: String = chars.collect();
                    let mut out = style::reverse(&first.to_string());
                    if !rest.is_empty() {
                        out.push_str(&style::faint(&rest));
                    }
                    out
                }
                None => style::reverse(" "),
            };
        }

        let end = self.offset_right.max(self.offset).min(self.value.len());
        let visible = &self.value[self.offset..end];
        let cursor = self.pos.saturating_sub(self.offset).min(visible.len());

        let mut out = self.echo(&visible[..cursor]);
        if cursor < visible.len() {
            out.push_str(&style::reverse(&self.echo(&visible[cursor..=cursor])));
            out.push_str(&self.echo(&visible[cursor + 1..]));
        } else {
            out.push_str(&style::reverse(" "));
        }
        out
    }
}
