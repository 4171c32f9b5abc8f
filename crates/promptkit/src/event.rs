//! The contract between a prompt and the host loop that drives it.
//!
//! The host delivers one [`Msg`] at a time to [`Model::update`], pulls the
//! current text from [`Model::view`] after each one, and stops once a
//! [`Cmd::Quit`] comes back.

use std::fmt;

use crossterm::event::Event;

use crate::error::PromptError;
use crate::key::KeyMsg;

/// Terminal window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSizeMsg {
    /// Terminal width in columns.
    pub width: u16,
    /// Terminal height in rows.
    pub height: u16,
}

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A key press.
    Key(KeyMsg),
    /// The terminal was resized.
    WindowSize(WindowSizeMsg),
    /// Clipboard text, in answer to [`Cmd::Paste`].
    Paste(String),
    /// An out-of-band error. Terminates the prompt.
    Error(PromptError),
}

impl Msg {
    /// Shorthand for a resize event.
    #[must_use]
    pub const fn resize(width: u16, height: u16) -> Self {
        Self::WindowSize(WindowSizeMsg { width, height })
    }
}

impl From<KeyMsg> for Msg {
    fn from(key: KeyMsg) -> Self {
        Self::Key(key)
    }
}

impl From<WindowSizeMsg> for Msg {
    fn from(size: WindowSizeMsg) -> Self {
        Self::WindowSize(size)
    }
}

impl From<PromptError> for Msg {
    fn from(err: PromptError) -> Self {
        Self::Error(err)
    }
}

impl TryFrom<Event> for Msg {
    type Error = Event;

    /// Converts crossterm terminal events. Events that prompts do not react
    /// to (mouse, focus, key releases) are handed back unchanged.
    fn try_from(event: Event) -> Result<Self, Event> {
        match event {
            Event::Key(key) if key.kind != crossterm::event::KeyEventKind::Release => {
                Ok(Self::Key(key.into()))
            }
            Event::Resize(width, height) => Ok(Self::resize(width, height)),
            Event::Paste(text) => Ok(Self::Key(
                KeyMsg::from_runes(text.chars().collect()).with_paste(),
            )),
            other => Err(other),
        }
    }
}

/// A request from the prompt to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// The prompt reached a terminal state; stop delivering events.
    Quit,
    /// Read the clipboard and deliver its contents as [`Msg::Paste`].
    Paste,
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quit => f.write_str("quit"),
            Self::Paste => f.write_str("paste"),
        }
    }
}

/// The Elm-architecture interface every prompt implements.
pub trait Model {
    /// Validates configuration and compiles templates.
    ///
    /// Returns [`Cmd::Quit`] if the prompt cannot run.
    fn init(&mut self) -> Option<Cmd>;

    /// Processes one event.
    fn update(&mut self, msg: Msg) -> Option<Cmd>;

    /// Renders the prompt.
    ///
    /// Takes `&mut self` because a template failure is recorded into the
    /// prompt's error slot.
    fn view(&mut self) -> String;
}
