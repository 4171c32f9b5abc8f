//! Error types shared by all prompts.

use thiserror::Error;

/// Broad classes of [`PromptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The prompt was set up wrong: incomplete key map, broken template,
    /// nothing to choose from. Detected by `init`.
    Configuration,
    /// The user cancelled the prompt.
    Abort,
    /// A template failed while rendering.
    Render,
    /// The final value was queried before the prompt reached a decision.
    ValueUnavailable,
    /// An error delivered by the host.
    External,
}

/// Errors produced by prompts.
///
/// Every error a running prompt encounters lands in a single sticky slot of
/// the prompt state; once it is set the prompt ignores further events and
/// the host loop should exit.
///
/// User abort is a normal exit path:
///
/// ```rust
/// use promptkit::PromptError;
///
/// fn report(result: Result<bool, PromptError>) -> &'static str {
///     match result {
///         Ok(true) => "yes",
///         Ok(false) => "no",
///         Err(e) if e.is_abort() => "cancelled",
///         Err(_) => "failed",
///     }
/// }
///
/// assert_eq!(report(Err(PromptError::Aborted)), "cancelled");
/// ```
///
/// # Note on Clone and PartialEq
///
/// Template engine errors are stored as their rendered message so that the
/// enum stays `Clone` and `PartialEq`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// The user aborted the prompt.
    #[error("prompt aborted")]
    Aborted,

    /// A key map lacks bindings for actions the prompt cannot work without.
    ///
    /// The string names the missing action(s).
    #[error("insufficient key map: {0}")]
    InsufficientKeyMap(String),

    /// A selection prompt was started without any choices.
    #[error("no choices provided")]
    NoChoices,

    /// The prompt template is empty.
    #[error("empty template")]
    EmptyTemplate,

    /// A template has a syntax error.
    #[error("parse template: {0}")]
    TemplateParse(String),

    /// A template failed during execution, e.g. by referencing an undefined
    /// field.
    #[error("execute template: {0}")]
    TemplateRender(String),

    /// The confirmation has no decided value yet.
    #[error("no decision was made")]
    Undecided,

    /// The selection has no choice under the cursor.
    #[error("no choice selected")]
    NoSelection,

    /// An error delivered to the prompt by the host.
    #[error("{0}")]
    External(String),
}

impl PromptError {
    /// Creates an insufficient key map error.
    pub fn insufficient_key_map(details: impl Into<String>) -> Self {
        Self::InsufficientKeyMap(details.into())
    }

    /// Creates an external error with the given message.
    pub fn external(message: impl Into<String>) -> Self {
        Self::External(message.into())
    }

    /// Returns the class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Aborted => ErrorKind::Abort,
            Self::InsufficientKeyMap(_)
            | Self::NoChoices
            | Self::EmptyTemplate
            | Self::TemplateParse(_) => ErrorKind::Configuration,
            Self::TemplateRender(_) => ErrorKind::Render,
            Self::Undecided | Self::NoSelection => ErrorKind::ValueUnavailable,
            Self::External(_) => ErrorKind::External,
        }
    }

    /// Returns true if the user cancelled the prompt.
    #[must_use]
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Returns true if the prompt was misconfigured.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.kind(), ErrorKind::Configuration)
    }
}

/// A specialized [`Result`] type for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;
