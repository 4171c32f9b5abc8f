//! Yes/no confirmation prompt.
//!
//! # Example
//!
//! ```rust
//! use promptkit::confirmation::{Confirmation, Decision};
//! use promptkit::{KeyMsg, Model, Msg};
//!
//! let mut model = Confirmation::new("Continue?", Decision::Undecided).into_model();
//! model.init();
//! model.update(Msg::Key(KeyMsg::from_char('y')));
//! assert_eq!(model.value(), Ok(true));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::binding::{self, Binding, Requirement};
use crate::error::{PromptError, Result};
use crate::event::{Cmd, Model, Msg};
use crate::key::KeyMsg;
use crate::state::{Phase, PromptState, RESULT, VIEW};
use crate::template::{FuncMap, Value, context};
use crate::wrap::{self, WrapMode};

/// The current choice is marked by an arrow.
pub const TEMPLATE_ARROW: &str = r#"{{ Bold(Prompt) }}
{%- if YesSelected %}{{ Bold(" ▸Yes ") }} No
{%- elif NoSelected %}  Yes {{ Bold("▸No") }}
{%- else %}  Yes  No
{%- endif %}"#;

/// Result template matching [`TEMPLATE_ARROW`].
pub const RESULT_TEMPLATE_ARROW: &str = r#"{{ Prompt }} {{ Foreground("32", "Yes" if FinalValue else "No") }}"#;

/// Classic `[y/n]` indicator with the current value capitalized and bold.
pub const TEMPLATE_YN: &str = r#"{{ Bold(Prompt) }}
{%- if YesSelected %} [{{ Bold("Y") }}/n]
{%- elif NoSelected %} [y/{{ Bold("N") }}]
{%- else %} [y/n]
{%- endif %}"#;

/// Result template matching [`TEMPLATE_YN`].
pub const RESULT_TEMPLATE_YN: &str = r#"{{ Bold(Prompt) }}
{%- if FinalValue %} [{{ Foreground("32", Bold("Y")) }}/n]
{%- else %} [y/{{ Foreground("32", Bold("N")) }}]
{%- endif %}"#;

/// The default template.
pub const DEFAULT_TEMPLATE: &str = TEMPLATE_ARROW;

/// The default result template.
pub const DEFAULT_RESULT_TEMPLATE: &str = RESULT_TEMPLATE_ARROW;

/// A confirmation value. Undecided is its own state, not a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Decision {
    Yes,
    No,
    #[default]
    Undecided,
}

impl Decision {
    /// The toggled value; toggling from undecided yields yes.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No | Self::Undecided => Self::Yes,
        }
    }
}

impl From<bool> for Decision {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

impl TryFrom<Decision> for bool {
    type Error = PromptError;

    fn try_from(value: Decision) -> Result<Self> {
        match value {
            Decision::Yes => Ok(true),
            Decision::No => Ok(false),
            Decision::Undecided => Err(PromptError::Undecided),
        }
    }
}

// -----------------------------------------------------------------------------
// KeyMap
// -----------------------------------------------------------------------------

/// Key bindings of the confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KeyMap {
    /// Decide yes and quit.
    pub yes: Binding,
    /// Decide no and quit.
    pub no: Binding,
    /// Select yes without quitting.
    pub select_yes: Binding,
    /// Select no without quitting.
    pub select_no: Binding,
    pub toggle: Binding,
    /// Quit with the selected value, if there is one.
    pub submit: Binding,
    pub abort: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            yes: Binding::new().keys(&["y", "Y"]).help("y", "yes"),
            no: Binding::new().keys(&["n", "N"]).help("n", "no"),
            select_yes: Binding::new().keys(&["left"]).help("←", "select yes"),
            select_no: Binding::new().keys(&["right"]).help("→", "select no"),
            toggle: Binding::new().keys(&["tab"]).help("tab", "toggle"),
            submit: Binding::new().keys(&["enter"]).help("enter", "submit"),
            abort: Binding::new().keys(&["ctrl+c"]).help("ctrl+c", "abort"),
        }
    }
}

impl KeyMap {
    /// Submit and abort must be bound, and there must be some way to pick a
    /// value.
    ///
    /// # Errors
    ///
    /// [`PromptError::InsufficientKeyMap`] naming what is missing.
    pub fn validate(&self) -> Result<()> {
        let pickers: &[&[&Binding]] = &[
            &[&self.toggle],
            &[&self.select_yes, &self.select_no],
            &[&self.yes, &self.no],
        ];
        binding::validate(&[
            Requirement::One("Submit", &self.submit),
            Requirement::One("Abort", &self.abort),
            Requirement::AnyOf("Toggle, SelectYes+SelectNo or Yes+No", pickers),
        ])
    }
}

// -----------------------------------------------------------------------------
// Confirmation
// -----------------------------------------------------------------------------

/// Configuration of a confirmation prompt.
///
/// Template bindings: `Prompt`, `YesSelected`, `NoSelected`, `Undecided`,
/// `DefaultYes`, `DefaultNo`, `DefaultUndecided`, `TerminalWidth`.
///
/// Result template bindings: `FinalValue` (bool), `FinalValueSet`,
/// `Prompt`, `TerminalWidth`.
#[derive(Clone)]
pub struct Confirmation {
    pub prompt: String,
    /// The value selected when the prompt starts.
    pub default_value: Decision,
    pub template: String,
    /// Rendered once the prompt is done; empty renders nothing.
    pub result_template: String,
    /// Extra template functions; they take precedence over the helpers.
    pub extended_template_funcs: FuncMap,
    pub key_map: KeyMap,
    /// `None` disables wrapping.
    pub wrap_mode: Option<WrapMode>,
    /// Upper bound for the wrap width; 0 means the terminal width.
    pub max_width: usize,
}

impl Confirmation {
    /// Creates a confirmation with the default templates and key map.
    pub fn new(prompt: impl Into<String>, default_value: Decision) -> Self {
        Self {
            prompt: prompt.into(),
            default_value,
            template: DEFAULT_TEMPLATE.to_string(),
            result_template: DEFAULT_RESULT_TEMPLATE.to_string(),
            extended_template_funcs: FuncMap::new(),
            key_map: KeyMap::default(),
            wrap_mode: Some(wrap::word_wrap),
            max_width: 0,
        }
    }

    /// Sets the templates.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>, result: impl Into<String>) -> Self {
        self.template = template.into();
        self.result_template = result.into();
        self
    }

    /// Sets the key map.
    #[must_use]
    pub fn key_map(mut self, key_map: KeyMap) -> Self {
        self.key_map = key_map;
        self
    }

    /// Sets the wrap mode.
    #[must_use]
    pub fn wrap_mode(mut self, mode: Option<WrapMode>) -> Self {
        self.wrap_mode = mode;
        self
    }

    /// Sets the maximum width.
    #[must_use]
    pub const fn max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Registers an extra template function.
    #[must_use]
    pub fn template_func(mut self, name: impl Into<String>, func: crate::template::ExtraFunc) -> Self {
        self.extended_template_funcs.insert(name.into(), func);
        self
    }

    /// Creates the prompt model.
    #[must_use]
    pub fn into_model(self) -> ConfirmationModel {
        ConfirmationModel::new(self)
    }
}

impl std::fmt::Debug for Confirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Confirmation")
            .field("prompt", &self.prompt)
            .field("default_value", &self.default_value)
            .field("key_map", &self.key_map)
            .field("max_width", &self.max_width)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Model
// -----------------------------------------------------------------------------

/// A running confirmation prompt.
#[derive(Debug)]
pub struct ConfirmationModel {
    config: Confirmation,
    value: Decision,
    state: PromptState,
}

impl ConfirmationModel {
    /// Creates a model from its configuration.
    #[must_use]
    pub fn new(config: Confirmation) -> Self {
        Self {
            value: config.default_value,
            config,
            state: PromptState::default(),
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &Confirmation {
        &self.config
    }

    /// Mutable access to the configuration; changes after `init` have no
    /// effect on compiled templates.
    pub const fn config_mut(&mut self) -> &mut Confirmation {
        &mut self.config
    }

    /// The currently selected value, decided or not.
    #[must_use]
    pub const fn decision(&self) -> Decision {
        self.value
    }

    /// The stored error, if any.
    #[must_use]
    pub const fn err(&self) -> Option<&PromptError> {
        self.state.err()
    }

    /// The final value.
    ///
    /// # Errors
    ///
    /// The stored error if the prompt failed or was aborted, otherwise
    /// [`PromptError::Undecided`] while no value is selected.
    pub fn value(&self) -> Result<bool> {
        if let Some(err) = self.state.err() {
            return Err(err.clone());
        }
        bool::try_from(self.value)
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        let keys = &self.config.key_map;
        if keys.submit.matches(key) {
            if self.value == Decision::Undecided {
                return None;
            }
            debug!(value = ?self.value, "confirmation submitted");
            return self.state.quit();
        }
        if keys.abort.matches(key) {
            return self.state.fail(PromptError::Aborted);
        }
        if keys.yes.matches(key) {
            self.value = Decision::Yes;
            return self.state.quit();
        }
        if keys.no.matches(key) {
            self.value = Decision::No;
            return self.state.quit();
        }
        if keys.select_yes.matches(key) {
            self.value = Decision::Yes;
        } else if keys.select_no.matches(key) {
            self.value = Decision::No;
        } else if keys.toggle.matches(key) {
            self.value = self.value.toggled();
        }
        None
    }

    fn view_context(&self) -> Value {
        context([
            ("Prompt", Value::from(self.config.prompt.as_str())),
            ("YesSelected", Value::from(self.value == Decision::Yes)),
            ("NoSelected", Value::from(self.value == Decision::No)),
            ("Undecided", Value::from(self.value == Decision::Undecided)),
            ("DefaultYes", Value::from(self.config.default_value == Decision::Yes)),
            ("DefaultNo", Value::from(self.config.default_value == Decision::No)),
            (
                "DefaultUndecided",
                Value::from(self.config.default_value == Decision::Undecided),
            ),
            ("TerminalWidth", Value::from(self.state.width())),
        ])
    }

    fn result_context(&self) -> Option<Value> {
        if !self.state.has_result_template() {
            return None;
        }
        let value = self.value().ok()?;
        Some(context([
            ("FinalValue", Value::from(value)),
            ("FinalValueSet", Value::from(true)),
            ("Prompt", Value::from(self.config.prompt.as_str())),
            ("TerminalWidth", Value::from(self.state.width())),
        ]))
    }
}

impl Model for ConfirmationModel {
    fn init(&mut self) -> Option<Cmd> {
        self.value = self.config.default_value;
        let keys = &self.config.key_map;
        self.state.init(
            "confirmation",
            &self.config.extended_template_funcs,
            &self.config.template,
            Some(&self.config.result_template),
            || keys.validate(),
        )
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if self.state.is_done() {
            return Some(Cmd::Quit);
        }
        match msg {
            Msg::Key(key) => self.handle_key(&key),
            Msg::WindowSize(size) => {
                self.state.resize(size.width, self.config.max_width);
                None
            }
            Msg::Error(err) => self.state.fail(err),
            Msg::Paste(_) => None,
        }
    }

    fn view(&mut self) -> String {
        let target = match self.state.phase() {
            Phase::Blank => None,
            Phase::Active => Some((VIEW, self.view_context())),
            Phase::Done => self.result_context().map(|ctx| (RESULT, ctx)),
        };
        self.state.render(target, self.config.wrap_mode)
    }
}
