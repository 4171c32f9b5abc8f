//! Single-line text input prompt with validation, masking and
//! autocompletion.
//!
//! # Example
//!
//! ```rust
//! use promptkit::key::KeyType;
//! use promptkit::textinput::TextInput;
//! use promptkit::{KeyMsg, Model, Msg};
//!
//! let mut model = TextInput::new("Name:").into_model();
//! model.init();
//! for c in "Ada".chars() {
//!     model.update(Msg::Key(KeyMsg::from_char(c)));
//! }
//! model.update(Msg::Key(KeyMsg::from_type(KeyType::Enter)));
//! assert_eq!(model.value().as_deref(), Ok("Ada"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::autocomplete::{AutoComplete, common_prefix};
use crate::binding::{self, Binding, Requirement};
use crate::editor::{EchoMode, EditOp, Editor};
use crate::error::{PromptError, Result};
use crate::event::{Cmd, Model, Msg};
use crate::key::KeyMsg;
use crate::state::{Phase, PromptState, RESULT, VIEW};
use crate::template::{FuncMap, Value, context};
use crate::wrap::{self, WrapMode};

/// The default template: the input followed by a validity marker.
pub const DEFAULT_TEMPLATE: &str = r#"{{ Bold(Prompt) }} {{ Input }}
{%- if ValidationError %} {{ Foreground("1", "✘") }}
{%- else %} {{ Foreground("2", "✔") }}
{%- endif %}"#;

/// The default result template.
pub const DEFAULT_RESULT_TEMPLATE: &str =
    r#"{{ Bold(Prompt ~ " " ~ Foreground("32", Mask(FinalValue))) }}"#;

/// The default mask of hidden input.
pub const DEFAULT_MASK: char = '●';

/// Decides whether input may be submitted; `Err` carries the reason.
pub type Validator = Arc<dyn Fn(&str) -> std::result::Result<(), String> + Send + Sync>;

/// Rejects empty input.
///
/// # Errors
///
/// When `input` is empty.
pub fn validate_not_empty(input: &str) -> std::result::Result<(), String> {
    if input.is_empty() {
        Err("no input".to_string())
    } else {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// KeyMap
// -----------------------------------------------------------------------------

/// Key bindings of the text input prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KeyMap {
    pub move_backward: Binding,
    pub move_forward: Binding,
    pub jump_to_beginning: Binding,
    pub jump_to_end: Binding,
    pub delete_before_cursor: Binding,
    pub delete_word_before_cursor: Binding,
    pub delete_under_cursor: Binding,
    pub delete_all_after_cursor: Binding,
    pub delete_all_before_cursor: Binding,
    /// Request the clipboard from the host.
    pub paste: Binding,
    /// Restore the initial value.
    pub reset: Binding,
    /// Empty the input.
    pub clear: Binding,
    pub auto_complete: Binding,
    /// Quit with the input, if it is valid.
    pub submit: Binding,
    pub abort: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            move_backward: Binding::new().keys(&["left"]).help("←", "move left"),
            move_forward: Binding::new().keys(&["right"]).help("→", "move right"),
            jump_to_beginning: Binding::new().keys(&["home"]).help("home", "start of line"),
            jump_to_end: Binding::new().keys(&["end"]).help("end", "end of line"),
            delete_before_cursor: Binding::new().keys(&["backspace"]).help("backspace", "delete"),
            delete_word_before_cursor: Binding::new()
                .keys(&["ctrl+w"])
                .help("ctrl+w", "delete word"),
            delete_under_cursor: Binding::new().keys(&["delete"]).help("delete", "delete forward"),
            delete_all_after_cursor: Binding::new()
                .keys(&["ctrl+k"])
                .help("ctrl+k", "delete to end"),
            delete_all_before_cursor: Binding::new()
                .keys(&["ctrl+u"])
                .help("ctrl+u", "delete to start"),
            paste: Binding::new().keys(&["ctrl+v"]).help("ctrl+v", "paste"),
            reset: Binding::new().keys(&["esc"]).help("esc", "reset"),
            clear: Binding::new(),
            auto_complete: Binding::new().keys(&["tab"]).help("tab", "complete"),
            submit: Binding::new().keys(&["enter"]).help("enter", "submit"),
            abort: Binding::new().keys(&["ctrl+c"]).help("ctrl+c", "abort"),
        }
    }
}

/// A logical text input action.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Submit,
    Abort,
    Reset,
    Clear,
    AutoComplete,
    Edit(EditOp),
    Paste,
}

impl KeyMap {
    /// Submit and abort must be bound.
    ///
    /// # Errors
    ///
    /// [`PromptError::InsufficientKeyMap`] naming what is missing.
    pub fn validate(&self) -> Result<()> {
        binding::validate(&[
            Requirement::One("Submit", &self.submit),
            Requirement::One("Abort", &self.abort),
        ])
    }

    /// The first action bound to the key, in priority order. Unbound keys
    /// that produce text insert it.
    fn action(&self, key: &KeyMsg) -> Option<Action> {
        let actions = [
            (&self.submit, Action::Submit),
            (&self.abort, Action::Abort),
            (&self.reset, Action::Reset),
            (&self.clear, Action::Clear),
            (&self.auto_complete, Action::AutoComplete),
            (&self.delete_all_after_cursor, Action::Edit(EditOp::DeleteAllAfterCursor)),
            (&self.delete_all_before_cursor, Action::Edit(EditOp::DeleteAllBeforeCursor)),
            (&self.delete_word_before_cursor, Action::Edit(EditOp::DeleteWordBeforeCursor)),
            (&self.delete_under_cursor, Action::Edit(EditOp::DeleteUnderCursor)),
            (&self.delete_before_cursor, Action::Edit(EditOp::DeleteBeforeCursor)),
            (&self.move_backward, Action::Edit(EditOp::MoveBackward)),
            (&self.move_forward, Action::Edit(EditOp::MoveForward)),
            (&self.jump_to_beginning, Action::Edit(EditOp::JumpToBeginning)),
            (&self.jump_to_end, Action::Edit(EditOp::JumpToEnd)),
            (&self.paste, Action::Paste),
        ];
        actions
            .into_iter()
            .find_map(|(binding, action)| binding.matches(key).then_some(action))
            .or_else(|| key.text().map(|text| Action::Edit(EditOp::Insert(text))))
    }
}

// -----------------------------------------------------------------------------
// TextInput
// -----------------------------------------------------------------------------

/// Configuration of a text input prompt.
///
/// Template bindings: `Prompt`, `InitialValue`, `Placeholder`, `Input`,
/// `Valid`, `ValidationError`, `AutoCompleteTriggered`,
/// `AutoCompleteIndecisive`, `AutoCompleteSuggestions`, `TerminalWidth` and
/// the function `Mask(text)`.
///
/// Result template bindings: `FinalValue`, `Prompt`, `InitialValue`,
/// `Placeholder`, `Hidden`, `TerminalWidth` and the function `Mask(text)`.
#[derive(Clone)]
pub struct TextInput {
    pub prompt: String,
    /// Shown while the input is empty.
    pub placeholder: String,
    /// Editable value the input starts with.
    pub initial_value: String,
    /// `None` accepts any input.
    pub validate: Option<Validator>,
    /// Mask the input, e.g. for passwords.
    pub hidden: bool,
    pub hide_mask: char,
    /// Maximum number of characters; 0 means unlimited.
    pub char_limit: usize,
    /// Visible width of the input field; 0 means unlimited.
    pub input_width: usize,
    /// `None` disables completion.
    pub auto_complete: Option<AutoComplete>,
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

impl TextInput {
    /// Creates a text input that rejects empty input.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            placeholder: String::new(),
            initial_value: String::new(),
            validate: Some(Arc::new(validate_not_empty)),
            hidden: false,
            hide_mask: DEFAULT_MASK,
            char_limit: 0,
            input_width: 0,
            auto_complete: None,
            template: DEFAULT_TEMPLATE.to_string(),
            result_template: DEFAULT_RESULT_TEMPLATE.to_string(),
            extended_template_funcs: FuncMap::new(),
            key_map: KeyMap::default(),
            wrap_mode: Some(wrap::word_wrap),
            max_width: 0,
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
        self
    }

    /// Sets the validator; `None` accepts any input.
    #[must_use]
    pub fn validate(mut self, validate: Option<Validator>) -> Self {
        self.validate = validate;
        self
    }

    /// Masks the input with the given character.
    #[must_use]
    pub const fn hidden(mut self, mask: char) -> Self {
        self.hidden = true;
        self.hide_mask = mask;
        self
    }

    #[must_use]
    pub const fn char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    #[must_use]
    pub const fn input_width(mut self, width: usize) -> Self {
        self.input_width = width;
        self
    }

    /// Sets the completion source.
    #[must_use]
    pub fn auto_complete(mut self, source: AutoComplete) -> Self {
        self.auto_complete = Some(source);
        self
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
    pub fn into_model(self) -> TextInputModel {
        TextInputModel::new(self)
    }
}

/// `text` with every character replaced by the mask if hidden.
fn mask(hidden: bool, hide_mask: char, text: &str) -> String {
    if hidden {
        std::iter::repeat_n(hide_mask, text.chars().count()).collect()
    } else {
        text.to_string()
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("prompt", &self.prompt)
            .field("placeholder", &self.placeholder)
            .field("hidden", &self.hidden)
            .field("char_limit", &self.char_limit)
            .field("input_width", &self.input_width)
            .field("key_map", &self.key_map)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Model
// -----------------------------------------------------------------------------

/// A running text input prompt.
#[derive(Debug)]
pub struct TextInputModel {
    config: TextInput,
    input: Editor,
    auto_complete_triggered: bool,
    auto_complete_indecisive: bool,
    state: PromptState,
}

impl TextInputModel {
    /// Creates a model from its configuration.
    #[must_use]
    pub fn new(config: TextInput) -> Self {
        Self {
            config,
            input: Editor::new(),
            auto_complete_triggered: false,
            auto_complete_indecisive: false,
            state: PromptState::default(),
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &TextInput {
        &self.config
    }

    /// Mutable access to the configuration; changes after `init` are not
    /// supported.
    pub const fn config_mut(&mut self) -> &mut TextInput {
        &mut self.config
    }

    /// The stored error, if any.
    #[must_use]
    pub const fn err(&self) -> Option<&PromptError> {
        self.state.err()
    }

    /// The current input, unmasked.
    #[must_use]
    pub fn input(&self) -> String {
        self.input.value()
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.input.position()
    }

    /// Whether the last key press triggered completion.
    #[must_use]
    pub const fn auto_complete_triggered(&self) -> bool {
        self.auto_complete_triggered
    }

    /// Whether the last completion found several candidates.
    #[must_use]
    pub const fn auto_complete_indecisive(&self) -> bool {
        self.auto_complete_indecisive
    }

    /// The current input as the final value.
    ///
    /// # Errors
    ///
    /// The stored error if the prompt failed or was aborted.
    pub fn value(&self) -> Result<String> {
        match self.state.err() {
            Some(err) => Err(err.clone()),
            None => Ok(self.input.value()),
        }
    }

    /// Validates the current input; `Ok` without a validator.
    fn validation(&self) -> std::result::Result<(), String> {
        self.config
            .validate
            .as_ref()
            .map_or(Ok(()), |validate| validate(&self.input.value()))
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        let action = self.config.key_map.action(key)?;
        if action != Action::AutoComplete {
            self.auto_complete_triggered = false;
            self.auto_complete_indecisive = false;
        }
        match action {
            Action::Submit => {
                if let Err(reason) = self.validation() {
                    trace!(%reason, "input rejected");
                    return None;
                }
                debug!(len = self.input.value().chars().count(), "input submitted");
                return self.state.quit();
            }
            Action::Abort => return self.state.fail(PromptError::Aborted),
            Action::Reset => self.input.set_value(&self.config.initial_value),
            Action::Clear => self.input.set_value(""),
            Action::AutoComplete => self.complete(),
            Action::Edit(op) => {
                self.input.apply(&op);
            }
            Action::Paste => return Some(Cmd::Paste),
        }
        None
    }

    fn complete(&mut self) {
        let Some(source) = &self.config.auto_complete else {
            return;
        };
        let input = self.input.value();
        let candidates = source(&input);
        self.auto_complete_triggered = true;
        self.auto_complete_indecisive = candidates.len() > 1;
        match candidates.as_slice() {
            [] => {}
            [only] => self.input.set_value(only),
            many => {
                // A shared prefix only replaces the input when it extends it.
                let prefix = common_prefix(many);
                if prefix.chars().count() > input.chars().count() {
                    self.input.set_value(&prefix);
                }
            }
        }
        trace!(candidates = candidates.len(), "completion");
    }

    fn suggestions(&self) -> Vec<String> {
        match &self.config.auto_complete {
            Some(source) if self.auto_complete_indecisive => source(&self.input.value()),
            _ => Vec::new(),
        }
    }

    fn mask_func(&self) -> Value {
        let (hidden, hide_mask) = (self.config.hidden, self.config.hide_mask);
        Value::from_function(move |text: String| mask(hidden, hide_mask, &text))
    }

    fn view_context(&self) -> Value {
        let validation = self.validation();
        context([
            ("Prompt", Value::from(self.config.prompt.as_str())),
            ("InitialValue", Value::from(self.config.initial_value.as_str())),
            ("Placeholder", Value::from(self.config.placeholder.as_str())),
            ("Input", Value::from(self.input.view())),
            ("Valid", Value::from(validation.is_ok())),
            ("ValidationError", Value::from(validation.err())),
            ("AutoCompleteTriggered", Value::from(self.auto_complete_triggered)),
            ("AutoCompleteIndecisive", Value::from(self.auto_complete_indecisive)),
            ("AutoCompleteSuggestions", Value::from(self.suggestions())),
            ("TerminalWidth", Value::from(self.state.width())),
            ("Mask", self.mask_func()),
        ])
    }

    fn result_context(&self) -> Option<Value> {
        if !self.state.has_result_template() {
            return None;
        }
        let value = self.value().ok()?;
        Some(context([
            ("FinalValue", Value::from(value)),
            ("Prompt", Value::from(self.config.prompt.as_str())),
            ("InitialValue", Value::from(self.config.initial_value.as_str())),
            ("Placeholder", Value::from(self.config.placeholder.as_str())),
            ("Hidden", Value::from(self.config.hidden)),
            ("TerminalWidth", Value::from(self.state.width())),
            ("Mask", self.mask_func()),
        ]))
    }
}

impl Model for TextInputModel {
    fn init(&mut self) -> Option<Cmd> {
        let keys = &self.config.key_map;
        let cmd = self.state.init(
            "textinput",
            &self.config.extended_template_funcs,
            &self.config.template,
            Some(&self.config.result_template),
            || keys.validate(),
        );
        if cmd.is_some() {
            return cmd;
        }

        let mut input = Editor::new();
        input.placeholder.clone_from(&self.config.placeholder);
        input.char_limit = self.config.char_limit;
        input.width = self.config.input_width;
        if self.config.hidden {
            input.echo_mode = EchoMode::Password(self.config.hide_mask);
        }
        input.set_value(&self.config.initial_value);
        self.input = input;

        debug!(
            hidden = self.config.hidden,
            char_limit = self.config.char_limit,
            "textinput ready"
        );
        None
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
            Msg::Paste(text) => {
                self.auto_complete_triggered = false;
                self.auto_complete_indecisive = false;
                self.input.apply(&EditOp::Insert(text));
                None
            }
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
