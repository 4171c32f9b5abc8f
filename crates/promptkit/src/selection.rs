//! Single-choice selection prompt with filtering and pagination.
//!
//! # Example
//!
//! ```rust
//! use promptkit::choice::from_strings;
//! use promptkit::key::KeyType;
//! use promptkit::selection::Selection;
//! use promptkit::{KeyMsg, Model, Msg};
//!
//! let mut model = Selection::new("Color?", from_strings(["red", "green", "blue"])).into_model();
//! model.init();
//! model.update(Msg::Key(KeyMsg::from_type(KeyType::Down)));
//! model.update(Msg::Key(KeyMsg::from_type(KeyType::Enter)));
//! assert_eq!(model.value(), Ok(&"green"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::binding::{self, Binding, Requirement};
use crate::choice::{Choice, ChoiceView, reindex};
use crate::editor::{EditOp, Editor};
use crate::error::{PromptError, Result};
use crate::event::{Cmd, Model, Msg};
use crate::key::KeyMsg;
use crate::paging::{self, FilterFn, Paginator, Source};
use crate::state::{Phase, PromptState, RESULT, VIEW};
use crate::template::{Error, FuncMap, Value, context};
use crate::wrap::{self, WrapMode};

/// The default template.
///
/// The first visible row shows `⇡` while there are choices above the
/// window, the last one `⇣` while there are choices below it.
pub const DEFAULT_TEMPLATE: &str = r#"{% if Prompt %}
{{ Bold(Prompt) }}
{% endif %}
{% if IsFiltered %}
{{ FilterPrompt }} {{ FilterInput }}
{% endif %}
{% for choice in Choices %}
{% if IsScrollUpHintPosition(loop.index0) %}{{ "⇡ " }}{% elif IsScrollDownHintPosition(loop.index0) %}{{ "⇣ " }}{% else %}{{ "  " }}{% endif %}
{% if loop.index0 == SelectedIndex %}{{ Foreground("32", Bold("▸ " ~ Selected(choice))) }}{% else %}{{ "  " ~ Unselected(choice) }}{% endif %}

{% endfor %}"#;

/// The default result template.
pub const DEFAULT_RESULT_TEMPLATE: &str =
    r#"{{ Prompt }} {{ Foreground("32", Final(FinalChoice)) }}"#;

/// The default filter prompt.
pub const DEFAULT_FILTER_PROMPT: &str = "Filter:";

/// The default filter placeholder.
pub const DEFAULT_FILTER_PLACEHOLDER: &str = "Type to filter choices";

/// Renders a choice for the `Selected`, `Unselected` and `Final` template
/// functions.
pub type ChoiceStyle<T> = Arc<dyn Fn(&Choice<T>) -> String + Send + Sync>;

// -----------------------------------------------------------------------------
// KeyMap
// -----------------------------------------------------------------------------

/// Key bindings of the selection prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct KeyMap {
    pub down: Binding,
    pub up: Binding,
    /// Quit with the choice under the cursor.
    pub select: Binding,
    pub abort: Binding,
    /// Empty the filter text.
    pub clear_filter: Binding,
    /// Reveal the next choice below the window.
    pub scroll_down: Binding,
    /// Reveal the previous choice above the window.
    pub scroll_up: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            down: Binding::new().keys(&["down"]).help("↓", "down"),
            up: Binding::new().keys(&["up"]).help("↑", "up"),
            select: Binding::new().keys(&["enter"]).help("enter", "select"),
            abort: Binding::new().keys(&["ctrl+c"]).help("ctrl+c", "abort"),
            clear_filter: Binding::new().keys(&["esc"]).help("esc", "clear filter"),
            scroll_down: Binding::new().keys(&["pgdown"]).help("pgdown", "scroll down"),
            scroll_up: Binding::new().keys(&["pgup"]).help("pgup", "scroll up"),
        }
    }
}

/// A logical selection action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Abort,
    Select,
    ClearFilter,
    Down,
    Up,
    ScrollDown,
    ScrollUp,
}

impl KeyMap {
    /// Select, abort, up and down must be bound.
    ///
    /// # Errors
    ///
    /// [`PromptError::InsufficientKeyMap`] naming what is missing.
    pub fn validate(&self) -> Result<()> {
        binding::validate(&[
            Requirement::One("Select", &self.select),
            Requirement::One("Abort", &self.abort),
            Requirement::One("Up", &self.up),
            Requirement::One("Down", &self.down),
        ])
    }

    /// The first action bound to the key, in priority order.
    fn action(&self, key: &KeyMsg) -> Option<Action> {
        [
            (&self.abort, Action::Abort),
            (&self.select, Action::Select),
            (&self.clear_filter, Action::ClearFilter),
            (&self.down, Action::Down),
            (&self.up, Action::Up),
            (&self.scroll_down, Action::ScrollDown),
            (&self.scroll_up, Action::ScrollUp),
        ]
        .into_iter()
        .find_map(|(binding, action)| binding.matches(key).then_some(action))
    }
}

// -----------------------------------------------------------------------------
// Selection
// -----------------------------------------------------------------------------

/// Configuration of a selection prompt.
///
/// Template bindings: `Prompt`, `IsFiltered`, `FilterPrompt`, `FilterInput`,
/// `Choices`, `NChoices`, `SelectedIndex`, `PageSize`, `IsPaged`,
/// `AllChoices`, `NAllChoices`, `TerminalWidth` and the functions
/// `IsScrollUpHintPosition(i)`, `IsScrollDownHintPosition(i)`,
/// `Selected(choice)`, `Unselected(choice)`. Choices are maps with `Index`
/// and `String`.
///
/// Result template bindings: `FinalChoice`, `Prompt`, `AllChoices`,
/// `NAllChoices`, `TerminalWidth` and the function `Final(choice)`.
pub struct Selection<T> {
    pub choices: Vec<Choice<T>>,
    pub prompt: String,
    /// `None` disables filtering.
    pub filter: Option<FilterFn<T>>,
    pub filter_prompt: String,
    pub filter_placeholder: String,
    /// Maximum number of visible choices; 0 shows all of them.
    pub page_size: usize,
    /// Moving past either end wraps to the other one.
    pub loop_cursor: bool,
    pub template: String,
    /// Rendered once the prompt is done; empty renders nothing.
    pub result_template: String,
    /// Extra template functions; they take precedence over the helpers.
    pub extended_template_funcs: FuncMap,
    pub key_map: KeyMap,
    pub selected_choice_style: Option<ChoiceStyle<T>>,
    pub unselected_choice_style: Option<ChoiceStyle<T>>,
    pub final_choice_style: Option<ChoiceStyle<T>>,
    /// `None` disables wrapping.
    pub wrap_mode: Option<WrapMode>,
    /// Upper bound for the wrap width; 0 means the terminal width.
    pub max_width: usize,
}

impl<T: 'static> Selection<T> {
    /// Creates a selection with case-insensitive filtering, no paging and
    /// the default templates.
    pub fn new(prompt: impl Into<String>, mut choices: Vec<Choice<T>>) -> Self {
        reindex(&mut choices);
        Self {
            choices,
            prompt: prompt.into(),
            filter: Some(Arc::new(paging::filter_contains_case_insensitive::<T>)),
            filter_prompt: DEFAULT_FILTER_PROMPT.to_string(),
            filter_placeholder: DEFAULT_FILTER_PLACEHOLDER.to_string(),
            page_size: 0,
            loop_cursor: false,
            template: DEFAULT_TEMPLATE.to_string(),
            result_template: DEFAULT_RESULT_TEMPLATE.to_string(),
            extended_template_funcs: FuncMap::new(),
            key_map: KeyMap::default(),
            selected_choice_style: None,
            unselected_choice_style: None,
            final_choice_style: None,
            wrap_mode: Some(wrap::word_wrap),
            max_width: 0,
        }
    }

    /// Sets the filter; `None` disables filtering.
    #[must_use]
    pub fn filter(mut self, filter: Option<FilterFn<T>>) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Enables or disables cursor wrap-around.
    #[must_use]
    pub const fn loop_cursor(mut self, enabled: bool) -> Self {
        self.loop_cursor = enabled;
        self
    }

    /// Sets the filter prompt and placeholder.
    #[must_use]
    pub fn filter_prompt(mut self, prompt: impl Into<String>, placeholder: impl Into<String>) -> Self {
        self.filter_prompt = prompt.into();
        self.filter_placeholder = placeholder.into();
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

    /// Sets the style of the choice under the cursor.
    #[must_use]
    pub fn selected_choice_style(
        mut self,
        style: impl Fn(&Choice<T>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.selected_choice_style = Some(Arc::new(style));
        self
    }

    /// Sets the style of the other visible choices.
    #[must_use]
    pub fn unselected_choice_style(
        mut self,
        style: impl Fn(&Choice<T>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.unselected_choice_style = Some(Arc::new(style));
        self
    }

    /// Sets the style of the chosen value in the result view.
    #[must_use]
    pub fn final_choice_style(
        mut self,
        style: impl Fn(&Choice<T>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.final_choice_style = Some(Arc::new(style));
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
    pub fn into_model(self) -> SelectionModel<T> {
        SelectionModel::new(self)
    }
}

impl<T: Clone> Clone for Selection<T> {
    fn clone(&self) -> Self {
        Self {
            choices: self.choices.clone(),
            prompt: self.prompt.clone(),
            filter: self.filter.clone(),
            filter_prompt: self.filter_prompt.clone(),
            filter_placeholder: self.filter_placeholder.clone(),
            page_size: self.page_size,
            loop_cursor: self.loop_cursor,
            template: self.template.clone(),
            result_template: self.result_template.clone(),
            extended_template_funcs: self.extended_template_funcs.clone(),
            key_map: self.key_map.clone(),
            selected_choice_style: self.selected_choice_style.clone(),
            unselected_choice_style: self.unselected_choice_style.clone(),
            final_choice_style: self.final_choice_style.clone(),
            wrap_mode: self.wrap_mode,
            max_width: self.max_width,
        }
    }
}

impl<T> fmt::Debug for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("prompt", &self.prompt)
            .field("choices", &self.choices.len())
            .field("filtered", &self.filter.is_some())
            .field("page_size", &self.page_size)
            .field("loop_cursor", &self.loop_cursor)
            .field("key_map", &self.key_map)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Model
// -----------------------------------------------------------------------------

/// A running selection prompt.
pub struct SelectionModel<T> {
    config: Selection<T>,
    filter: Editor,
    paginator: Paginator,
    all_choices: Value,
    state: PromptState,
}

impl<T> SelectionModel<T> {
    /// Creates a model from its configuration.
    #[must_use]
    pub fn new(config: Selection<T>) -> Self {
        Self {
            config,
            filter: Editor::new(),
            paginator: Paginator::default(),
            all_choices: Value::UNDEFINED,
            state: PromptState::default(),
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &Selection<T> {
        &self.config
    }

    /// Mutable access to the configuration; changes after `init` are not
    /// supported.
    pub const fn config_mut(&mut self) -> &mut Selection<T> {
        &mut self.config
    }

    /// The stored error, if any.
    #[must_use]
    pub const fn err(&self) -> Option<&PromptError> {
        self.state.err()
    }

    /// The current filter text.
    #[must_use]
    pub fn filter_text(&self) -> String {
        self.filter.value()
    }

    /// Cursor and window state.
    #[must_use]
    pub const fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// The choices currently on screen.
    #[must_use]
    pub fn visible_choices(&self) -> Vec<&Choice<T>> {
        self.paginator
            .page()
            .visible
            .iter()
            .filter_map(|&i| self.config.choices.get(i))
            .collect()
    }

    /// The choice under the cursor, or the final choice once the prompt is
    /// done.
    ///
    /// # Errors
    ///
    /// The stored error if the prompt failed or was aborted, otherwise
    /// [`PromptError::NoSelection`] while no choice is visible.
    pub fn choice(&self) -> Result<&Choice<T>> {
        if let Some(err) = self.state.err() {
            return Err(err.clone());
        }
        self.paginator
            .selected()
            .and_then(|i| self.config.choices.get(i))
            .ok_or(PromptError::NoSelection)
    }

    /// The payload of [`SelectionModel::choice`].
    ///
    /// # Errors
    ///
    /// See [`SelectionModel::choice`].
    pub fn value(&self) -> Result<&T> {
        self.choice().map(|c| &c.value)
    }

    /// Runs a paginator operation against the current filter.
    fn page(&mut self, op: impl FnOnce(&mut Paginator, &Source<'_, T>)) {
        let text = self.filter.value();
        let source = Source {
            choices: &self.config.choices,
            filter_text: &text,
            filter: self.config.filter.as_ref(),
        };
        op(&mut self.paginator, &source);
    }

    fn refilter(&mut self) {
        self.page(Paginator::reset);
        debug!(
            filter_len = self.filter.value().chars().count(),
            matching = self.paginator.page().total_matching,
            "filter applied"
        );
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        match self.config.key_map.action(key) {
            Some(Action::Abort) => return self.state.fail(PromptError::Aborted),
            Some(Action::Select) => {
                let index = self.paginator.selected()?;
                debug!(index, "selection submitted");
                return self.state.quit();
            }
            Some(Action::ClearFilter) => {
                self.filter.set_value("");
                self.refilter();
            }
            Some(Action::Down) => self.page(Paginator::cursor_down),
            Some(Action::Up) => self.page(Paginator::cursor_up),
            Some(Action::ScrollDown) => self.page(|p, s| {
                p.scroll_down(s);
            }),
            Some(Action::ScrollUp) => self.page(|p, s| {
                p.scroll_up(s);
            }),
            None => {
                if let Some(op) = EditOp::from_key(key) {
                    self.edit_filter(&op);
                }
            }
        }
        None
    }

    /// Forwards an edit to the filter input, if filtering is enabled.
    fn edit_filter(&mut self, op: &EditOp) {
        if self.config.filter.is_none() {
            return;
        }
        if self.filter.apply(op) {
            self.refilter();
        }
    }

    fn view_context(&self) -> Value {
        let visible = self.visible_choices();
        let views: Vec<ChoiceView> = visible.iter().map(|c| c.view()).collect();
        let selected = style_lookup(&visible, self.config.selected_choice_style.as_ref());
        let unselected = style_lookup(&visible, self.config.unselected_choice_style.as_ref());

        let pager = Arc::new(self.paginator.clone());
        let up = Arc::clone(&pager);
        let down = pager;

        context([
            ("Prompt", Value::from(self.config.prompt.as_str())),
            ("IsFiltered", Value::from(self.config.filter.is_some())),
            ("FilterPrompt", Value::from(self.config.filter_prompt.as_str())),
            ("FilterInput", Value::from(self.filter.view())),
            ("Choices", Value::from_serialize(&views)),
            ("NChoices", Value::from(views.len())),
            ("SelectedIndex", Value::from(self.paginator.cursor())),
            ("PageSize", Value::from(self.paginator.page_size())),
            ("IsPaged", Value::from(self.paginator.is_paged())),
            ("AllChoices", self.all_choices.clone()),
            ("NAllChoices", Value::from(self.config.choices.len())),
            ("TerminalWidth", Value::from(self.state.width())),
            (
                "IsScrollUpHintPosition",
                Value::from_function(move |i: usize| up.is_scroll_up_hint_position(i)),
            ),
            (
                "IsScrollDownHintPosition",
                Value::from_function(move |i: usize| down.is_scroll_down_hint_position(i)),
            ),
            ("Selected", selected),
            ("Unselected", unselected),
        ])
    }

    fn result_context(&self) -> Option<Value> {
        if !self.state.has_result_template() {
            return None;
        }
        let choice = self.choice().ok()?;
        Some(context([
            ("FinalChoice", Value::from_serialize(choice.view())),
            ("Prompt", Value::from(self.config.prompt.as_str())),
            ("AllChoices", self.all_choices.clone()),
            ("NAllChoices", Value::from(self.config.choices.len())),
            ("TerminalWidth", Value::from(self.state.width())),
            (
                "Final",
                style_lookup(&[choice], self.config.final_choice_style.as_ref()),
            ),
        ]))
    }
}

/// A template function rendering choices through an optional style.
///
/// Styles are applied up front to the given choices; any other choice
/// renders as its plain string.
fn style_lookup<T>(choices: &[&Choice<T>], style: Option<&ChoiceStyle<T>>) -> Value {
    let styled: BTreeMap<usize, String> = choices
        .iter()
        .map(|c| (c.index, style.map_or_else(|| c.string.clone(), |f| f(c))))
        .collect();
    Value::from_function(move |choice: Value| -> std::result::Result<String, Error> {
        let index = usize::try_from(choice.get_attr("Index")?)?;
        match styled.get(&index) {
            Some(text) => Ok(text.clone()),
            None => Ok(choice.get_attr("String")?.to_string()),
        }
    })
}

impl<T> Model for SelectionModel<T> {
    fn init(&mut self) -> Option<Cmd> {
        reindex(&mut self.config.choices);
        let config = &self.config;
        let cmd = self.state.init(
            "selection",
            &config.extended_template_funcs,
            &config.template,
            Some(&config.result_template),
            || {
                if config.choices.is_empty() {
                    return Err(PromptError::NoChoices);
                }
                config.key_map.validate()
            },
        );
        if cmd.is_some() {
            return cmd;
        }

        self.filter = Editor::new();
        self.filter.placeholder.clone_from(&self.config.filter_placeholder);
        self.paginator = Paginator::new(self.config.page_size, self.config.loop_cursor);
        self.page(Paginator::reset);
        let views: Vec<ChoiceView> = self.config.choices.iter().map(Choice::view).collect();
        self.all_choices = Value::from_serialize(&views);

        debug!(
            choices = self.config.choices.len(),
            page_size = self.config.page_size,
            filtered = self.config.filter.is_some(),
            "selection ready"
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
                self.edit_filter(&EditOp::Insert(text));
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

impl<T> fmt::Debug for SelectionModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionModel")
            .field("config", &self.config)
            .field("filter", &self.filter)
            .field("paginator", &self.paginator)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
