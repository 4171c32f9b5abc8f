//! Lifecycle shared by all prompts: template compilation at init, the sticky
//! error slot, the quitting flag, terminal width and view rendering.

use tracing::{debug, warn};

use crate::error::{PromptError, Result};
use crate::event::Cmd;
use crate::template::{FuncMap, TemplateEngine, Value};
use crate::wrap::{self, WrapMode};

pub(crate) const VIEW: &str = "view";
pub(crate) const RESULT: &str = "result";

/// What a prompt should render next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Not initialized, or initialization failed.
    Blank,
    /// Taking input.
    Active,
    /// Quitting or errored: the result view applies.
    Done,
}

#[derive(Debug, Default)]
pub(crate) struct PromptState {
    engine: Option<TemplateEngine>,
    err: Option<PromptError>,
    quitting: bool,
    width: usize,
}

impl PromptState {
    /// Validates the configuration and compiles the templates.
    ///
    /// On failure the error is stored and [`Cmd::Quit`] returned.
    pub fn init(
        &mut self,
        kind: &'static str,
        funcs: &FuncMap,
        template: &str,
        result_template: Option<&str>,
        validate: impl FnOnce() -> Result<()>,
    ) -> Option<Cmd> {
        let compiled = validate().and_then(|()| {
            let mut engine = TemplateEngine::new(funcs);
            engine.add(VIEW, template)?;
            if let Some(src) = result_template.filter(|s| !s.is_empty()) {
                engine.add(RESULT, src)?;
            }
            Ok(engine)
        });

        match compiled {
            Ok(engine) => {
                debug!(prompt = kind, "initialized");
                self.engine = Some(engine);
                None
            }
            Err(err) => {
                debug!(prompt = kind, error = %err, "initialization failed");
                self.fail(err)
            }
        }
    }

    pub const fn err(&self) -> Option<&PromptError> {
        self.err.as_ref()
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    /// Whether events should be ignored.
    pub const fn is_done(&self) -> bool {
        self.quitting || self.err.is_some()
    }

    pub const fn phase(&self) -> Phase {
        if self.engine.is_none() {
            Phase::Blank
        } else if self.is_done() {
            Phase::Done
        } else {
            Phase::Active
        }
    }

    /// Whether a result template was compiled.
    pub fn has_result_template(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.has(RESULT))
    }

    /// Stores a fatal error and asks the host to quit.
    pub fn fail(&mut self, err: PromptError) -> Option<Cmd> {
        if err.is_abort() {
            debug!("aborted");
        }
        self.err = Some(err);
        self.quitting = true;
        Some(Cmd::Quit)
    }

    /// Enters the terminal state with a value.
    pub fn quit(&mut self) -> Option<Cmd> {
        self.quitting = true;
        Some(Cmd::Quit)
    }

    pub fn resize(&mut self, width: u16, max_width: usize) {
        self.width = wrap::zero_aware_min(usize::from(width), max_width);
    }

    /// Renders a template, captures failures into the error slot and wraps
    /// the output.
    ///
    /// `None` renders nothing. A stored render error is shown in place of
    /// the view on every later call.
    pub fn render(
        &mut self,
        target: Option<(&'static str, Value)>,
        wrap_mode: Option<WrapMode>,
    ) -> String {
        if let Some(err @ PromptError::TemplateRender(_)) = &self.err {
            return format!("Template Error: {err}");
        }
        let (Some(engine), Some((name, ctx))) = (&self.engine, target) else {
            return String::new();
        };
        match engine.render(name, ctx) {
            Ok(text) => wrap::apply(wrap_mode, &text, self.width),
            Err(err) => {
                warn!(template = name, error = %err, "template failed");
                let text = format!("Template Error: {err}");
                self.err = Some(err);
                text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Value {
        crate::template::context([("Name", Value::from("x"))])
    }

    #[test]
    fn test_init_failure_is_sticky() {
        let mut state = PromptState::default();
        let cmd = state.init("test", &FuncMap::new(), "{{ Name", None, || Ok(()));
        assert_eq!(cmd, Some(Cmd::Quit));
        assert!(matches!(state.err(), Some(PromptError::TemplateParse(_))));
        assert_eq!(state.phase(), Phase::Blank);
        assert_eq!(state.render(Some((VIEW, ctx())), None), "");
    }

    #[test]
    fn test_validation_runs_first() {
        let mut state = PromptState::default();
        state.init("test", &FuncMap::new(), "ok", None, || {
            Err(PromptError::insufficient_key_map("Submit"))
        });
        assert!(matches!(state.err(), Some(PromptError::InsufficientKeyMap(_))));
    }

    #[test]
    fn test_render_error_is_captured_once() {
        let mut state = PromptState::default();
        state.init("test", &FuncMap::new(), "{{ Missing }}", None, || Ok(()));
        assert_eq!(state.phase(), Phase::Active);

        let first = state.render(Some((VIEW, ctx())), None);
        assert!(first.starts_with("Template Error: "));
        assert!(state.is_done());
        assert_eq!(state.render(Some((VIEW, ctx())), None), first);
    }

    #[test]
    fn test_result_template_optional() {
        let mut state = PromptState::default();
        state.init("test", &FuncMap::new(), "{{ Name }}", Some(""), || Ok(()));
        assert!(!state.has_result_template());
        assert_eq!(state.render(Some((VIEW, ctx())), None), "x");
    }

    #[test]
    fn test_resize_respects_max_width() {
        let mut state = PromptState::default();
        state.resize(120, 80);
        assert_eq!(state.width(), 80);
        state.resize(40, 80);
        assert_eq!(state.width(), 40);
        state.resize(40, 0);
        assert_eq!(state.width(), 40);
    }
}
