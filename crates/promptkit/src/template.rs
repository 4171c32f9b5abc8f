//! Template engine binding.
//!
//! Prompt views are minijinja (Jinja2) templates. Every environment gets the
//! helper functions below; prompts add their own state-dependent functions
//! through the render context, and callers may register extension functions
//! that override any helper.
//!
//! | Function | Result |
//! |---|---|
//! | `Repeat(text, n)` | `text` repeated `n` times |
//! | `Len(text)` | display width of `text`, ignoring ANSI styling |
//! | `Min(a, b)`, `Max(a, b)` | integer minimum / maximum |
//! | `Add(a, b)`, `Sub(a, b)`, `Mul(a, b)` | integer arithmetic |
//! | `Bold`, `Faint`, `Italic`, `Underline`, `Blink`, `Reverse`, `CrossOut`, `Overline` | text attributes |
//! | `Foreground(color, text)`, `Background(color, text)` | colors |
//! | `Color(fg, bg, text)` | both colors |
//!
//! Colors are ANSI 256 indices (`"32"`), hex (`"#ff8700"`) or names.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crossterm::style::Attribute;
use minijinja::value::Rest;
use minijinja::{Environment, UndefinedBehavior};

pub use minijinja::{Error, Value};

use crate::error::{PromptError, Result};
use crate::style;

/// A caller supplied template function.
pub type ExtraFunc = Arc<dyn Fn(&[Value]) -> std::result::Result<Value, Error> + Send + Sync>;

/// Named extension functions.
pub type FuncMap = BTreeMap<String, ExtraFunc>;

/// Wraps a closure as an [`ExtraFunc`].
///
/// ```rust
/// use promptkit::template::{Value, extra_func};
///
/// let shout = extra_func(|args| {
///     Ok(Value::from(args.first().map(|v| v.to_string().to_uppercase()).unwrap_or_default()))
/// });
/// assert_eq!(shout(&[Value::from("hi")]).unwrap().to_string(), "HI");
/// ```
pub fn extra_func<F>(f: F) -> ExtraFunc
where
    F: Fn(&[Value]) -> std::result::Result<Value, Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn repeat(text: String, n: i64) -> String {
    text.repeat(usize::try_from(n).unwrap_or(0))
}

fn len(value: &Value) -> usize {
    value.as_str().map_or_else(
        || value.len().unwrap_or(0),
        style::visible_width,
    )
}

fn styled(attr: Attribute) -> impl Fn(String) -> String + Send + Sync + 'static {
    move |text| style::attribute(attr, &text)
}

/// Registers the helper functions on an environment.
fn register_helpers(env: &mut Environment<'static>) {
    env.add_function("Repeat", repeat);
    env.add_function("Len", |v: Value| len(&v));
    env.add_function("Min", |a: i64, b: i64| a.min(b));
    env.add_function("Max", |a: i64, b: i64| a.max(b));
    env.add_function("Add", |a: i64, b: i64| a.saturating_add(b));
    env.add_function("Sub", |a: i64, b: i64| a.saturating_sub(b));
    env.add_function("Mul", |a: i64, b: i64| a.saturating_mul(b));

    env.add_function("Bold", styled(Attribute::Bold));
    env.add_function("Faint", styled(Attribute::Dim));
    env.add_function("Italic", styled(Attribute::Italic));
    env.add_function("Underline", styled(Attribute::Underlined));
    env.add_function("Blink", styled(Attribute::SlowBlink));
    env.add_function("Reverse", styled(Attribute::Reverse));
    env.add_function("CrossOut", styled(Attribute::CrossedOut));
    env.add_function("Overline", styled(Attribute::OverLined));
    env.add_function("Foreground", |color: String, text: String| {
        style::foreground(&color, &text)
    });
    env.add_function("Background", |color: String, text: String| {
        style::background(&color, &text)
    });
    env.add_function("Color", |fg: String, bg: String, text: String| {
        style::color(&fg, &bg, &text)
    });
}

/// A compiled set of templates for one prompt.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Creates an engine with the helpers and the given extension functions.
    #[must_use]
    pub fn new(extra: &FuncMap) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        register_helpers(&mut env);
        for (name, func) in extra {
            let func = Arc::clone(func);
            env.add_function(name.clone(), move |args: Rest<Value>| func(&args));
        }
        Self { env }
    }

    /// Compiles a template under the given name.
    ///
    /// # Errors
    ///
    /// [`PromptError::EmptyTemplate`] for an empty source and
    /// [`PromptError::TemplateParse`] for syntax errors.
    pub fn add(&mut self, name: &'static str, source: &str) -> Result<()> {
        if source.is_empty() {
            return Err(PromptError::EmptyTemplate);
        }
        self.env
            .add_template_owned(name, source.to_string())
            .map_err(|e| PromptError::TemplateParse(e.to_string()))
    }

    /// Whether a template with this name was compiled.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Renders a compiled template.
    ///
    /// # Errors
    ///
    /// [`PromptError::TemplateRender`] if the template is missing or fails,
    /// e.g. by referencing an undefined binding.
    pub fn render(&self, name: &str, ctx: Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|t| t.render(ctx))
            .map_err(|e| PromptError::TemplateRender(e.to_string()))
    }
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine").finish_non_exhaustive()
    }
}

/// Builds a render context from name/value pairs.
pub(crate) fn context<I>(bindings: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    bindings.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context as empty;

    fn render(src: &str, ctx: Value) -> Result<String> {
        let mut engine = TemplateEngine::new(&FuncMap::new());
        engine.add("t", src)?;
        engine.render("t", ctx)
    }

    #[test]
    fn test_helpers() {
        let ctx = context([("Name", Value::from("ab"))]);
        assert_eq!(
            render(r#"{{ Repeat("-", 3) }}{{ Len(Name) }}"#, ctx.clone()).unwrap(),
            "---2"
        );
        assert_eq!(
            render("{{ Min(1, 2) }} {{ Max(1, 2) }} {{ Add(2, 3) }} {{ Sub(2, 3) }} {{ Mul(2, 3) }}", ctx).unwrap(),
            "1 2 5 -1 6"
        );
    }

    #[test]
    fn test_len_ignores_styling() {
        let out = render(r#"{{ Len(Bold("four")) }}"#, empty! {}).unwrap();
        assert_eq!(out, "4");
    }

    #[test]
    fn test_repeat_negative_count() {
        assert_eq!(render(r#"[{{ Repeat("x", -2) }}]"#, empty! {}).unwrap(), "[]");
    }

    #[test]
    fn test_undefined_binding_fails() {
        let err = render("{{ Missing }}", empty! {}).unwrap_err();
        assert!(matches!(err, PromptError::TemplateRender(_)));
    }

    #[test]
    fn test_parse_errors() {
        let mut engine = TemplateEngine::new(&FuncMap::new());
        assert_eq!(engine.add("t", ""), Err(PromptError::EmptyTemplate));
        assert!(matches!(
            engine.add("t", "{{ unclosed"),
            Err(PromptError::TemplateParse(_))
        ));
        assert!(!engine.has("t"));
    }

    #[test]
    fn test_extension_overrides_helper() {
        let mut funcs = FuncMap::new();
        funcs.insert(
            "Bold".to_string(),
            extra_func(|args| Ok(Value::from(format!("*{}*", args[0])))),
        );
        let mut engine = TemplateEngine::new(&funcs);
        engine.add("t", r#"{{ Bold("x") }}"#).unwrap();
        assert_eq!(engine.render("t", empty! {}).unwrap(), "*x*");
    }

    #[test]
    fn test_context_functions() {
        let hint = Value::from_function(|i: usize| i == 2);
        let ctx = context([("IsLast", hint)]);
        assert_eq!(
            render("{% for i in [1, 2] %}{{ i }}{% if IsLast(i) %}!{% endif %} {% endfor %}", ctx)
                .unwrap(),
            "1 2! "
        );
    }
}
