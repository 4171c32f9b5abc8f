//! Key bindings and key map validation.
//!
//! Every prompt keeps a key map: a struct with one [`Binding`] per logical
//! action. Key maps are serde-friendly so they can be loaded from
//! configuration files.
//!
//! # Example
//!
//! ```rust
//! use promptkit::binding::Binding;
//! use promptkit::{KeyMsg, KeyType};
//!
//! let submit = Binding::new().keys(&["enter", "ctrl+j"]).help("enter", "submit");
//!
//! assert!(submit.matches(&KeyMsg::from_type(KeyType::Enter)));
//! assert!(!submit.matches(&KeyMsg::from_char('x')));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PromptError, Result};
use crate::key::KeyMsg;

/// Help text for a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Help {
    /// The key(s) as shown to the user (e.g. "↑/k").
    pub key: String,
    /// What the binding does.
    pub desc: String,
}

/// The key chords that trigger one logical action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binding {
    keys: Vec<String>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding without keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chords for this binding.
    #[must_use]
    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.set_keys(keys);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Disables the binding.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Replaces the chords for this binding.
    pub fn set_keys(&mut self, keys: &[&str]) {
        self.keys = keys.iter().map(|&s| s.to_string()).collect();
    }

    /// The chords for this binding.
    #[must_use]
    pub fn get_keys(&self) -> &[String] {
        &self.keys
    }

    /// The help text for this binding.
    #[must_use]
    pub const fn get_help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding can fire: not disabled and at least one chord.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub const fn enable(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Removes chords and help, leaving an inert binding.
    pub fn unbind(&mut self) {
        self.keys.clear();
        self.help = Help::default();
    }

    /// Whether the key press triggers this binding.
    ///
    /// A chord matches if it equals the key's textual form (`"y"`, `"alt+x"`,
    /// `"ctrl+c"`) or the name of its key type (`"enter"`). Comparison is
    /// exact and case sensitive.
    #[must_use]
    pub fn matches(&self, key: &KeyMsg) -> bool {
        if !self.enabled() {
            return false;
        }
        let text = key.to_string();
        let typed = key.key_type.to_string();
        self.keys.iter().any(|k| *k == text || *k == typed)
    }
}

/// Requirement on a key map, checked once at prompt initialization.
#[derive(Debug, Clone, Copy)]
pub enum Requirement<'a> {
    /// The named action must be bound.
    One(&'static str, &'a Binding),
    /// At least one of the groups must be fully bound. The string describes
    /// the alternatives in the error message.
    AnyOf(&'static str, &'a [&'a [&'a Binding]]),
}

/// Checks a key map against the prompt's requirements.
///
/// # Errors
///
/// Returns [`PromptError::InsufficientKeyMap`] naming every unmet
/// requirement.
pub fn validate(requirements: &[Requirement<'_>]) -> Result<()> {
    let missing: Vec<&str> = requirements
        .iter()
        .filter_map(|req| match req {
            Requirement::One(name, binding) => (!binding.enabled()).then_some(*name),
            Requirement::AnyOf(desc, groups) => {
                let satisfied = groups
                    .iter()
                    .any(|group| group.iter().all(|b| b.enabled()));
                (!satisfied).then_some(*desc)
            }
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PromptError::insufficient_key_map(format!(
            "no key bound for {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyType;

    #[test]
    fn test_binding_new() {
        let binding = Binding::new();
        assert!(binding.get_keys().is_empty());
        assert!(!binding.enabled());
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut binding = Binding::new().keys(&["q"]).disabled();
        assert!(!binding.matches(&KeyMsg::from_char('q')));
        binding.enable(true);
        assert!(binding.matches(&KeyMsg::from_char('q')));
    }

    #[test]
    fn test_unbind() {
        let mut binding = Binding::new().keys(&["q"]).help("q", "quit");
        binding.unbind();
        assert!(!binding.enabled());
        assert!(binding.get_help().key.is_empty());
    }

    #[test]
    fn test_matches_text_and_type() {
        let b = Binding::new().keys(&["y", "Y", "enter", "ctrl+c", "alt+x"]);
        assert!(b.matches(&KeyMsg::from_char('y')));
        assert!(b.matches(&KeyMsg::from_char('Y')));
        assert!(b.matches(&KeyMsg::from_type(KeyType::Enter)));
        assert!(b.matches(&KeyMsg::from_type(KeyType::Ctrl('c'))));
        assert!(b.matches(&KeyMsg::from_char('x').with_alt()));
        assert!(!b.matches(&KeyMsg::from_char('x')));
        assert!(!b.matches(&KeyMsg::from_char('n')));
    }

    #[test]
    fn test_runes_chord_does_not_match_everything() {
        let b = Binding::new().keys(&["runes"]);
        assert!(b.matches(&KeyMsg::from_char('a')));
        assert!(!b.matches(&KeyMsg::from_type(KeyType::Tab)));
    }

    #[test]
    fn test_validate() {
        let a = Binding::new().keys(&["a"]);
        let empty = Binding::new();

        assert!(validate(&[Requirement::One("A", &a)]).is_ok());

        let err = validate(&[Requirement::One("A", &a), Requirement::One("B", &empty)])
            .unwrap_err();
        assert_eq!(err.to_string(), "insufficient key map: no key bound for B");

        let groups: &[&[&Binding]] = &[&[&empty], &[&a, &a]];
        assert!(validate(&[Requirement::AnyOf("either", groups)]).is_ok());
        let groups: &[&[&Binding]] = &[&[&empty], &[&a, &empty]];
        assert!(validate(&[Requirement::AnyOf("either", groups)]).is_err());
    }

    #[test]
    fn test_serde_roundtrip_with_defaults() {
        let b: Binding = serde_json::from_str(r#"{"keys":["enter"]}"#).unwrap();
        assert_eq!(b.get_keys(), &["enter"]);
        assert!(b.enabled());
        assert!(b.get_help().desc.is_empty());
    }
}
