//! Completion sources for the text input prompt.
//!
//! An [`AutoComplete`] maps the current input to candidate values. A single
//! candidate replaces the input; several candidates replace it with their
//! [`common_prefix`] if that is longer than the input.

use std::sync::Arc;

/// A completion source: `input -> candidates`.
pub type AutoComplete = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Completes from a fixed list, ignoring case.
///
/// ```rust
/// use promptkit::autocomplete::autocomplete_from_slice;
///
/// let complete = autocomplete_from_slice(&["Apple", "apricot", "banana"]);
/// assert_eq!(complete("ap"), ["Apple", "apricot"]);
/// ```
pub fn autocomplete_from_slice<S: AsRef<str>>(choices: &[S]) -> AutoComplete {
    from_slice(choices, false)
}

/// Like [`autocomplete_from_slice`], but empty input completes to
/// `default_value`.
pub fn autocomplete_from_slice_with_default<S: AsRef<str>>(
    choices: &[S],
    default_value: impl Into<String>,
) -> AutoComplete {
    with_default(from_slice(choices, false), default_value.into())
}

/// Completes from a fixed list, respecting case.
pub fn case_sensitive_autocomplete_from_slice<S: AsRef<str>>(choices: &[S]) -> AutoComplete {
    from_slice(choices, true)
}

/// Like [`case_sensitive_autocomplete_from_slice`], but empty input
/// completes to `default_value`.
pub fn case_sensitive_autocomplete_from_slice_with_default<S: AsRef<str>>(
    choices: &[S],
    default_value: impl Into<String>,
) -> AutoComplete {
    with_default(from_slice(choices, true), default_value.into())
}

fn from_slice<S: AsRef<str>>(choices: &[S], case_sensitive: bool) -> AutoComplete {
    let choices: Vec<String> = choices.iter().map(|c| c.as_ref().to_string()).collect();
    Arc::new(move |input| {
        let needle = if case_sensitive {
            input.to_string()
        } else {
            input.to_lowercase()
        };
        choices
            .iter()
            .filter(|choice| {
                if case_sensitive {
                    choice.starts_with(&needle)
                } else {
                    choice.to_lowercase().starts_with(&needle)
                }
            })
            .cloned()
            .collect()
    })
}

fn with_default(inner: AutoComplete, default_value: String) -> AutoComplete {
    Arc::new(move |input| {
        if input.is_empty() {
            vec![default_value.clone()]
        } else {
            inner(input)
        }
    })
}

/// The longest prefix shared by all candidates, compared by character.
#[must_use]
pub fn common_prefix<S: AsRef<str>>(candidates: &[S]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };
    let mut prefix: Vec<char> = first.as_ref().chars().collect();
    for candidate in rest {
        let shared = prefix
            .iter()
            .zip(candidate.as_ref().chars())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(shared);
    }
    prefix.into_iter().collect()
}
