//! Choices for the selection prompt.
//!
//! Arbitrary values are normalized into [`Choice`]s once, when the prompt is
//! configured. How a value is displayed is decided by the [`Item`] variant
//! it arrives in and is never recomputed afterwards.

use std::fmt;

use serde::Serialize;

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    /// Position in the complete, unfiltered choice list.
    pub index: usize,
    /// Text shown to the user.
    pub string: String,
    /// The payload returned when this choice is selected.
    pub value: T,
}

impl<T> Choice<T> {
    /// Creates a choice with an explicit label. The index is assigned by
    /// [`reindex`].
    pub fn new(string: impl Into<String>, value: T) -> Self {
        Self {
            index: 0,
            string: string.into(),
            value,
        }
    }

    /// The template view of this choice.
    #[must_use]
    pub fn view(&self) -> ChoiceView {
        ChoiceView {
            index: self.index,
            string: self.string.clone(),
        }
    }
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string)
    }
}

/// What templates see of a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChoiceView {
    pub index: usize,
    pub string: String,
}

/// A stringification hook.
pub type Describe<T> = fn(&T) -> String;

/// A raw value on its way to becoming a [`Choice`].
///
/// The display string is resolved in this order: an existing choice keeps
/// its string, a label is used as given, otherwise the describe hook runs.
/// The constructors pick the hook: [`Item::text`] for values that are
/// already text, [`Item::display`] for values with a
/// [`Display`](fmt::Display) impl and [`Item::debug`] as the structural
/// fallback.
pub enum Item<T> {
    Choice(Choice<T>),
    Labeled(String, T),
    Described(T, Describe<T>),
}

impl<T> Item<T> {
    /// A value that is its own label.
    pub fn text(value: T) -> Self
    where
        T: AsRef<str>,
    {
        Self::Described(value, |v| v.as_ref().to_string())
    }

    /// A value shown through its `Display` impl.
    pub fn display(value: T) -> Self
    where
        T: fmt::Display,
    {
        Self::Described(value, |v| v.to_string())
    }

    /// A value shown through its `Debug` impl.
    pub fn debug(value: T) -> Self
    where
        T: fmt::Debug,
    {
        Self::Described(value, |v| format!("{v:?}"))
    }

    fn into_choice(self) -> Choice<T> {
        match self {
            Self::Choice(choice) => choice,
            Self::Labeled(label, value) => Choice::new(label, value),
            Self::Described(value, describe) => Choice::new(describe(&value), value),
        }
    }
}

impl<T> From<Choice<T>> for Item<T> {
    fn from(choice: Choice<T>) -> Self {
        Self::Choice(choice)
    }
}

impl<T: fmt::Debug> fmt::Debug for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choice(c) => f.debug_tuple("Choice").field(c).finish(),
            Self::Labeled(l, v) => f.debug_tuple("Labeled").field(l).field(v).finish(),
            Self::Described(v, _) => f.debug_tuple("Described").field(v).finish(),
        }
    }
}

/// Normalizes raw items into indexed choices.
#[must_use]
pub fn normalize<T, I>(items: I) -> Vec<Choice<T>>
where
    I: IntoIterator<Item = Item<T>>,
{
    let mut choices: Vec<Choice<T>> = items.into_iter().map(Item::into_choice).collect();
    reindex(&mut choices);
    choices
}

/// Assigns `index = position` over the complete list.
pub fn reindex<T>(choices: &mut [Choice<T>]) {
    for (i, choice) in choices.iter_mut().enumerate() {
        choice.index = i;
    }
}

/// Choices from values that are text.
#[must_use]
pub fn from_strings<T, I>(items: I) -> Vec<Choice<T>>
where
    T: AsRef<str>,
    I: IntoIterator<Item = T>,
{
    normalize(items.into_iter().map(Item::text))
}

/// Choices from values with a `Display` impl.
#[must_use]
pub fn from_display<T, I>(items: I) -> Vec<Choice<T>>
where
    T: fmt::Display,
    I: IntoIterator<Item = T>,
{
    normalize(items.into_iter().map(Item::display))
}

/// Choices from values shown by their `Debug` representation.
#[must_use]
pub fn from_debug<T, I>(items: I) -> Vec<Choice<T>>
where
    T: fmt::Debug,
    I: IntoIterator<Item = T>,
{
    normalize(items.into_iter().map(Item::debug))
}
