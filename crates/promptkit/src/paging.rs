//! Filtering and pagination of choices.
//!
//! [`visible_page`] is a pure function from the full choice list, the filter
//! and the scroll offset to the window of choices on screen. [`Paginator`]
//! keeps the cursor and scroll offset and recomputes the window as they
//! move.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::choice::Choice;

/// A filter predicate: `(filter_text, choice) -> keep`.
pub type FilterFn<T> = Arc<dyn Fn(&str, &Choice<T>) -> bool + Send + Sync>;

/// Keeps choices whose string contains the filter text, ignoring case.
pub fn filter_contains_case_insensitive<T>(filter: &str, choice: &Choice<T>) -> bool {
    choice
        .string
        .to_lowercase()
        .contains(&filter.to_lowercase())
}

/// Keeps choices whose string contains the filter text exactly.
pub fn filter_contains_case_sensitive<T>(filter: &str, choice: &Choice<T>) -> bool {
    choice.string.contains(filter)
}

/// The choices on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Positions into the full choice list, in original order.
    pub visible: Vec<usize>,
    /// How many choices match the filter in total.
    pub total_matching: usize,
    /// Length of the full, unfiltered list.
    pub total_choices: usize,
}

/// The inputs that decide which choices match.
pub struct Source<'a, T> {
    pub choices: &'a [Choice<T>],
    pub filter_text: &'a str,
    /// `None` disables filtering.
    pub filter: Option<&'a FilterFn<T>>,
}

impl<T> Source<'_, T> {
    fn matches(&self, choice: &Choice<T>) -> bool {
        self.filter.is_none_or(|f| f(self.filter_text, choice))
    }
}

impl<T> fmt::Debug for Source<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("choices", &self.choices.len())
            .field("filter_text", &self.filter_text)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

/// Computes the visible window.
///
/// Matching choices are counted in full. The first `scroll_offset` matches
/// are skipped and up to `page_size` of the rest are shown; a page size of
/// zero shows all of them.
#[must_use]
pub fn visible_page<T>(source: &Source<'_, T>, page_size: usize, scroll_offset: usize) -> Page {
    let mut visible = Vec::new();
    let mut total_matching = 0;

    for (pos, choice) in source.choices.iter().enumerate() {
        if !source.matches(choice) {
            continue;
        }
        total_matching += 1;
        if total_matching <= scroll_offset {
            continue;
        }
        if page_size == 0 || visible.len() < page_size {
            visible.push(pos);
        }
    }

    Page {
        visible,
        total_matching,
        total_choices: source.choices.len(),
    }
}

/// Cursor and scroll state over a filtered, paged choice list.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    page_size: usize,
    loop_cursor: bool,
    scroll_offset: usize,
    cursor: usize,
    page: Page,
}

impl Paginator {
    /// Creates a paginator. A page size of zero disables paging.
    #[must_use]
    pub fn new(page_size: usize, loop_cursor: bool) -> Self {
        Self {
            page_size,
            loop_cursor,
            ..Self::default()
        }
    }

    /// Cursor position within the visible window.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of matching choices skipped before the window.
    #[must_use]
    pub const fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// The current window.
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Position in the full list of the choice under the cursor.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.page.visible.get(self.cursor).copied()
    }

    /// Whether the matching choices do not fit on one page.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.page_size > 0 && self.page.total_matching > self.page_size
    }

    /// Whether a scroll-down hint applies.
    ///
    /// Bounded by the length of the unfiltered list, so with a filter active
    /// this can report true while [`Paginator::scroll_down`] has nothing
    /// left to reveal.
    #[must_use]
    pub const fn can_scroll_down(&self) -> bool {
        self.is_paged() && self.scroll_offset + self.page_size < self.page.total_choices
    }

    #[must_use]
    pub const fn can_scroll_up(&self) -> bool {
        self.scroll_offset > 0
    }

    /// Whether row `i` of the window shows the scroll-up hint.
    #[must_use]
    pub const fn is_scroll_up_hint_position(&self, i: usize) -> bool {
        self.can_scroll_up() && i == 0
    }

    /// Whether row `i` of the window shows the scroll-down hint.
    #[must_use]
    pub const fn is_scroll_down_hint_position(&self, i: usize) -> bool {
        self.can_scroll_down() && i + 1 == self.page.visible.len()
    }

    /// Moves cursor and offset back to the top and recomputes the window.
    pub fn reset<T>(&mut self, source: &Source<'_, T>) {
        self.cursor = 0;
        self.scroll_offset = 0;
        self.recompute(source);
    }

    fn recompute<T>(&mut self, source: &Source<'_, T>) {
        self.page = visible_page(source, self.page_size, self.scroll_offset);
        self.cursor = self.cursor.min(self.page.visible.len().saturating_sub(1));
    }

    fn last(&self) -> Option<usize> {
        self.page.visible.len().checked_sub(1)
    }

    /// Reveals the next matching choice. The cursor keeps pointing at the
    /// same choice while that choice stays on screen.
    ///
    /// Returns false if there is nothing below the window.
    pub fn scroll_down<T>(&mut self, source: &Source<'_, T>) -> bool {
        if self.page_size == 0 || self.scroll_offset + self.page_size >= self.page.total_matching {
            return false;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.scroll_offset += 1;
        self.recompute(source);
        trace!(offset = self.scroll_offset, "scrolled down");
        true
    }

    /// Reveals the previous matching choice. Returns false at the top.
    pub fn scroll_up<T>(&mut self, source: &Source<'_, T>) -> bool {
        if self.page_size == 0 || self.scroll_offset == 0 {
            return false;
        }
        self.cursor = (self.cursor + 1).min(self.last().unwrap_or(0));
        self.scroll_offset -= 1;
        self.recompute(source);
        trace!(offset = self.scroll_offset, "scrolled up");
        true
    }

    /// Moves the cursor one row down, scrolling at the bottom of the window.
    ///
    /// With looping enabled, moving past the last match wraps to the first
    /// page.
    pub fn cursor_down<T>(&mut self, source: &Source<'_, T>) {
        let Some(last) = self.last() else {
            return;
        };
        if self.cursor < last {
            self.cursor += 1;
        } else if self.can_scroll_down() && self.scroll_down(source) {
            self.cursor = (self.cursor + 1).min(self.last().unwrap_or(0));
        } else if self.loop_cursor {
            self.scroll_offset = 0;
            self.cursor = 0;
            self.recompute(source);
        }
        trace!(cursor = self.cursor, offset = self.scroll_offset, "cursor down");
    }

    /// Moves the cursor one row up, scrolling at the top of the window.
    ///
    /// With looping enabled, moving past the first match wraps to the last
    /// page.
    pub fn cursor_up<T>(&mut self, source: &Source<'_, T>) {
        if self.page.visible.is_empty() {
            return;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
        } else if self.can_scroll_up() && self.scroll_up(source) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if self.loop_cursor {
            self.scroll_offset = if self.page_size > 0 {
                self.page.total_matching.saturating_sub(self.page_size)
            } else {
                0
            };
            self.recompute(source);
            self.cursor = self.last().unwrap_or(0);
        }
        trace!(cursor = self.cursor, offset = self.scroll_offset, "cursor up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::from_strings;

    fn strings(choices: &[Choice<&str>], page: &Page) -> Vec<String> {
        page.visible
            .iter()
            .map(|&i| choices[i].string.clone())
            .collect()
    }

    fn default_filter<T: 'static>() -> FilterFn<T> {
        Arc::new(filter_contains_case_insensitive::<T>)
    }

    #[test]
    fn test_visible_page_counts_all_matches() {
        let choices = from_strings(["AAA", "BBB", "CCC1", "CCC2", "DDD", "xcc"]);
        let filter = default_filter();
        let src = Source {
            choices: &choices,
            filter_text: "CC",
            filter: Some(&filter),
        };
        let page = visible_page(&src, 2, 0);
        assert_eq!(strings(&choices, &page), ["CCC1", "CCC2"]);
        assert_eq!(page.total_matching, 3);

        let page = visible_page(&src, 2, 1);
        assert_eq!(strings(&choices, &page), ["CCC2", "xcc"]);
    }

    #[test]
    fn test_no_filter_and_no_paging() {
        let choices = from_strings(["a", "b", "c"]);
        let src = Source {
            choices: &choices,
            filter_text: "zzz",
            filter: None,
        };
        let page = visible_page(&src, 0, 0);
        assert_eq!(page.visible, [0, 1, 2]);
        assert_eq!(page.total_matching, 3);
    }

    #[test]
    fn test_case_sensitive_filter() {
        let choices = from_strings(["Apple", "apple"]);
        assert!(filter_contains_case_sensitive("App", &choices[0]));
        assert!(!filter_contains_case_sensitive("App", &choices[1]));
        assert!(filter_contains_case_insensitive("App", &choices[1]));
    }

    #[test]
    fn test_cursor_pushes_page() {
        let choices = from_strings(["First1", "First2", "Second1", "Second2"]);
        let src = Source {
            choices: &choices,
            filter_text: "",
            filter: None,
        };
        let mut p = Paginator::new(2, false);
        p.reset(&src);
        p.cursor_down(&src);
        p.cursor_down(&src);
        assert_eq!(strings(&choices, p.page()), ["First2", "Second1"]);
        assert_eq!(p.selected(), Some(2));

        p.cursor_down(&src);
        p.cursor_down(&src);
        assert_eq!(strings(&choices, p.page()), ["Second1", "Second2"]);
        assert_eq!(p.selected(), Some(3));
        assert!(!p.can_scroll_down());

        p.cursor_up(&src);
        p.cursor_up(&src);
        assert_eq!(strings(&choices, p.page()), ["First2", "Second1"]);
        assert_eq!(p.selected(), Some(1));
    }

    #[test]
    fn test_scroll_keeps_logical_choice() {
        let choices = from_strings(["a", "b", "c", "d", "e"]);
        let src = Source {
            choices: &choices,
            filter_text: "",
            filter: None,
        };
        let mut p = Paginator::new(3, false);
        p.reset(&src);
        p.cursor_down(&src);
        assert_eq!(p.selected(), Some(1));
        assert!(p.scroll_down(&src));
        assert_eq!(p.selected(), Some(1));
        assert_eq!(p.cursor(), 0);
        assert!(p.scroll_up(&src));
        assert_eq!(p.selected(), Some(1));
    }

    #[test]
    fn test_loop_cursor_wraps_with_paging() {
        let choices = from_strings(["a", "b", "c", "d", "e"]);
        let src = Source {
            choices: &choices,
            filter_text: "",
            filter: None,
        };
        let mut p = Paginator::new(2, true);
        p.reset(&src);

        p.cursor_up(&src);
        assert_eq!(strings(&choices, p.page()), ["d", "e"]);
        assert_eq!(p.selected(), Some(4));

        p.cursor_down(&src);
        assert_eq!(strings(&choices, p.page()), ["a", "b"]);
        assert_eq!(p.selected(), Some(0));
        assert_eq!(p.scroll_offset(), 0);
    }

    #[test]
    fn test_without_loop_cursor_clamps() {
        let choices = from_strings(["a", "b"]);
        let src = Source {
            choices: &choices,
            filter_text: "",
            filter: None,
        };
        let mut p = Paginator::new(0, false);
        p.reset(&src);
        p.cursor_up(&src);
        assert_eq!(p.selected(), Some(0));
        p.cursor_down(&src);
        p.cursor_down(&src);
        assert_eq!(p.selected(), Some(1));
    }

    #[test]
    fn test_empty_window_is_inert() {
        let choices = from_strings(["a"]);
        let filter = default_filter();
        let src = Source {
            choices: &choices,
            filter_text: "zzz",
            filter: Some(&filter),
        };
        let mut p = Paginator::new(2, true);
        p.reset(&src);
        p.cursor_down(&src);
        p.cursor_up(&src);
        assert_eq!(p.selected(), None);
        assert_eq!(p.cursor(), 0);
    }

    #[test]
    fn test_scroll_down_hint_uses_unfiltered_bound() {
        let choices = from_strings(["AA1", "B", "AA2", "C", "AA3", "D", "E", "F"]);
        let filter = default_filter();
        let src = Source {
            choices: &choices,
            filter_text: "AA",
            filter: Some(&filter),
        };
        let mut p = Paginator::new(2, false);
        p.reset(&src);
        p.cursor_down(&src);
        p.cursor_down(&src);
        assert_eq!(strings(&choices, p.page()), ["AA2", "AA3"]);
        assert_eq!(p.selected(), Some(4));

        // All three matches are visible, but the hint still claims more.
        assert!(p.can_scroll_down());
        assert!(p.is_scroll_down_hint_position(1));

        p.cursor_down(&src);
        assert_eq!(p.selected(), Some(4));
        assert_eq!(p.scroll_offset(), 1);
    }
}
