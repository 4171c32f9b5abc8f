//! Wrapping of rendered views to the terminal width.
//!
//! All functions are ANSI aware and treat a width of zero as "unknown",
//! returning the input unchanged. Prompts start with width zero until the
//! host reports the first resize.

use textwrap::{Options, WrapAlgorithm};
use unicode_width::UnicodeWidthChar;

use crate::style::{Segment, segments, visible_width};

/// A wrapping strategy: `(text, width) -> wrapped text`.
pub type WrapMode = fn(&str, usize) -> String;

fn per_line(input: &str, width: usize, f: impl Fn(&str, &mut String)) -> String {
    if width == 0 {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    for (i, line) in input.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if visible_width(line) <= width {
            out.push_str(line);
        } else {
            f(line, &mut out);
        }
    }
    out
}

/// Wraps at word boundaries and breaks words that are longer than the
/// width.
///
/// ```rust
/// use promptkit::wrap::word_wrap;
///
/// assert_eq!(word_wrap("hello wide world", 10), "hello wide\nworld");
/// assert_eq!(word_wrap("abcdefghij", 4), "abcd\nefgh\nij");
/// ```
#[must_use]
pub fn word_wrap(input: &str, width: usize) -> String {
    per_line(input, width, |line, out| {
        let options = Options::new(width)
            .break_words(true)
            .wrap_algorithm(WrapAlgorithm::FirstFit);
        let wrapped = textwrap::wrap(line, options);
        for (i, part) in wrapped.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&hard_wrap(part, width));
        }
    })
}

/// Breaks lines at exactly the width, regardless of words.
#[must_use]
pub fn hard_wrap(input: &str, width: usize) -> String {
    per_line(input, width, |line, out| {
        let mut col = 0;
        for seg in segments(line) {
            match seg {
                Segment::Escape(esc) => out.push_str(esc),
                Segment::Char(c) => {
                    let w = c.width().unwrap_or(0);
                    if col + w > width && col > 0 {
                        out.push('\n');
                        col = 0;
                    }
                    out.push(c);
                    col += w;
                }
            }
        }
    })
}

/// Cuts every line at the width. Escape sequences past the cut are kept so
/// that styles are still reset.
#[must_use]
pub fn truncate(input: &str, width: usize) -> String {
    per_line(input, width, |line, out| {
        let mut col = 0;
        for seg in segments(line) {
            match seg {
                Segment::Escape(esc) => out.push_str(esc),
                Segment::Char(c) => {
                    let w = c.width().unwrap_or(0);
                    if col + w <= width {
                        out.push(c);
                    }
                    col += w;
                }
            }
        }
    })
}

/// Applies an optional wrap mode; `None` leaves the text as is.
#[must_use]
pub fn apply(mode: Option<WrapMode>, input: &str, width: usize) -> String {
    mode.map_or_else(|| input.to_string(), |wrap| wrap(input, width))
}

/// `min` where zero means "unbounded".
#[must_use]
pub const fn zero_aware_min(a: usize, b: usize) -> usize {
    match (a, b) {
        (0, b) => b,
        (a, 0) => a,
        (a, b) if a < b => a,
        (_, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{bold, strip_ansi};

    #[test]
    fn test_zero_width_is_identity() {
        let text = "a very long line that would otherwise wrap";
        assert_eq!(word_wrap(text, 0), text);
        assert_eq!(hard_wrap(text, 0), text);
        assert_eq!(truncate(text, 0), text);
    }

    #[test]
    fn test_short_lines_untouched() {
        let text = "  indented\n> arrow";
        assert_eq!(word_wrap(text, 20), text);
    }

    #[test]
    fn test_hard_wrap() {
        assert_eq!(hard_wrap("abcdef", 4), "abcd\nef");
        assert_eq!(hard_wrap("ab\ncdefg", 3), "ab\ncde\nfg");
    }

    #[test]
    fn test_hard_wrap_keeps_escapes() {
        let styled = bold("abcdef");
        let wrapped = hard_wrap(&styled, 3);
        assert_eq!(strip_ansi(&wrapped), "abc\ndef");
        assert!(wrapped.starts_with('\x1b'));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef\nxy", 3), "abc\nxy");
        assert_eq!(strip_ansi(&truncate(&bold("abcdef"), 2)), "ab");
    }

    #[test]
    fn test_wide_chars() {
        assert_eq!(hard_wrap("日本語", 4), "日本\n語");
        assert_eq!(truncate("日本語", 3), "日");
    }

    #[test]
    fn test_zero_aware_min() {
        assert_eq!(zero_aware_min(0, 5), 5);
        assert_eq!(zero_aware_min(5, 0), 5);
        assert_eq!(zero_aware_min(3, 5), 3);
        assert_eq!(zero_aware_min(7, 5), 5);
        assert_eq!(zero_aware_min(0, 0), 0);
    }

    #[test]
    fn test_apply() {
        assert_eq!(apply(None, "abcdef", 2), "abcdef");
        assert_eq!(apply(Some(hard_wrap), "abcdef", 2), "ab\ncd\nef");
    }
}
