//! ANSI styling helpers used by templates and the built-in styles.

use crossterm::style::{Attribute, Color, Stylize, style};
use unicode_width::UnicodeWidthChar;

/// A piece of styled text: either a complete escape sequence or one
/// printable character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Escape(&'a str),
    Char(char),
}

/// Splits a string into escape sequences and characters.
pub(crate) fn segments(s: &str) -> impl Iterator<Item = Segment<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let c = rest.chars().next()?;
        if c != '\x1b' {
            rest = &rest[c.len_utf8()..];
            return Some(Segment::Char(c));
        }
        let len = escape_len(rest);
        let (esc, tail) = rest.split_at(len);
        rest = tail;
        Some(Segment::Escape(esc))
    })
}

/// Byte length of the escape sequence at the start of `s`.
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        // CSI: ESC [ params final, final byte in '@'..='~'
        Some(b'[') => bytes[2..]
            .iter()
            .position(|b| (b'@'..=b'~').contains(b))
            .map_or(s.len(), |p| p + 3),
        // OSC: ESC ] ... terminated by BEL or ESC \
        Some(b']') => {
            let mut i = 2;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return i + 1,
                    0x1b if bytes.get(i + 1) == Some(&b'\\') => return i + 2,
                    _ => i += 1,
                }
            }
            s.len()
        }
        Some(_) => 1 + s[1..].chars().next().map_or(0, char::len_utf8),
        None => 1,
    }
}

/// Display width of a string, ignoring ANSI escape sequences.
///
/// ```rust
/// use promptkit::style::visible_width;
///
/// assert_eq!(visible_width("\x1b[1mbold\x1b[0m"), 4);
/// assert_eq!(visible_width("日本"), 4);
/// ```
#[must_use]
pub fn visible_width(s: &str) -> usize {
    segments(s)
        .map(|seg| match seg {
            Segment::Char(c) => c.width().unwrap_or(0),
            Segment::Escape(_) => 0,
        })
        .sum()
}

/// Removes ANSI escape sequences.
#[must_use]
pub fn strip_ansi(s: &str) -> String {
    segments(s)
        .filter_map(|seg| match seg {
            Segment::Char(c) => Some(c),
            Segment::Escape(_) => None,
        })
        .collect()
}

/// Parses a color: an ANSI 256 index (`"32"`), a hex triplet (`"#ff8700"`)
/// or a name crossterm understands (`"red"`, `"dark_grey"`).
#[must_use]
pub fn parse_color(spec: &str) -> Option<Color> {
    let spec = spec.trim();
    if let Ok(n) = spec.parse::<u8>() {
        return Some(Color::AnsiValue(n));
    }
    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }
    Color::try_from(spec).ok()
}

/// Applies a text attribute.
#[must_use]
pub fn attribute(attr: Attribute, text: &str) -> String {
    style(text).attribute(attr).to_string()
}

/// Bold text.
#[must_use]
pub fn bold(text: &str) -> String {
    attribute(Attribute::Bold, text)
}

/// Dim text.
#[must_use]
pub fn faint(text: &str) -> String {
    attribute(Attribute::Dim, text)
}

/// Reverse video.
#[must_use]
pub fn reverse(text: &str) -> String {
    attribute(Attribute::Reverse, text)
}

/// Text in the given foreground color. Unknown colors leave the text plain.
#[must_use]
pub fn foreground(color: &str, text: &str) -> String {
    parse_color(color).map_or_else(|| text.to_string(), |c| style(text).with(c).to_string())
}

/// Text on the given background color. Unknown colors leave the text plain.
#[must_use]
pub fn background(color: &str, text: &str) -> String {
    parse_color(color).map_or_else(|| text.to_string(), |c| style(text).on(c).to_string())
}

/// Text with both colors set. Either color may be empty.
#[must_use]
pub fn color(fg: &str, bg: &str, text: &str) -> String {
    let mut styled = style(text);
    if let Some(c) = parse_color(fg) {
        styled = styled.with(c);
    }
    if let Some(c) = parse_color(bg) {
        styled = styled.on(c);
    }
    styled.to_string()
}
