// SPDX-License-Identifier: MIT

//! Lines of text annotated with intra-line change marks.
//!
//! A [`MarkedLine`] is a sequence of [`Span`]s, each carrying one [`Mark`].
//! The alignment stage produces them and the renderer consumes them; the
//! visible length of a line is simply the number of characters in its spans.
//!
//! The older in-band form, where marks are embedded in the text as
//! `"\0+"`, `"\0-"`, `"\0^"` openers and a `"\1"` closer, is supported for
//! interop via [`MarkedLine::from_markers`] and [`MarkedLine::to_markers`].

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::theme::Role;

const MARKER_OPEN: char = '\0';
const MARKER_CLOSE: char = '\x01';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Equal,
    Insert,
    Delete,
    Change,
}
impl Mark {
    /// The theme role used to paint text with this mark, if any.
    pub fn role(self) -> Option<Role> {
        match self {
            Mark::Equal => None,
            Mark::Insert => Some(Role::Insert),
            Mark::Delete => Some(Role::Delete),
            Mark::Change => Some(Role::Change),
        }
    }

    fn marker_tag(self) -> Option<char> {
        match self {
            Mark::Equal => None,
            Mark::Insert => Some('+'),
            Mark::Delete => Some('-'),
            Mark::Change => Some('^'),
        }
    }

    fn from_marker_tag(tag: char) -> Option<Mark> {
        match tag {
            '+' => Some(Mark::Insert),
            '-' => Some(Mark::Delete),
            '^' => Some(Mark::Change),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub mark: Mark,
    pub text: String,
}

/// A line of text split into marked spans.
///
/// Spans are never empty, and neighbouring spans never carry the same mark.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkedLine {
    spans: Vec<Span>,
}
impl MarkedLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A line consisting of a single span.
    pub fn with_mark(mark: Mark, text: &str) -> Self {
        let mut line = Self::new();
        line.push(mark, text);
        line
    }

    pub fn plain(text: &str) -> Self {
        Self::with_mark(Mark::Equal, text)
    }

    /// Append text, merging it into the last span if the marks agree.
    pub fn push(&mut self, mark: Mark, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.mark == mark => last.text.push_str(text),
            _ => self.spans.push(Span {
                mark,
                text: text.to_owned(),
            }),
        }
    }

    pub fn push_char(&mut self, mark: Mark, ch: char) {
        match self.spans.last_mut() {
            Some(last) if last.mark == mark => last.text.push(ch),
            _ => self.spans.push(Span {
                mark,
                text: ch.to_string(),
            }),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of characters shown when the line is printed.
    pub fn visible_len(&self) -> usize {
        self.spans.iter().map(|span| span.text.chars().count()).sum()
    }

    /// The text without any marks.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Whether any part of the line is marked as inserted, deleted or changed.
    pub fn has_changes(&self) -> bool {
        self.spans.iter().any(|span| span.mark != Mark::Equal)
    }

    /// Parse a line in the in-band marker form.
    ///
    /// Marker regions must be balanced and must not nest. Violations are a
    /// bug in whatever produced the string: they trip a debug assertion, and
    /// release builds treat a stray closer as plain text and an unterminated
    /// region as running to the end of the line.
    pub fn from_markers(s: &str) -> Self {
        let mut line = Self::new();
        let mut mark = Mark::Equal;
        let mut chars = s.chars();

        while let Some(ch) = chars.next() {
            match ch {
                MARKER_OPEN => {
                    debug_assert!(mark == Mark::Equal, "nested change marker in {s:?}");
                    let tag = chars.next();
                    match tag.and_then(Mark::from_marker_tag) {
                        Some(opened) => mark = opened,
                        None => debug_assert!(false, "unknown change marker {tag:?} in {s:?}"),
                    }
                }
                MARKER_CLOSE if mark != Mark::Equal => mark = Mark::Equal,
                _ => {
                    debug_assert!(ch != MARKER_CLOSE, "unbalanced change marker in {s:?}");
                    line.push_char(mark, ch);
                }
            }
        }
        debug_assert!(mark == Mark::Equal, "unterminated change marker in {s:?}");

        line
    }

    /// Render the line in the in-band marker form.
    pub fn to_markers(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span.mark.marker_tag() {
                Some(tag) => {
                    out.push(MARKER_OPEN);
                    out.push(tag);
                    out.push_str(&span.text);
                    out.push(MARKER_CLOSE);
                }
                None => out.push_str(&span.text),
            }
        }
        out
    }
}
impl fmt::Display for MarkedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

/// Visible length of a string in the in-band marker form.
///
/// Each opener (two characters) and each closer is excluded from the count.
pub fn marker_visible_len(s: &str) -> usize {
    let mut len = 0;
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        match ch {
            MARKER_OPEN => {
                chars.next();
            }
            MARKER_CLOSE => {}
            _ => len += 1,
        }
    }
    len
}

lazy_static! {
    static ref SGR_SEQUENCE: Regex = Regex::new("\x1b\\[[0-9;]*m").unwrap();
}

/// Remove all SGR (color and attribute) escape sequences.
pub fn strip_ansi(s: &str) -> String {
    SGR_SEQUENCE.replace_all(s, "").into_owned()
}
