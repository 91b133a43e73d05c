// SPDX-License-Identifier: MIT

//! Aligning two texts line by line.
//!
//! The result is a sequence of [`AlignedRow`]s: pairs of corresponding old
//! and new lines (either of which may be absent) with their differences
//! marked, and separators standing in for runs of unchanged lines that were
//! left out.

use std::fmt::Display;

use itertools::Itertools;
use log::debug;

use crate::marked::{Mark, MarkedLine};
use crate::utils::*;

pub mod differ;
pub mod matcher;

pub use differ::{is_character_junk, is_line_junk, CharJunk, Differ, LineDiff, LineJunk};

/// Text to be diffed, either still in one piece or already split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Lines(Vec<String>),
}
impl Input {
    /// Decode raw file contents. Fails on invalid UTF-8.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Input::Text(String::from_utf8(bytes)?))
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            Input::Text(text) => split_lines(&text).into_iter().map(str::to_owned).collect(),
            Input::Lines(lines) => lines,
        }
    }
}
impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_owned())
    }
}
impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}
impl<T: Display> From<Vec<T>> for Input {
    fn from(lines: Vec<T>) -> Self {
        Input::Lines(lines.iter().map(ToString::to_string).collect())
    }
}
impl<T: Display> From<&[T]> for Input {
    fn from(lines: &[T]) -> Self {
        Input::Lines(lines.iter().map(ToString::to_string).collect())
    }
}
impl<T: Display, const N: usize> From<[T; N]> for Input {
    fn from(lines: [T; N]) -> Self {
        Input::Lines(lines.iter().map(ToString::to_string).collect())
    }
}

/// One side of an aligned row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    /// 1-based line number, if the text corresponds to an actual input line.
    pub number: Option<usize>,
    pub text: MarkedLine,
}
impl LineInfo {
    fn numbered(index: usize, text: MarkedLine) -> Self {
        LineInfo {
            number: Some(index + 1),
            text,
        }
    }

    /// A line that only exists on one side, marked in full. Empty lines show
    /// up as a single marked blank so that the change stays visible.
    fn one_sided(index: usize, line: &str, mark: Mark) -> Self {
        let text = if line.is_empty() { " " } else { line };
        Self::numbered(index, MarkedLine::with_mark(mark, text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignedRow {
    /// Corresponding lines. At least one side is present.
    Content {
        left: Option<LineInfo>,
        right: Option<LineInfo>,
        changed: bool,
    },
    /// Stands in for unchanged lines that are not shown.
    Separator,
}
impl AlignedRow {
    pub fn is_changed(&self) -> bool {
        matches!(self, AlignedRow::Content { changed: true, .. })
    }
}

/// Turn a line-level comparison into aligned rows.
///
/// One-sided lines between two anchors (equal or intra-line-marked pairs)
/// are put side by side in order; the shorter side is padded with absent
/// lines.
fn pair_up(steps: Vec<LineDiff>, a: &[String], b: &[String]) -> Vec<AlignedRow> {
    fn flush(rows: &mut Vec<AlignedRow>, lefts: &mut Vec<LineInfo>, rights: &mut Vec<LineInfo>) {
        rows.extend(lefts.drain(..).zip_longest(rights.drain(..)).map(|sides| {
            let (left, right) = sides.left_and_right();
            AlignedRow::Content {
                left,
                right,
                changed: true,
            }
        }));
    }

    let mut rows = Vec::with_capacity(steps.len());
    let mut lefts = Vec::new();
    let mut rights = Vec::new();

    for step in steps {
        match step {
            LineDiff::Delete { old } => {
                lefts.push(LineInfo::one_sided(old, &a[old], Mark::Delete));
            }
            LineDiff::Insert { new } => {
                rights.push(LineInfo::one_sided(new, &b[new], Mark::Insert));
            }
            LineDiff::Equal { old, new } => {
                flush(&mut rows, &mut lefts, &mut rights);
                rows.push(AlignedRow::Content {
                    left: Some(LineInfo::numbered(old, MarkedLine::plain(&a[old]))),
                    right: Some(LineInfo::numbered(new, MarkedLine::plain(&b[new]))),
                    changed: false,
                });
            }
            LineDiff::Changed {
                old,
                new,
                left,
                right,
            } => {
                flush(&mut rows, &mut lefts, &mut rights);
                rows.push(AlignedRow::Content {
                    left: Some(LineInfo::numbered(old, left)),
                    right: Some(LineInfo::numbered(new, right)),
                    changed: true,
                });
            }
        }
    }
    flush(&mut rows, &mut lefts, &mut rights);

    rows
}

/// Decide which rows are within `context` rows of a change.
///
/// `None` keeps everything, as does a context that covers the whole input.
fn context_mask(rows: &[AlignedRow], context: Option<usize>) -> Vec<bool> {
    let context = match context {
        Some(context) if context < rows.len() => context,
        _ => return vec![true; rows.len()],
    };

    let mut keep = vec![false; rows.len()];
    let mut distance = usize::MAX;
    for (idx, row) in rows.iter().enumerate() {
        distance = if row.is_changed() { 0 } else { distance.saturating_add(1) };
        keep[idx] = distance <= context;
    }
    distance = usize::MAX;
    for (idx, row) in rows.iter().enumerate().rev() {
        distance = if row.is_changed() { 0 } else { distance.saturating_add(1) };
        keep[idx] |= distance <= context;
    }

    keep
}

/// Iterator over aligned rows, with elided runs collapsed into separators.
///
/// A run of elided rows turns into one separator when more rows follow it;
/// elided rows at the very end are dropped silently.
pub struct AlignedRows {
    rows: std::iter::Zip<std::vec::IntoIter<AlignedRow>, std::vec::IntoIter<bool>>,
    skipped: bool,
    pending: Option<AlignedRow>,
}
impl Iterator for AlignedRows {
    type Item = AlignedRow;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(row) = self.pending.take() {
            return Some(row);
        }

        loop {
            let (row, keep) = self.rows.next()?;
            if !keep {
                self.skipped = true;
                continue;
            }
            if std::mem::take(&mut self.skipped) {
                self.pending = Some(row);
                return Some(AlignedRow::Separator);
            }
            return Some(row);
        }
    }
}

/// Align `a` against `b`.
///
/// `context` is the number of unchanged rows to keep around each change;
/// `None` keeps every row.
pub fn align(a: &[String], b: &[String], context: Option<usize>, differ: &Differ) -> AlignedRows {
    let rows = pair_up(differ.compare(a, b), a, b);
    let keep = context_mask(&rows, context);

    debug!(
        "aligned {} old and {} new lines into {} rows, {} kept",
        a.len(),
        b.len(),
        rows.len(),
        keep.iter().filter(|keep| **keep).count()
    );

    AlignedRows {
        rows: rows.into_iter().zip(keep),
        skipped: false,
        pending: None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lines(input: impl Into<Input>) -> Vec<String> {
        input.into().into_lines()
    }

    fn numbers(row: &AlignedRow) -> (Option<usize>, Option<usize>) {
        match row {
            AlignedRow::Content { left, right, .. } => (
                left.as_ref().and_then(|info| info.number),
                right.as_ref().and_then(|info| info.number),
            ),
            AlignedRow::Separator => panic!("unexpected separator"),
        }
    }

    #[test]
    fn input_conversions() -> Result<()> {
        assert_eq!(lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(lines(vec![1, 2, 3]), vec!["1", "2", "3"]);
        assert_eq!(lines(["x", "y"]), vec!["x", "y"]);
        assert_eq!(lines(&[1.5][..]), vec!["1.5"]);
        assert_eq!(Input::from_bytes(b"q\n".to_vec())?.into_lines(), vec!["q"]);
        assert!(Input::from_bytes(vec![0xff, 0xfe]).is_err());
        Ok(())
    }

    #[test]
    fn unequal_runs_are_padded() {
        let a = lines(["same", "one", "two", "end"]);
        let b = lines(["same", "uno", "end"]);
        let rows: Vec<_> = align(&a, &b, None, &Differ::default()).collect();

        assert_eq!(rows.len(), 4);
        assert_eq!(numbers(&rows[0]), (Some(1), Some(1)));
        assert_eq!(numbers(&rows[1]), (Some(2), Some(2)));
        assert_eq!(numbers(&rows[2]), (Some(3), None));
        assert_eq!(numbers(&rows[3]), (Some(4), Some(3)));
        assert!(!rows[0].is_changed());
        assert!(rows[1].is_changed());
        assert!(rows[2].is_changed());
    }

    #[test]
    fn one_sided_empty_line_is_visible() {
        let a = lines(["a", "", "b"]);
        let b = lines(["a", "b"]);
        let rows: Vec<_> = align(&a, &b, None, &Differ::default()).collect();

        let AlignedRow::Content { left: Some(left), right: None, changed: true } = &rows[1] else {
            panic!("unexpected row: {:?}", rows[1]);
        };
        assert_eq!(left.text, MarkedLine::with_mark(Mark::Delete, " "));
    }

    #[test]
    fn context_collapses_gaps() {
        let a: Vec<String> = (0..20).map(|n| n.to_string()).collect();
        let mut b = a.clone();
        b[5] = "five".into();
        b[15] = "fifteen".into();

        let rows: Vec<_> = align(&a, &b, Some(2), &Differ::default()).collect();
        let separators = rows.iter().filter(|row| **row == AlignedRow::Separator).count();

        // sep, 3..8, sep, 13..18, and the tail 18..20 is dropped silently.
        assert_eq!(separators, 2);
        assert_eq!(rows.len(), 2 + 5 + 5);
        assert_eq!(rows[0], AlignedRow::Separator);
        assert_eq!(numbers(&rows[1]), (Some(4), Some(4)));
        assert_eq!(rows[6], AlignedRow::Separator);
        assert_eq!(numbers(&rows[11]), (Some(18), Some(18)));
        assert!(rows
            .windows(2)
            .all(|pair| pair[0] != AlignedRow::Separator || pair[1] != AlignedRow::Separator));
    }

    #[test]
    fn context_covering_everything() {
        let a = lines(["a", "b", "c"]);

        assert_eq!(align(&a, &a, Some(3), &Differ::default()).count(), 3);
        assert_eq!(align(&a, &a, None, &Differ::default()).count(), 3);
        assert_eq!(align(&a, &a, Some(1), &Differ::default()).count(), 0);
    }

    #[test]
    fn zero_context_shows_only_changes() {
        let a = lines(["a", "b", "c", "d"]);
        let b = lines(["a", "B", "c", "D"]);
        let rows: Vec<_> = align(&a, &b, Some(0), &Differ::default()).collect();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], AlignedRow::Separator);
        assert_eq!(numbers(&rows[1]), (Some(2), Some(2)));
        assert_eq!(rows[2], AlignedRow::Separator);
        assert_eq!(numbers(&rows[3]), (Some(4), Some(4)));
    }
}
