// SPDX-License-Identifier: MIT

//! Line-by-line comparison with intra-line change detection.
//!
//! Lines are matched with a [`SequenceMatcher`]. Inside each replaced block,
//! the most similar pair of old and new lines is lined up and diffed
//! character by character; the parts of the block before and after that pair
//! are handled recursively. Blocks without a sufficiently similar pair
//! degrade to plain deletions and insertions.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use crate::marked::{Mark, MarkedLine};

use super::matcher::{SequenceMatcher, Tag};

/// Pairs must be strictly more similar than this to be lined up.
const SIMILARITY_CUTOFF: f64 = 0.75;
const SIMILARITY_FLOOR: f64 = 0.74;

/// One step of a line-level comparison. Indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDiff {
    Equal {
        old: usize,
        new: usize,
    },
    Delete {
        old: usize,
    },
    Insert {
        new: usize,
    },
    /// Similar lines, with the differences marked on both sides.
    Changed {
        old: usize,
        new: usize,
        left: MarkedLine,
        right: MarkedLine,
    },
}

pub type LineJunk<'a> = &'a dyn Fn(&str) -> bool;
pub type CharJunk<'a> = &'a dyn Fn(char) -> bool;

#[derive(Clone, Copy, Default)]
pub struct Differ<'a> {
    line_junk: Option<LineJunk<'a>>,
    char_junk: Option<CharJunk<'a>>,
}
impl<'a> Differ<'a> {
    pub fn new(line_junk: Option<LineJunk<'a>>, char_junk: Option<CharJunk<'a>>) -> Self {
        Differ {
            line_junk,
            char_junk,
        }
    }

    pub fn compare(&self, a: &[String], b: &[String]) -> Vec<LineDiff> {
        let line_junk = self.line_junk.map(|junk| move |line: &String| junk(line));
        let matcher = SequenceMatcher::new(
            a,
            b,
            line_junk.as_ref().map(|junk| junk as &dyn Fn(&String) -> bool),
        );

        let mut out = Vec::new();
        for op in matcher.opcodes() {
            match op.tag {
                Tag::Equal => out.extend(
                    (op.a_begin..op.a_end)
                        .zip(op.b_begin..op.b_end)
                        .map(|(old, new)| LineDiff::Equal { old, new }),
                ),
                Tag::Delete => {
                    out.extend((op.a_begin..op.a_end).map(|old| LineDiff::Delete { old }))
                }
                Tag::Insert => {
                    out.extend((op.b_begin..op.b_end).map(|new| LineDiff::Insert { new }))
                }
                Tag::Replace => {
                    let block = Block::new(a, b, op.a_begin..op.a_end, op.b_begin..op.b_end);
                    self.fancy_replace(
                        &block,
                        op.a_begin,
                        op.a_end,
                        op.b_begin,
                        op.b_end,
                        &mut out,
                    );
                }
            }
        }

        #[cfg(feature = "debug-diff")]
        log::trace!("compared {} against {} lines: {} steps", a.len(), b.len(), out.len());

        out
    }

    fn fancy_replace(
        &self,
        block: &Block<'_>,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
        out: &mut Vec<LineDiff>,
    ) {
        let char_junk = self.char_junk.map(|junk| move |ch: &char| junk(*ch));
        let char_junk = char_junk.as_ref().map(|junk| junk as &dyn Fn(&char) -> bool);

        let mut best_ratio = SIMILARITY_FLOOR;
        let mut best = None;
        let mut identical = None;

        for j in blo..bhi {
            for i in alo..ahi {
                if block.a[i] == block.b[j] {
                    identical.get_or_insert((i, j));
                    continue;
                }

                let matcher =
                    SequenceMatcher::new(block.old_chars(i), block.new_chars(j), char_junk);
                if matcher.real_quick_ratio() > best_ratio && matcher.quick_ratio() > best_ratio {
                    let ratio = matcher.ratio();
                    if ratio > best_ratio {
                        best_ratio = ratio;
                        best = Some((i, j));
                    }
                }
            }
        }

        let (i, j, is_identical) = match (best, identical) {
            (Some((i, j)), _) if best_ratio >= SIMILARITY_CUTOFF => (i, j, false),
            (_, Some((i, j))) => (i, j, true),
            _ => {
                out.extend((alo..ahi).map(|old| LineDiff::Delete { old }));
                out.extend((blo..bhi).map(|new| LineDiff::Insert { new }));
                return;
            }
        };

        self.fancy_helper(block, alo, i, blo, j, out);
        if is_identical {
            out.push(LineDiff::Equal { old: i, new: j });
        } else {
            let (left, right) = intraline(block.old_chars(i), block.new_chars(j), char_junk);
            out.push(LineDiff::Changed {
                old: i,
                new: j,
                left,
                right,
            });
        }
        self.fancy_helper(block, i + 1, ahi, j + 1, bhi, out);
    }

    fn fancy_helper(
        &self,
        block: &Block<'_>,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
        out: &mut Vec<LineDiff>,
    ) {
        if alo < ahi {
            if blo < bhi {
                self.fancy_replace(block, alo, ahi, blo, bhi, out);
            } else {
                out.extend((alo..ahi).map(|old| LineDiff::Delete { old }));
            }
        } else if blo < bhi {
            out.extend((blo..bhi).map(|new| LineDiff::Insert { new }));
        }
    }
}

/// A replaced block, with the characters of its lines decoded once.
struct Block<'a> {
    a: &'a [String],
    b: &'a [String],
    a_chars: Vec<Vec<char>>,
    b_chars: Vec<Vec<char>>,
    a_offset: usize,
    b_offset: usize,
}
impl<'a> Block<'a> {
    fn new(a: &'a [String], b: &'a [String], old: Range<usize>, new: Range<usize>) -> Self {
        Block {
            a,
            b,
            a_offset: old.start,
            b_offset: new.start,
            a_chars: a[old].iter().map(|line| line.chars().collect()).collect(),
            b_chars: b[new].iter().map(|line| line.chars().collect()).collect(),
        }
    }

    fn old_chars(&self, i: usize) -> &[char] {
        &self.a_chars[i - self.a_offset]
    }

    fn new_chars(&self, j: usize) -> &[char] {
        &self.b_chars[j - self.b_offset]
    }
}

/// Mark the character-level differences between two similar lines.
fn intraline(
    a: &[char],
    b: &[char],
    char_junk: Option<&dyn Fn(&char) -> bool>,
) -> (MarkedLine, MarkedLine) {
    let mut left = MarkedLine::new();
    let mut right = MarkedLine::new();

    let matcher = SequenceMatcher::new(a, b, char_junk);
    for op in matcher.opcodes() {
        let old: String = a[op.a_begin..op.a_end].iter().collect();
        let new: String = b[op.b_begin..op.b_end].iter().collect();
        match op.tag {
            Tag::Equal => {
                left.push(Mark::Equal, &old);
                right.push(Mark::Equal, &new);
            }
            Tag::Replace => {
                left.push(Mark::Change, &old);
                right.push(Mark::Change, &new);
            }
            Tag::Delete => left.push(Mark::Delete, &old),
            Tag::Insert => right.push(Mark::Insert, &new),
        }
    }

    (left, right)
}

/// Blanks and tabs are ignored when anchoring intra-line matches.
pub fn is_character_junk(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

lazy_static! {
    static ref JUNK_LINE: Regex = Regex::new(r"^[ \t]*(?:#[ \t]*)?$").unwrap();
}

/// Blank lines and lines holding nothing but a `#` are junk.
pub fn is_line_junk(line: &str) -> bool {
    JUNK_LINE.is_match(line)
}
