// SPDX-License-Identifier: MIT

//! Longest-common-block sequence matching.
//!
//! The matcher repeatedly finds the longest contiguous block that two
//! sequences have in common, then recurses on the pieces to the left and to
//! the right of that block. It doesn't produce minimal edit scripts, but its
//! output tends to "look right" to people, which matters more for a visual
//! diff than minimality.
//!
//! Junk elements of the second sequence never anchor a match. Once a block
//! has been found using only non-junk elements, it is grown over identical
//! neighbours, first non-junk ones and then junk ones, so that e.g. blank
//! runs adjacent to a matched word end up in the match.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Sequences at least this long have their popular elements auto-junked.
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One step of an edit script: `a[a_begin..a_end]` becomes `b[b_begin..b_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: Tag,
    pub a_begin: usize,
    pub a_end: usize,
    pub b_begin: usize,
    pub b_end: usize,
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],

    /// Indices at which each non-junk, non-popular element occurs in `b`,
    /// in increasing order.
    b2j: HashMap<&'a T, Vec<usize>>,
    bjunk: HashSet<&'a T>,
}
impl<'a, T: Hash + Eq> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T], is_junk: Option<&dyn Fn(&T) -> bool>) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (idx, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(idx);
        }

        let mut bjunk = HashSet::new();
        if let Some(is_junk) = is_junk {
            b2j.retain(|elt, _| {
                if is_junk(elt) {
                    bjunk.insert(*elt);
                    false
                } else {
                    true
                }
            });
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= ntest);
        }

        Self { a, b, b2j, bjunk }
    }

    /// Find the longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among equally long blocks, the one starting earliest in `a` wins, and
    /// of those the one starting earliest in `b`. Returns a block of size 0
    /// at `(alo, blo)` if nothing matches.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (a, b) = (self.a, self.b);
        let mut best = Match { a: alo, b: blo, size: 0 };

        // j2len[j] is the length of the longest match ending with a[i-1] and b[j].
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(&a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|prev| j2len.get(&prev)).unwrap_or(&0) + 1;
                    new_j2len.insert(j, k);
                    if k > best.size {
                        best = Match { a: i + 1 - k, b: j + 1 - k, size: k };
                    }
                }
            }
            j2len = new_j2len;
        }

        for junk in [false, true] {
            while best.a > alo
                && best.b > blo
                && self.bjunk.contains(&b[best.b - 1]) == junk
                && a[best.a - 1] == b[best.b - 1]
            {
                best.a -= 1;
                best.b -= 1;
                best.size += 1;
            }
            while best.a + best.size < ahi
                && best.b + best.size < bhi
                && self.bjunk.contains(&b[best.b + best.size]) == junk
                && a[best.a + best.size] == b[best.b + best.size]
            {
                best.size += 1;
            }
        }

        #[cfg(feature = "debug-diff")]
        log::trace!("longest match in a[{alo}..{ahi}] b[{blo}..{bhi}]: {best:?}");

        best
    }

    /// Return the maximal matching blocks in increasing order, with adjacent
    /// blocks merged. The last entry is always the `(len_a, len_b, 0)`
    /// sentinel.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for m in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => {
                    last.size += m.size;
                }
                _ => merged.push(m),
            }
        }
        merged.push(Match {
            a: self.a.len(),
            b: self.b.len(),
            size: 0,
        });
        merged
    }

    /// Return the edit script turning `a` into `b`.
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut i = 0;
        let mut j = 0;
        let mut opcodes = Vec::new();

        for m in self.matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(Tag::Replace),
                (true, false) => Some(Tag::Delete),
                (false, true) => Some(Tag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                opcodes.push(Opcode {
                    tag,
                    a_begin: i,
                    a_end: m.a,
                    b_begin: j,
                    b_end: m.b,
                });
            }
            i = m.a + m.size;
            j = m.b + m.size;
            if m.size != 0 {
                opcodes.push(Opcode {
                    tag: Tag::Equal,
                    a_begin: m.a,
                    a_end: i,
                    b_begin: m.b,
                    b_end: j,
                });
            }
        }

        opcodes
    }

    /// Similarity in `[0, 1]`: twice the number of matched elements over the
    /// total number of elements.
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) that ignores element order.
    pub fn quick_ratio(&self) -> f64 {
        let mut avail: HashMap<&T, isize> = HashMap::new();
        for elt in self.b {
            *avail.entry(elt).or_default() += 1;
        }

        let mut matches = 0;
        for elt in self.a {
            let count = avail.entry(elt).or_default();
            if *count > 0 {
                matches += 1;
            }
            *count -= 1;
        }
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Very cheap upper bound on [`ratio`](Self::ratio), using only lengths.
    pub fn real_quick_ratio(&self) -> f64 {
        calculate_ratio(self.a.len().min(self.b.len()), self.a.len() + self.b.len())
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        1.0
    } else {
        2.0 * matches as f64 / length as f64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn op(tag: Tag, a_begin: usize, a_end: usize, b_begin: usize, b_end: usize) -> Opcode {
        Opcode {
            tag,
            a_begin,
            a_end,
            b_begin,
            b_end,
        }
    }

    #[test]
    fn opcodes_mixed() {
        let a = chars("qabxcd");
        let b = chars("abycdf");
        let matcher = SequenceMatcher::new(&a, &b, None);

        assert_eq!(
            matcher.opcodes(),
            vec![
                op(Tag::Delete, 0, 1, 0, 0),
                op(Tag::Equal, 1, 3, 0, 2),
                op(Tag::Replace, 3, 4, 2, 3),
                op(Tag::Equal, 4, 6, 3, 5),
                op(Tag::Insert, 6, 6, 5, 6),
            ]
        );
    }

    #[test]
    fn matching_blocks_sentinel() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let matcher = SequenceMatcher::new(&a, &b, None);

        assert_eq!(
            matcher.matching_blocks(),
            vec![
                Match { a: 0, b: 0, size: 2 },
                Match { a: 3, b: 2, size: 2 },
                Match { a: 5, b: 4, size: 0 },
            ]
        );
    }

    #[test]
    fn longest_match_junk() {
        let a = chars(" abcd");
        let b = chars("abcd abcd");

        let plain = SequenceMatcher::new(&a, &b, None);
        assert_eq!(plain.find_longest_match(0, 5, 0, 9), Match { a: 0, b: 4, size: 5 });

        let is_blank = |c: &char| *c == ' ';
        let junked = SequenceMatcher::new(&a, &b, Some(&is_blank));
        assert_eq!(junked.find_longest_match(0, 5, 0, 9), Match { a: 1, b: 0, size: 4 });
    }

    #[test]
    fn ratios() {
        let a = chars("abcd");
        let b = chars("bcde");
        let matcher = SequenceMatcher::new(&a, &b, None);
        assert_eq!(matcher.ratio(), 0.75);
        assert_eq!(matcher.quick_ratio(), 0.75);
        assert_eq!(matcher.real_quick_ratio(), 1.0);

        let empty: Vec<char> = Vec::new();
        assert_eq!(SequenceMatcher::new(&empty, &empty, None).ratio(), 1.0);
        assert_eq!(SequenceMatcher::new(&a, &empty, None).ratio(), 0.0);
    }

    #[test]
    fn autojunk_popular() {
        // 'x' occurs far more often than len / 100 + 1 and is not indexed.
        let a = chars("x");
        let mut b: Vec<char> = std::iter::repeat('x').take(300).collect();
        b.push('y');
        let matcher = SequenceMatcher::new(&a, &b, None);
        assert!(!matcher.b2j.contains_key(&'x'));
        assert!(matcher.b2j.contains_key(&'y'));

        let short: Vec<char> = std::iter::repeat('x').take(10).collect();
        let matcher = SequenceMatcher::new(&a, &short, None);
        assert_eq!(matcher.b2j[&'x'].len(), 10);
    }
}
