// SPDX-License-Identifier: MIT

use crate::marked::{Mark, MarkedLine};

/// Split a line into chunks of exactly `width` visible characters.
///
/// Marks carry across chunk boundaries: a span cut in two keeps its mark on
/// both pieces, so each chunk can be painted on its own. The last chunk is
/// padded with unmarked blanks. An empty line gives a single blank chunk.
pub fn split(line: &MarkedLine, width: usize) -> Vec<MarkedLine> {
    debug_assert!(width > 0);
    let width = width.max(1);

    let mut chunks = Vec::with_capacity(line.visible_len() / width + 1);
    let mut chunk = MarkedLine::new();
    let mut len = 0;

    for span in line.spans() {
        for ch in span.text.chars() {
            chunk.push_char(span.mark, ch);
            len += 1;
            if len == width {
                chunks.push(std::mem::take(&mut chunk));
                len = 0;
            }
        }
    }

    if len != 0 || chunks.is_empty() {
        chunk.push(Mark::Equal, &" ".repeat(width - len));
        chunks.push(chunk);
    }

    chunks
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::marked::Span;

    #[test]
    fn wraps_long_line() {
        let line = MarkedLine::plain(&"a".repeat(181));
        let chunks = split(&line, 100);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].visible_len(), 100);
        assert_eq!(chunks[1].visible_len(), 100);
        assert_eq!(chunks[1].plain_text(), "a".repeat(81) + &" ".repeat(19));
    }

    #[test]
    fn marks_carry_over() {
        let mut line = MarkedLine::plain("abc");
        line.push(Mark::Delete, "defgh");
        line.push(Mark::Equal, "i");
        let chunks = split(&line, 4);

        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks[0].spans(),
            &[
                Span { mark: Mark::Equal, text: "abc".into() },
                Span { mark: Mark::Delete, text: "d".into() },
            ]
        );
        assert_eq!(chunks[1], MarkedLine::with_mark(Mark::Delete, "efgh"));
        assert_eq!(
            chunks[2].spans(),
            &[Span { mark: Mark::Equal, text: "i   ".into() }]
        );

        let joined: String = chunks.iter().map(MarkedLine::plain_text).collect();
        assert_eq!(joined.trim_end(), line.plain_text());
    }

    #[test]
    fn exact_fit_has_no_extra_chunk() {
        // The marked span ends exactly at the boundary; no empty marked chunk follows.
        let line = MarkedLine::with_mark(Mark::Insert, "abcdef");
        let chunks = split(&line, 3);

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|chunk| chunk.visible_len() == 3));
    }

    #[test]
    fn empty_line_is_one_blank_chunk() {
        let chunks = split(&MarkedLine::new(), 5);
        assert_eq!(chunks, vec![MarkedLine::plain("     ")]);
    }
}
