// SPDX-License-Identifier: MIT

//! Failure messages for equality assertions, with a side-by-side diff of
//! the two values.

use std::fmt::Debug;

use crate::align::Input;
use crate::render::{RenderConfig, Renderer};

/// Values are shortened to this many characters in the headline.
const MAX_REPR_LENGTH: usize = 80;

fn short_repr(value: &dyn Debug) -> String {
    let repr = format!("{value:?}");
    match repr.char_indices().nth(MAX_REPR_LENGTH) {
        Some((cut, _)) => format!("{} [truncated]...", &repr[..cut]),
        None => repr,
    }
}

fn compose(
    headline: String,
    first: Input,
    second: Input,
    renderer: &Renderer,
    max_diff: Option<usize>,
) -> String {
    let full = RenderConfig {
        context_lines: None,
        column_width: None,
    };
    let diff: String = renderer.diff_with(first, second, &full).collect();
    let length = diff.chars().count();

    match max_diff {
        Some(max_diff) if length > max_diff => {
            format!("{headline}\nDiff is {length} characters long. Raise the limit to see it.")
        }
        _ => format!("{headline}\n{diff}"),
    }
}

/// Describe why `first` and `second` are not equal.
///
/// Both values are pretty-printed and shown side by side in full. If the
/// rendered diff is longer than `max_diff` characters, only its length is
/// reported.
pub fn mismatch_message(
    first: &dyn Debug,
    second: &dyn Debug,
    renderer: &Renderer,
    max_diff: Option<usize>,
) -> String {
    let headline = format!("{} != {}", short_repr(first), short_repr(second));
    compose(
        headline,
        Input::Text(format!("{first:#?}")),
        Input::Text(format!("{second:#?}")),
        renderer,
        max_diff,
    )
}

/// Like [`mismatch_message`], but diffs multi-line text by its lines rather
/// than by its escaped debug form.
pub fn text_mismatch_message(
    first: &str,
    second: &str,
    renderer: &Renderer,
    max_diff: Option<usize>,
) -> String {
    let headline = format!("{} != {}", short_repr(&first), short_repr(&second));
    compose(headline, first.into(), second.into(), renderer, max_diff)
}
