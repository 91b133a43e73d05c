// SPDX-License-Identifier: MIT

//! Planning the column layout of a side-by-side diff.
//!
//! The layout is decided once, from all rows that will be shown, and then
//! stays fixed for the whole output so that columns line up.

use log::debug;

use crate::align::AlignedRow;

use super::probe::WidthProbe;

/// Total width assumed when neither the caller nor the terminal provide one.
pub const DEFAULT_WIDTH: usize = 160;

/// Smaller total widths are raised to this.
pub const MIN_WIDTH: usize = 80;

/// Columns are planned at least this wide, even for short lines.
pub const MIN_COLUMN_WIDTH: usize = MIN_WIDTH / 2;

/// Placed between the left and the right half of each row.
pub const SEPARATOR: &str = " | ";

/// Follows the line number in a gutter, as in `"12. "`.
pub const GUTTER_SUFFIX: &str = ". ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Visible width of the text column on each side.
    pub column_width: usize,

    /// Digits reserved for line numbers on each side; 0 if line numbers are
    /// not shown.
    pub left_gutter: usize,
    pub right_gutter: usize,
}
impl Layout {
    /// Total visible width of one side's gutter.
    pub fn gutter_width(digits: usize) -> usize {
        if digits == 0 {
            0
        } else {
            digits + GUTTER_SUFFIX.len()
        }
    }

    /// Total visible width of every output row, excluding the newline.
    pub fn row_width(&self) -> usize {
        Self::gutter_width(self.left_gutter)
            + Self::gutter_width(self.right_gutter)
            + 2 * self.column_width
            + SEPARATOR.len()
    }
}

fn digits(number: usize) -> usize {
    number.to_string().len()
}

/// Plan the layout for `rows`.
///
/// `requested` is the total width to fit into; if it is `None`, the probe is
/// asked, and if that fails too, [`DEFAULT_WIDTH`] is used. Either way the
/// total is at least [`MIN_WIDTH`].
pub fn plan(
    rows: &[AlignedRow],
    requested: Option<usize>,
    line_numbers: bool,
    probe: &dyn WidthProbe,
) -> Layout {
    let total = requested
        .or_else(|| probe.columns())
        .unwrap_or_else(|| {
            debug!("no terminal width available, assuming {DEFAULT_WIDTH}");
            DEFAULT_WIDTH
        })
        .max(MIN_WIDTH);

    let mut longest = MIN_COLUMN_WIDTH;
    let mut max_left = 0;
    let mut max_right = 0;
    for row in rows {
        let AlignedRow::Content { left, right, .. } = row else {
            continue;
        };
        for (side, max_number) in [(left, &mut max_left), (right, &mut max_right)] {
            if let Some(info) = side {
                longest = longest.max(info.text.visible_len());
                *max_number = (*max_number).max(info.number.unwrap_or(0));
            }
        }
    }

    let (left_gutter, right_gutter) = if line_numbers {
        (digits(max_left), digits(max_right))
    } else {
        (0, 0)
    };
    let reserved =
        Layout::gutter_width(left_gutter) + Layout::gutter_width(right_gutter) + SEPARATOR.len();
    let available = (total.saturating_sub(reserved) / 2).max(1);

    let layout = Layout {
        column_width: longest.min(available),
        left_gutter,
        right_gutter,
    };
    debug!("planned {layout:?} for a total width of {total}");
    layout
}
