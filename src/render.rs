// SPDX-License-Identifier: MIT

//! Side-by-side rendering of aligned rows.
//!
//! Rendering happens in two phases. All aligned rows are collected first,
//! because the column layout depends on the longest line and the largest
//! line number. Afterwards, rows are formatted lazily, one aligned row at a
//! time, as the caller pulls them from [`Rows`].

use std::collections::VecDeque;

use clap::Args;

use crate::align::{self, AlignedRow, Differ, Input, LineInfo};
use crate::marked::MarkedLine;
use crate::theme::{Painter, Role, ThemeName};

pub mod probe;
pub mod width;
pub mod wrap;

pub use probe::{FixedWidth, TerminalProbe, WidthProbe};
pub use width::Layout;

/// How a [`Renderer`] presents its output. Fixed for the renderer's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct RendererOptions {
    pub line_numbers: bool,
    pub theme: ThemeName,

    /// Emit color escape sequences. Without them, the output is plain text.
    pub color: bool,
}
impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            theme: ThemeName::Default,
            color: true,
        }
    }
}

/// Settings for a single diff.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Unchanged lines to show around each change, or `None` for all lines.
    pub context_lines: Option<usize>,

    /// Total width to lay out for, or `None` to ask the terminal.
    pub column_width: Option<usize>,
}
impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            context_lines: Some(3),
            column_width: None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Number of unchanged lines to show around each change
    #[clap(short = 'U', long = "context", default_value_t = 3)]
    pub context_lines: usize,

    /// Show all lines, not just changes and their context
    #[clap(long)]
    pub full: bool,

    /// Total output width in columns [default: terminal width]
    #[clap(short = 'W', long = "width")]
    pub column_width: Option<usize>,

    /// Hide line numbers
    #[clap(long = "no-line-numbers", action = clap::ArgAction::SetFalse)]
    pub line_numbers: bool,

    /// Color theme
    #[clap(long, value_enum, default_value_t = ThemeName::Default)]
    pub theme: ThemeName,
}
impl RenderArgs {
    pub fn into_parts(self, color: bool) -> (RendererOptions, RenderConfig) {
        let options = RendererOptions {
            line_numbers: self.line_numbers,
            theme: self.theme,
            color,
        };
        let config = RenderConfig {
            context_lines: (!self.full).then_some(self.context_lines),
            column_width: self.column_width,
        };
        (options, config)
    }
}

pub struct Renderer {
    options: RendererOptions,
    probe: Box<dyn WidthProbe>,
    line_junk: Option<Box<dyn Fn(&str) -> bool>>,
    char_junk: Option<Box<dyn Fn(char) -> bool>>,
}
impl Renderer {
    pub fn new(options: RendererOptions) -> Self {
        Renderer {
            options,
            probe: Box::new(TerminalProbe),
            line_junk: None,
            char_junk: Some(Box::new(align::is_character_junk)),
        }
    }

    /// Replace the source of the terminal width.
    pub fn with_width_probe(mut self, probe: impl WidthProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Never anchor line matches on lines for which `junk` returns true.
    pub fn with_line_junk(mut self, junk: impl Fn(&str) -> bool + 'static) -> Self {
        self.line_junk = Some(Box::new(junk));
        self
    }

    /// Replace the characters that never anchor intra-line matches
    /// (blanks and tabs by default), or disable the filter with `None`.
    pub fn with_char_junk(mut self, junk: Option<Box<dyn Fn(char) -> bool>>) -> Self {
        self.char_junk = junk;
        self
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Diff `a` against `b`, showing `context_lines` unchanged lines around
    /// each change, laid out for a total width of `column_width` columns.
    pub fn diff(
        &self,
        a: impl Into<Input>,
        b: impl Into<Input>,
        context_lines: usize,
        column_width: Option<usize>,
    ) -> Rows {
        let config = RenderConfig {
            context_lines: Some(context_lines),
            column_width,
        };
        self.diff_with(a, b, &config)
    }

    pub fn diff_with(
        &self,
        a: impl Into<Input>,
        b: impl Into<Input>,
        config: &RenderConfig,
    ) -> Rows {
        let a = a.into().into_lines();
        let b = b.into().into_lines();
        let differ = Differ::new(self.line_junk.as_deref(), self.char_junk.as_deref());

        self.render(align::align(&a, &b, config.context_lines, &differ), config.column_width)
    }

    /// Render rows from an alignment computed elsewhere.
    pub fn render(
        &self,
        rows: impl IntoIterator<Item = AlignedRow>,
        column_width: Option<usize>,
    ) -> Rows {
        let rows: Vec<AlignedRow> = rows.into_iter().collect();
        let layout = width::plan(
            &rows,
            column_width,
            self.options.line_numbers,
            self.probe.as_ref(),
        );

        Rows {
            rows: rows.into_iter(),
            formatter: RowFormatter {
                layout,
                painter: Painter::new(self.options.theme, self.options.color),
            },
            pending: VecDeque::new(),
        }
    }
}
impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererOptions::default())
    }
}

struct RowFormatter {
    layout: Layout,
    painter: Painter,
}
impl RowFormatter {
    fn gutter(&self, digits: usize, number: Option<usize>, out: &mut String) {
        if digits == 0 {
            return;
        }
        let text = match number {
            Some(number) => format!("{number:>digits$}{}", width::GUTTER_SUFFIX),
            None => " ".repeat(Layout::gutter_width(digits)),
        };
        self.painter.paint(Role::LineNumber, &text, out);
    }

    fn separator_row(&self) -> String {
        let dashes = "-".repeat(self.layout.column_width);
        let mut out = String::new();
        self.gutter(self.layout.left_gutter, None, &mut out);
        self.painter.paint(Role::Separator, &dashes, &mut out);
        self.painter.paint(Role::Separator, width::SEPARATOR, &mut out);
        self.gutter(self.layout.right_gutter, None, &mut out);
        self.painter.paint(Role::Separator, &dashes, &mut out);
        out.push('\n');
        out
    }

    fn content_rows(
        &self,
        left: Option<LineInfo>,
        right: Option<LineInfo>,
        out: &mut VecDeque<String>,
    ) {
        let width = self.layout.column_width;
        let chunks = |side: &Option<LineInfo>| match side {
            Some(info) => wrap::split(&info.text, width),
            None => wrap::split(&MarkedLine::new(), width),
        };
        let number = |side: &Option<LineInfo>| side.as_ref().and_then(|info| info.number);

        let lefts = chunks(&left);
        let rights = chunks(&right);
        let blank = " ".repeat(width);

        for idx in 0..lefts.len().max(rights.len()) {
            let mut line = String::new();
            let first = idx == 0;

            self.gutter(self.layout.left_gutter, number(&left).filter(|_| first), &mut line);
            match lefts.get(idx) {
                Some(chunk) => self.painter.paint_line(chunk, &mut line),
                None => line.push_str(&blank),
            }
            self.painter.paint(Role::Separator, width::SEPARATOR, &mut line);
            self.gutter(self.layout.right_gutter, number(&right).filter(|_| first), &mut line);
            match rights.get(idx) {
                Some(chunk) => self.painter.paint_line(chunk, &mut line),
                None => line.push_str(&blank),
            }
            line.push('\n');

            out.push_back(line);
        }
    }

    fn format(&self, row: AlignedRow, out: &mut VecDeque<String>) {
        match row {
            AlignedRow::Separator => out.push_back(self.separator_row()),
            AlignedRow::Content { left, right, .. } => self.content_rows(left, right, out),
        }
    }
}

/// The formatted output rows of a diff, each terminated by a newline.
///
/// Rows are formatted on demand; dropping the iterator early is fine.
pub struct Rows {
    rows: std::vec::IntoIter<AlignedRow>,
    formatter: RowFormatter,

    /// Output rows of the current aligned row that haven't been returned yet.
    pending: VecDeque<String>,
}
impl Rows {
    pub fn layout(&self) -> Layout {
        self.formatter.layout
    }
}
impl Iterator for Rows {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() {
            let row = self.rows.next()?;
            self.formatter.format(row, &mut self.pending);
        }
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::marked::strip_ansi;

    fn renderer(line_numbers: bool, color: bool) -> Renderer {
        Renderer::new(RendererOptions {
            line_numbers,
            theme: ThemeName::Default,
            color,
        })
        .with_width_probe(FixedWidth(80))
    }

    #[test]
    fn inline_change_without_line_numbers() {
        let rows: Vec<String> = renderer(false, true)
            .diff("lorem ipsum dolor sit amet", "lorem foo ipsum dolor amet", 3, Some(83))
            .collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            format!(
                "lorem ipsum dolor \x1b[0m\x1b[31msit \x1b[0mamet{}\
                 \x1b[0m\x1b[38;5;8m | \x1b[0m\
                 lorem \x1b[0m\x1b[32mfoo \x1b[0mipsum dolor amet{}\n",
                " ".repeat(14),
                " ".repeat(14),
            )
        );
    }

    #[test]
    fn gutters_and_wrapping() {
        let rows: Vec<String> = renderer(true, false)
            .diff(vec!["x".repeat(50)], vec!["y"], 3, Some(80))
            .collect();

        // (80 - "1. " - "1. " - " | ") / 2 = 35 columns; 50 chars wrap once.
        assert_eq!(
            rows,
            vec![
                format!("1. {} | 1. {}\n", "x".repeat(35), "y".to_owned() + &" ".repeat(34)),
                format!("   {} |    {}\n", "x".repeat(15) + &" ".repeat(20), " ".repeat(35)),
            ]
        );
    }

    #[test]
    fn separator_rows() {
        let a: Vec<String> = (1..=10).map(|n| n.to_string()).collect();
        let mut b = a.clone();
        b[9] = "ten".into();

        let rows: Vec<String> = renderer(true, true).diff(a, b, 1, None).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            strip_ansi(&rows[0]),
            format!("    {} |     {}\n", "-".repeat(34), "-".repeat(34))
        );
        assert!(rows[0].starts_with("\x1b[0m\x1b[38;5;8m    \x1b[0m"));
        assert!(strip_ansi(&rows[1]).starts_with(" 9. 9"));
        assert!(strip_ansi(&rows[2]).starts_with("10. 10"));
    }

    #[test]
    fn layout_is_exposed() {
        let rows = renderer(true, false).diff("a\nb", "a\nc", 3, Some(100));
        assert_eq!(
            rows.layout(),
            Layout {
                column_width: 40,
                left_gutter: 1,
                right_gutter: 1,
            }
        );
    }

    #[test]
    fn render_external_alignment() {
        let rows = vec![
            AlignedRow::Separator,
            AlignedRow::Content {
                left: None,
                right: Some(LineInfo {
                    number: Some(7),
                    text: MarkedLine::plain("new"),
                }),
                changed: true,
            },
        ];
        let out: Vec<String> = renderer(true, false).render(rows, Some(80)).collect();

        assert_eq!(out.len(), 2);
        assert_eq!(out[1], format!("   {} | 7. new{}\n", " ".repeat(35), " ".repeat(32)));
    }
}
