// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use termcolor::{Ansi, Color, ColorSpec, WriteColor};

use crate::marked::MarkedLine;
use crate::utils::*;

/// What a piece of painted output represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Delete,
    Insert,
    Change,
    LineNumber,
    Separator,
}
impl Role {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeName {
    #[default]
    Default,
    Bright,
    Contrast,
    Plain,
}
impl ThemeName {
    pub const ALL: [ThemeName; 4] = [
        ThemeName::Default,
        ThemeName::Bright,
        ThemeName::Contrast,
        ThemeName::Plain,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Bright => "bright",
            ThemeName::Contrast => "contrast",
            ThemeName::Plain => "plain",
        }
    }

    pub fn theme(self) -> &'static Theme {
        match self {
            ThemeName::Default => &DEFAULT,
            ThemeName::Bright => &BRIGHT,
            ThemeName::Contrast => &CONTRAST,
            ThemeName::Plain => &PLAIN,
        }
    }
}
impl FromStr for ThemeName {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self> {
        ThemeName::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown theme '{s}'").into())
    }
}
impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn escape_sequence(write: impl FnOnce(&mut Ansi<Vec<u8>>) -> std::io::Result<()>) -> String {
    let mut ansi = Ansi::new(Vec::new());
    // Writing into a Vec can't fail.
    write(&mut ansi).unwrap_or_default();
    String::from_utf8_lossy(&ansi.into_inner()).into_owned()
}

/// Colors for each [`Role`], plus the escape sequences that select them.
pub struct Theme {
    name: ThemeName,
    specs: [ColorSpec; Role::COUNT],
    escapes: [String; Role::COUNT],
}
impl Theme {
    fn new(name: ThemeName, delete: ColorSpec, insert: ColorSpec, change: ColorSpec) -> Self {
        let mut dark_gray = ColorSpec::new();
        dark_gray.set_fg(Some(Color::Black)).set_intense(true);

        let specs = [delete, insert, change, dark_gray.clone(), dark_gray];
        let escapes = specs
            .each_ref()
            .map(|spec| escape_sequence(|ansi| ansi.set_color(spec)));

        Theme {
            name,
            specs,
            escapes,
        }
    }

    pub fn name(&self) -> ThemeName {
        self.name
    }

    pub fn spec(&self, role: Role) -> &ColorSpec {
        &self.specs[role.index()]
    }

    /// The escape sequence that switches to the color of `role`.
    pub fn escape(&self, role: Role) -> &str {
        &self.escapes[role.index()]
    }
}

fn fg(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    spec
}

fn bg(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_bg(Some(color));
    spec
}

lazy_static! {
    static ref DEFAULT: Theme = Theme::new(
        ThemeName::Default,
        fg(Color::Red),
        fg(Color::Green),
        fg(Color::Yellow),
    );
    static ref BRIGHT: Theme = Theme::new(
        ThemeName::Bright,
        fg(Color::Magenta),
        fg(Color::Cyan),
        fg(Color::Yellow),
    );
    static ref CONTRAST: Theme = Theme::new(
        ThemeName::Contrast,
        bg(Color::Red),
        bg(Color::Green),
        bg(Color::Yellow),
    );
    static ref PLAIN: Theme = {
        let mut delete = fg(Color::White);
        delete.set_intense(true).set_underline(true);
        let mut insert = delete.clone();
        insert.set_bold(true);
        let mut change = ColorSpec::new();
        change.set_underline(true);
        Theme::new(ThemeName::Plain, delete, insert, change)
    };

    /// Shared by all themes; ends every painted region.
    static ref RESET: String = escape_sequence(|ansi| ansi.reset());
}

/// Paints text with a theme, or leaves it alone when color is disabled.
#[derive(Clone, Copy)]
pub struct Painter {
    theme: &'static Theme,
    color: bool,
}
impl Painter {
    pub fn new(theme: ThemeName, color: bool) -> Self {
        Painter {
            theme: theme.theme(),
            color,
        }
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    /// Append `text` painted in the color of `role`.
    pub fn paint(&self, role: Role, text: &str, out: &mut String) {
        if !self.color || text.is_empty() {
            out.push_str(text);
            return;
        }
        out.push_str(self.theme.escape(role));
        out.push_str(text);
        out.push_str(&RESET);
    }

    /// Append a marked line with each changed span painted by its mark.
    pub fn paint_line(&self, line: &MarkedLine, out: &mut String) {
        for span in line.spans() {
            match span.mark.role() {
                Some(role) => self.paint(role, &span.text, out),
                None => out.push_str(&span.text),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::marked::Mark;

    #[test]
    fn theme_names() -> Result<()> {
        assert_eq!("bright".parse::<ThemeName>()?, ThemeName::Bright);
        assert_eq!("CONTRAST".parse::<ThemeName>()?, ThemeName::Contrast);
        assert!("neon".parse::<ThemeName>().is_err());
        for name in ThemeName::ALL {
            assert_eq!(name.theme().name(), name);
            assert_eq!(name.to_string().parse::<ThemeName>()?, name);
        }
        Ok(())
    }

    #[test]
    fn escapes() {
        let theme = ThemeName::Default.theme();
        assert_eq!(theme.escape(Role::Delete), "\x1b[0m\x1b[31m");
        assert_eq!(theme.escape(Role::Insert), "\x1b[0m\x1b[32m");
        assert_eq!(theme.escape(Role::LineNumber), "\x1b[0m\x1b[38;5;8m");
        assert_eq!(
            ThemeName::Contrast.theme().escape(Role::Change),
            "\x1b[0m\x1b[43m"
        );
        assert_eq!(RESET.as_str(), "\x1b[0m");
    }

    #[test]
    fn painter() {
        let mut line = MarkedLine::plain("lorem ");
        line.push(Mark::Insert, "foo");

        let mut out = String::new();
        Painter::new(ThemeName::Default, true).paint_line(&line, &mut out);
        assert_eq!(out, "lorem \x1b[0m\x1b[32mfoo\x1b[0m");

        let mut out = String::new();
        Painter::new(ThemeName::Default, false).paint_line(&line, &mut out);
        assert_eq!(out, "lorem foo");
    }
}
