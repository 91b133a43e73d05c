// SPDX-License-Identifier: MIT

use log::debug;

/// Source of the total width available for output.
pub trait WidthProbe {
    /// Number of columns, or `None` if unknown.
    fn columns(&self) -> Option<usize>;
}

/// Asks the terminal attached to the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalProbe;
impl WidthProbe for TerminalProbe {
    fn columns(&self) -> Option<usize> {
        match crossterm::terminal::size() {
            Ok((0, _)) => None,
            Ok((columns, _)) => Some(columns.into()),
            Err(err) => {
                debug!("terminal size unavailable: {err}");
                None
            }
        }
    }
}

/// Always reports the same width.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidth(pub usize);
impl WidthProbe for FixedWidth {
    fn columns(&self) -> Option<usize> {
        Some(self.0)
    }
}

impl<F: Fn() -> Option<usize>> WidthProbe for F {
    fn columns(&self) -> Option<usize> {
        self()
    }
}
