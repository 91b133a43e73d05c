// SPDX-License-Identifier: MIT

use std::io::{ErrorKind, IsTerminal, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use clap::Args;
use log::debug;
use termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};

use crate::utils::*;

#[derive(Debug, Clone, Default, Args)]
pub struct Options {
    /// Whether the output should be run through a pager
    #[clap(long)]
    pub pager: Option<bool>,

    /// Whether the output should be colored
    #[clap(long)]
    pub color: Option<bool>,
}

fn spawn_pager() -> Option<(Child, ChildStdin)> {
    let mut child = Command::new("less")
        .arg("-FR")
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|err| debug!("not using a pager: {err}"))
        .ok()?;
    let stdin = child.stdin.take()?;
    Some((child, stdin))
}

pub struct Cli {
    stream: Box<dyn WriteColor>,
    pager: Option<Child>,
    color: bool,
}
impl Cli {
    pub fn new(options: Options) -> Cli {
        let is_terminal = std::io::stdout().is_terminal();

        let use_pager = options.pager.unwrap_or(is_terminal);
        let color = options.color.unwrap_or(is_terminal);

        let (pager, stdin) = match use_pager.then(spawn_pager).flatten() {
            Some((child, stdin)) => (Some(child), Some(stdin)),
            None => (None, None),
        };

        let stream: Box<dyn WriteColor> = match stdin {
            Some(stdin) if color => Box::new(termcolor::Ansi::new(stdin)),
            Some(stdin) => Box::new(NoColor::new(stdin)),
            None => {
                let choice = if color { ColorChoice::Always } else { ColorChoice::Never };
                Box::new(StandardStream::stdout(choice))
            }
        };

        Cli {
            stream,
            pager,
            color,
        }
    }

    /// Whether output should carry color escape sequences.
    pub fn color(&self) -> bool {
        self.color
    }

    pub fn stream(&mut self) -> &mut dyn WriteColor {
        self.stream.as_mut()
    }

    /// Write pre-formatted rows to the output.
    ///
    /// Stops quietly if the reader went away, e.g. because the pager was
    /// closed before reaching the end.
    pub fn write_rows(&mut self, rows: impl IntoIterator<Item = String>) -> Result<()> {
        let result = rows
            .into_iter()
            .try_for_each(|row| self.stream.write_all(row.as_bytes()))
            .and_then(|()| self.stream.flush());
        match result {
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                debug!("output closed early");
                Ok(())
            }
            result => Ok(result?),
        }
    }
}

impl Drop for Cli {
    fn drop(&mut self) {
        // Close the stream to signal EOF to the pager, if any.
        self.stream = Box::new(NoColor::new(std::io::sink()));

        // Wait for the pager to exit, otherwise it ends up killed by the shell
        // and leaves the terminal in a bad state.
        if let Some(pager) = &mut self.pager {
            pager.wait().map(|_| ()).unwrap_or_default();
        }
    }
}
