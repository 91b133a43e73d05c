// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use clap::Parser;
use log::debug;

use cdiff::render::RenderArgs;
use cdiff::*;
use utils::Result;

/// Show the differences between two files side by side.
#[derive(Parser, Debug)]
#[clap(name = "cdiff")]
struct Options {
    old: PathBuf,
    new: PathBuf,

    #[clap(flatten)]
    render: RenderArgs,

    /// Don't anchor line matches on blank lines and lines holding only '#'
    #[clap(long)]
    line_junk: bool,

    #[clap(flatten)]
    cli: cli::Options,
}

fn read_input(path: &Path) -> Result<Input> {
    let bytes = utils::read_bytes(path)?;
    utils::try_forward(|| Input::from_bytes(bytes), || path.display().to_string())
}

fn do_main() -> Result<()> {
    let args = Options::parse();

    if std::env::var("RUST_LOG").is_ok() {
        env_logger::builder()
            .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
            .init();
    }

    let old = read_input(&args.old)?;
    let new = read_input(&args.new)?;

    let mut cli = cli::Cli::new(args.cli);
    let (options, config) = args.render.into_parts(cli.color());
    debug!("rendering with {options:?}, {config:?}");

    let mut renderer = Renderer::new(options);
    if args.line_junk {
        renderer = renderer.with_line_junk(align::is_line_junk);
    }

    cli.write_rows(renderer.diff_with(old, new, &config))
}

fn main() {
    if let Err(err) = do_main() {
        println!("{}", err);
        std::process::exit(1);
    }
}
