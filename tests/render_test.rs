// SPDX-License-Identifier: MIT

use clap::Parser;

use cdiff::render::{FixedWidth, RenderArgs};
use cdiff::*;
use utils::Result;

#[derive(Parser, Debug)]
struct FixtureArgs {
    #[clap(flatten)]
    render: RenderArgs,
}

#[test]
fn render_test() -> Result<()> {
    for entry in std::path::Path::new("./tests/render_test").read_dir()? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let path = entry.path();
        println!("Test: {}", path.display());

        let old = Input::from_bytes(utils::read_bytes(path.join("old"))?)?;
        let new = Input::from_bytes(utils::read_bytes(path.join("new"))?)?;
        let expected = String::from_utf8(utils::read_bytes(path.join("expected"))?)?;
        let args = String::from_utf8(utils::read_bytes(path.join("args"))?)?;

        let args =
            FixtureArgs::try_parse_from(std::iter::once("cdiff").chain(args.split_whitespace()))?;
        let (options, config) = args.render.into_parts(false);

        // The terminal must not matter: every fixture passes a width.
        let renderer = Renderer::new(options).with_width_probe(FixedWidth(1000));
        let rows: String = renderer.diff_with(old, new, &config).collect();

        assert_eq!(expected, rows);
    }

    Ok(())
}
