// SPDX-License-Identifier: MIT

//! Side-by-side colored diffs for the terminal.
//!
//! ```
//! use cdiff::{Renderer, RendererOptions};
//!
//! let renderer = Renderer::new(RendererOptions {
//!     color: false,
//!     ..Default::default()
//! });
//! for row in renderer.diff("lorem ipsum\n", "lorem foo ipsum\n", 3, Some(80)) {
//!     print!("{row}");
//! }
//! ```

pub mod align;
pub mod cli;
pub mod marked;
pub mod render;
pub mod report;
pub mod theme;
pub mod utils;

pub use align::{AlignedRow, Input, LineInfo};
pub use marked::{Mark, MarkedLine, Span};
pub use render::{RenderConfig, Renderer, RendererOptions, Rows};
pub use theme::ThemeName;
