//! Replay parsed SVG drawing calls onto a vector canvas.
//!
//! This crate is the last stage of an SVG-to-document pipeline.  An upstream
//! parser has already turned an SVG document into a [`CallTree`]: a nested,
//! ordered list of calls like "set a transformation matrix", "draw this
//! text", "open a transparency group and draw these paths inside it".  The
//! [`Renderer`] replays that tree onto any surface that implements [`Canvas`],
//! while fixing up the things the parser cannot know about:
//!
//! * transformation matrices are moved from the document's frame into page
//!   coordinates;
//! * text fragments split across sibling elements continue one after the
//!   other, and `text-anchor` is resolved by measuring the text;
//! * `clip`, `save` and `restore` become raw content and graphics state
//!   operations.
//!
//! The whole drawing is clipped to the output rectangle and wrapped in one
//! saved graphics state, so the caller's canvas state is left alone.
//!
//! The crate also provides [`color_to_hex`], which finds the first color in
//! an SVG paint descriptor and normalizes it to six hex digits.
//!
//! # Example
//!
//! ```
//! use svgreplay::{
//!     call_node, Arguments, CallTree, Operation, Point, RecordingCanvas, RenderOptions, Renderer,
//! };
//!
//! let tree: CallTree = vec![
//!     call_node(Operation::FillColor, Arguments::new(vec!["ff0000".into()]), vec![]),
//!     call_node(Operation::Rectangle, Arguments::numbers(&[0.0, 10.0, 10.0, 10.0]), vec![]),
//!     call_node(Operation::Fill, Arguments::none(), vec![]),
//! ]
//! .into_iter()
//! .collect();
//!
//! let renderer = Renderer::new(tree, 10.0, 10.0, RenderOptions::new().at(Point::new(0.0, 10.0)))?;
//!
//! let mut canvas = RecordingCanvas::new(100.0, 100.0);
//! renderer.draw(&mut canvas)?;
//! println!("{}", canvas.dump());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Logging
//!
//! Set the `SVGREPLAY_LOG` environment variable to get messages about calls
//! that were skipped or passed through without correction.

#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(nonstandard_style, rust_2018_idioms, unused)]
// Some lints no longer exist
#![warn(renamed_and_removed_lints)]
// Standalone lints
#![warn(trivial_casts, trivial_numeric_casts)]

pub use crate::call_tree::{
    call_node, Arguments, Call, CallNode, CallTree, Operation, Options, Value, AT, KERNING, SIZE,
    TEXT_ANCHOR,
};
pub use crate::canvas::{with_saved_graphics_state, Block, Bounds, Canvas, Point};
pub use crate::color::{color_to_hex, parse_color, HexColor};
pub use crate::display::{is_displayed, resolve_display};
pub use crate::error::{ColorError, ConfigError, RenderingError, UnknownOperation};
pub use crate::font_paths::FontPaths;
pub use crate::interpreter::Interpreter;
pub use crate::recording::{CanvasCall, RecordingCanvas};
pub use crate::renderer::{RenderOptions, Renderer};
pub use crate::rewrite::{
    absolute_transformation_matrix, rewrite, InterpreterContext, Rewrite, Substitute,
    CLIP_AND_DISCARD, END_PATH,
};
pub use crate::session::Session;
pub use crate::sizing::Sizing;

mod call_tree;
mod canvas;
mod color;
mod display;
mod error;
mod font_paths;
mod interpreter;
mod log;
mod recording;
mod renderer;
mod rewrite;
mod session;
mod sizing;
