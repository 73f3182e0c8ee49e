//! The drawing surface that a call tree is replayed onto.
//!
//! A [`Canvas`] is a stateful vector drawing target, along the lines of a PDF
//! page being written: it has a current path, a stack of graphics states, a
//! content stream that raw operators can be appended to, and a notion of the
//! current drawing frame ("bounds") whose absolute top-left corner can be queried.
//!
//! Calls that wrap nested content, like a transparency group or a bounding box,
//! receive a [`Block`].  The canvas decides when to run it, for example after
//! it has opened the group; the block gets the canvas passed back in so that it
//! can issue the nested calls.

use crate::call_tree::{Arguments, Operation, Options};
use crate::error::RenderingError;
use crate::font_paths::FontPaths;

/// A continuation that draws nested content onto the canvas it is given.
pub type Block<'a> = &'a mut dyn FnMut(&mut dyn Canvas) -> Result<(), RenderingError>;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

/// The current drawing frame, in absolute page coordinates.
///
/// As in PDF, y grows upwards, so `top` is greater than `bottom()` for a
/// frame of positive height.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub absolute_left: f64,
    pub absolute_top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(absolute_left: f64, absolute_top: f64, width: f64, height: f64) -> Bounds {
        Bounds {
            absolute_left,
            absolute_top,
            width,
            height,
        }
    }

    pub fn absolute_bottom(&self) -> f64 {
        self.absolute_top - self.height
    }

    /// The frame of a box placed with its top-left corner at `at`, relative to
    /// this frame's bottom-left corner.
    pub fn nested(&self, at: Point, width: f64, height: f64) -> Bounds {
        Bounds::new(
            self.absolute_left + at.x,
            self.absolute_bottom() + at.y,
            width,
            height,
        )
    }
}

/// The operations that the interpreter may invoke on a drawing surface.
///
/// All methods are synchronous, and the interpreter never issues a call
/// before the previous one has returned.
pub trait Canvas {
    fn move_to(&mut self, p: Point) -> Result<(), RenderingError>;

    fn line_to(&mut self, p: Point) -> Result<(), RenderingError>;

    fn close_path(&mut self) -> Result<(), RenderingError>;

    /// Appends raw operators to the content stream, e.g. `"W n"`.
    fn add_content(&mut self, content: &str) -> Result<(), RenderingError>;

    fn save_graphics_state(&mut self) -> Result<(), RenderingError>;

    fn restore_graphics_state(&mut self) -> Result<(), RenderingError>;

    /// Measures the advance width of `text` as it would be drawn with `options`.
    fn width_of(&self, text: &str, options: &Options) -> Result<f64, RenderingError>;

    /// The current drawing frame.
    fn bounds(&self) -> Bounds;

    /// Runs `block` with the drawing frame set to a `width` by `height` box whose
    /// top-left corner is at `at`, relative to the current frame's bottom-left corner.
    fn bounding_box(
        &mut self,
        at: Point,
        width: f64,
        height: f64,
        block: Block<'_>,
    ) -> Result<(), RenderingError>;

    /// Invokes the capability named by `operation`.
    ///
    /// `block` is present when the call has nested calls; the canvas must run
    /// it at the point where the nested content belongs.
    fn invoke(
        &mut self,
        operation: Operation,
        arguments: &Arguments,
        block: Option<Block<'_>>,
    ) -> Result<(), RenderingError>;

    /// Tells the canvas where to look for font files before anything is drawn.
    fn use_font_paths(&mut self, _paths: &FontPaths) {}
}

/// Runs `f` between a save and a restore of the canvas' graphics state.
///
/// If `f` fails, the error is returned right away without restoring; the
/// render is aborted at that point anyway.
pub fn with_saved_graphics_state<O, F>(canvas: &mut dyn Canvas, f: F) -> Result<O, RenderingError>
where
    F: FnOnce(&mut dyn Canvas) -> Result<O, RenderingError>,
{
    canvas.save_graphics_state()?;
    let o = f(&mut *canvas)?;
    canvas.restore_graphics_state()?;
    Ok(o)
}
