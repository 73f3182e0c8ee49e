//! A canvas that records what is drawn onto it.
//!
//! [`RecordingCanvas`] keeps every invocation as a [`CanvasCall`], in order.
//! It is what the test suite replays trees onto, and it is handy for looking
//! at what a document turns into: [`RecordingCanvas::dump`] prints one call
//! per line.
//!
//! Text is measured with a fixed advance per character, as a fraction of the
//! font size.  Kerning does not change the width, but every measurement is
//! kept along with its options, see [`RecordingCanvas::measurements`].

use std::cell::RefCell;
use std::fmt;

use crate::call_tree::{Arguments, Operation, Options, Value};
use crate::canvas::{Block, Bounds, Canvas, Point};
use crate::error::RenderingError;
use crate::font_paths::FontPaths;

const DEFAULT_FONT_SIZE: f64 = 12.0;

const DEFAULT_ADVANCE: f64 = 0.5;

/// One invocation on a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCall {
    MoveTo(Point),
    LineTo(Point),
    ClosePath,
    AddContent(String),
    SaveGraphicsState,
    RestoreGraphicsState,
    BoundingBoxBegin { at: Point, width: f64, height: f64 },
    BoundingBoxEnd,
    Invoke { operation: Operation, arguments: Arguments },
    BlockBegin,
    BlockEnd,
}

impl fmt::Display for CanvasCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CanvasCall::MoveTo(p) => write!(f, "move_to {} {}", p.x, p.y),
            CanvasCall::LineTo(p) => write!(f, "line_to {} {}", p.x, p.y),
            CanvasCall::ClosePath => write!(f, "close_path"),
            CanvasCall::AddContent(ref s) => write!(f, "add_content {s:?}"),
            CanvasCall::SaveGraphicsState => write!(f, "save_graphics_state"),
            CanvasCall::RestoreGraphicsState => write!(f, "restore_graphics_state"),
            CanvasCall::BoundingBoxBegin { at, width, height } => {
                write!(f, "bounding_box [{}, {}] {width}x{height} {{", at.x, at.y)
            }
            CanvasCall::BoundingBoxEnd => write!(f, "}} bounding_box"),
            CanvasCall::Invoke {
                ref operation,
                ref arguments,
            } => write!(f, "{operation}{arguments}"),
            CanvasCall::BlockBegin => write!(f, "{{"),
            CanvasCall::BlockEnd => write!(f, "}}"),
        }
    }
}

/// A [`Canvas`] that records its invocations instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    calls: Vec<CanvasCall>,
    page: Bounds,
    frames: Vec<Bounds>,
    advance: f64,
    graphics_state_depth: usize,
    failing_operation: Option<Operation>,
    font_paths: FontPaths,
    measurements: RefCell<Vec<(String, Options)>>,
}

impl RecordingCanvas {
    /// Creates a canvas for a page of the given size, with the origin at its bottom-left.
    pub fn new(width: f64, height: f64) -> RecordingCanvas {
        RecordingCanvas::with_bounds(Bounds::new(0.0, height, width, height))
    }

    /// Creates a canvas whose outermost drawing frame is `page`.
    pub fn with_bounds(page: Bounds) -> RecordingCanvas {
        RecordingCanvas {
            calls: Vec::new(),
            page,
            frames: Vec::new(),
            advance: DEFAULT_ADVANCE,
            graphics_state_depth: 0,
            failing_operation: None,
            font_paths: FontPaths::default(),
            measurements: RefCell::new(Vec::new()),
        }
    }

    /// Sets the width of every character, as a fraction of the font size.
    #[must_use]
    pub fn with_advance(mut self, advance: f64) -> RecordingCanvas {
        self.advance = advance;
        self
    }

    /// Makes every invocation of `operation` fail with a [`RenderingError::Canvas`].
    #[must_use]
    pub fn failing_on(mut self, operation: Operation) -> RecordingCanvas {
        self.failing_operation = Some(operation);
        self
    }

    pub fn calls(&self) -> &[CanvasCall] {
        &self.calls
    }

    pub fn graphics_state_depth(&self) -> usize {
        self.graphics_state_depth
    }

    pub fn font_paths(&self) -> &FontPaths {
        &self.font_paths
    }

    /// Every text passed to [`Canvas::width_of`], with the options it was measured with.
    pub fn measurements(&self) -> Vec<(String, Options)> {
        self.measurements.borrow().clone()
    }

    /// The horizontal positions of all `draw_text` calls, in order.
    pub fn text_positions(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                CanvasCall::Invoke {
                    operation: Operation::DrawText,
                    ref arguments,
                } => arguments.options.as_ref().and_then(Options::at).map(|p| p.x),
                _ => None,
            })
            .collect()
    }

    /// The recording, one call per line, indented by nesting.
    pub fn dump(&self) -> String {
        let mut s = String::new();
        let mut depth = 0usize;

        for call in &self.calls {
            if matches!(*call, CanvasCall::BlockEnd | CanvasCall::BoundingBoxEnd) {
                depth = depth.saturating_sub(1);
            }

            s.push_str(&"  ".repeat(depth));
            s.push_str(&call.to_string());
            s.push('\n');

            if matches!(*call, CanvasCall::BlockBegin | CanvasCall::BoundingBoxBegin { .. }) {
                depth += 1;
            }
        }

        s
    }

    fn check_point(&self, operation: Operation, p: Point) -> Result<(), RenderingError> {
        if p.x.is_finite() && p.y.is_finite() {
            Ok(())
        } else {
            Err(RenderingError::invalid_arguments(
                operation,
                "coordinates must be finite",
            ))
        }
    }
}

fn all_finite(values: &[Value]) -> bool {
    values.iter().all(|v| match *v {
        Value::Number(n) => n.is_finite(),
        Value::Point(p) => p.x.is_finite() && p.y.is_finite(),
        Value::List(ref v) => all_finite(v),
        Value::Text(_) | Value::Bool(_) => true,
    })
}

impl Canvas for RecordingCanvas {
    fn move_to(&mut self, p: Point) -> Result<(), RenderingError> {
        self.check_point(Operation::MoveTo, p)?;
        self.calls.push(CanvasCall::MoveTo(p));
        Ok(())
    }

    fn line_to(&mut self, p: Point) -> Result<(), RenderingError> {
        self.check_point(Operation::LineTo, p)?;
        self.calls.push(CanvasCall::LineTo(p));
        Ok(())
    }

    fn close_path(&mut self) -> Result<(), RenderingError> {
        self.calls.push(CanvasCall::ClosePath);
        Ok(())
    }

    fn add_content(&mut self, content: &str) -> Result<(), RenderingError> {
        self.calls.push(CanvasCall::AddContent(content.to_string()));
        Ok(())
    }

    fn save_graphics_state(&mut self) -> Result<(), RenderingError> {
        self.graphics_state_depth += 1;
        self.calls.push(CanvasCall::SaveGraphicsState);
        Ok(())
    }

    fn restore_graphics_state(&mut self) -> Result<(), RenderingError> {
        if self.graphics_state_depth == 0 {
            return Err(RenderingError::Canvas(
                "graphics state restored without a matching save".to_string(),
            ));
        }

        self.graphics_state_depth -= 1;
        self.calls.push(CanvasCall::RestoreGraphicsState);
        Ok(())
    }

    fn width_of(&self, text: &str, options: &Options) -> Result<f64, RenderingError> {
        let size = options.size().unwrap_or(DEFAULT_FONT_SIZE);
        if !size.is_finite() || size < 0.0 {
            return Err(RenderingError::Canvas(format!("invalid font size {size}")));
        }

        self.measurements
            .borrow_mut()
            .push((text.to_string(), options.clone()));

        Ok(text.chars().count() as f64 * size * self.advance)
    }

    fn bounds(&self) -> Bounds {
        self.frames.last().copied().unwrap_or(self.page)
    }

    fn bounding_box(
        &mut self,
        at: Point,
        width: f64,
        height: f64,
        block: Block<'_>,
    ) -> Result<(), RenderingError> {
        let frame = self.bounds().nested(at, width, height);

        self.calls
            .push(CanvasCall::BoundingBoxBegin { at, width, height });
        self.frames.push(frame);
        let res = block(self);
        self.frames.pop();
        res?;
        self.calls.push(CanvasCall::BoundingBoxEnd);

        Ok(())
    }

    fn invoke(
        &mut self,
        operation: Operation,
        arguments: &Arguments,
        block: Option<Block<'_>>,
    ) -> Result<(), RenderingError> {
        if self.failing_operation == Some(operation) {
            return Err(RenderingError::Canvas(format!("{operation} failed")));
        }

        let options_finite = arguments.options.as_ref().map_or(true, |o| {
            o.iter().all(|(_, v)| all_finite(std::slice::from_ref(v)))
        });

        if !all_finite(&arguments.values) || !options_finite {
            return Err(RenderingError::invalid_arguments(
                operation,
                "numbers must be finite",
            ));
        }

        self.calls.push(CanvasCall::Invoke {
            operation,
            arguments: arguments.clone(),
        });

        if let Some(block) = block {
            self.calls.push(CanvasCall::BlockBegin);
            block(self)?;
            self.calls.push(CanvasCall::BlockEnd);
        }

        Ok(())
    }

    fn use_font_paths(&mut self, paths: &FontPaths) {
        self.font_paths = paths.clone();
    }
}
