//! Entry point: drawing a whole call tree at a position on a canvas.

use crate::call_tree::CallTree;
use crate::canvas::{with_saved_graphics_state, Canvas, Point};
use crate::error::{ConfigError, RenderingError};
use crate::font_paths::FontPaths;
use crate::interpreter::Interpreter;
use crate::rewrite::CLIP_AND_DISCARD;
use crate::session::Session;
use crate::sizing::Sizing;
use crate::svgreplay_log;

/// Options for a [`Renderer`].
///
/// The output position is mandatory; [`Renderer::new`] fails without it.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    at: Option<Point>,
    width: Option<f64>,
    height: Option<f64>,
    font_paths: FontPaths,
    session: Session,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the top-left corner of the document goes, relative to the
    /// bottom-left corner of the canvas' current frame.
    pub fn at(mut self, at: Point) -> Self {
        self.at = Some(at);
        self
    }

    /// Requested output width.  The height follows the document's aspect ratio.
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Requested output height, used only if no width is requested.
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn font_paths(mut self, font_paths: FontPaths) -> Self {
        self.font_paths = font_paths;
        self
    }

    /// Uses `session` instead of one configured from the environment.
    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }
}

/// Draws a call tree onto canvases.
pub struct Renderer {
    session: Session,
    tree: CallTree,
    sizing: Sizing,
    at: Point,
    font_paths: FontPaths,
}

impl Renderer {
    /// Creates a renderer for `tree`, produced from a document of the given size.
    ///
    /// Fails if `options` has no output position, or if a size is unusable.
    pub fn new(
        tree: CallTree,
        document_width: f64,
        document_height: f64,
        options: RenderOptions,
    ) -> Result<Renderer, ConfigError> {
        let at = options.at.ok_or(ConfigError::MissingPosition)?;
        let sizing = Sizing::resolve(document_width, document_height, options.width, options.height)?;

        Ok(Renderer {
            session: options.session,
            tree,
            sizing,
            at,
            font_paths: options.font_paths,
        })
    }

    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replays the tree onto `canvas`.
    ///
    /// Everything is drawn inside a bounding box at the output position, within
    /// a single saved graphics state, and clipped to the output rectangle.
    pub fn draw(&self, canvas: &mut dyn Canvas) -> Result<(), RenderingError> {
        let Sizing {
            output_width,
            output_height,
        } = self.sizing;

        svgreplay_log!(
            self.session,
            "drawing {} top-level calls at ({}, {}), {}x{}",
            self.tree.calls().len(),
            self.at.x,
            self.at.y,
            output_width,
            output_height
        );

        canvas.use_font_paths(&self.font_paths);

        canvas.bounding_box(self.at, output_width, output_height, &mut |c: &mut dyn Canvas| {
            with_saved_graphics_state(c, |c| {
                clip_rectangle(c, 0.0, 0.0, output_width, output_height)?;
                Interpreter::new(&self.session).interpret(c, self.tree.calls())
            })
        })
    }
}

fn clip_rectangle(
    canvas: &mut dyn Canvas,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Result<(), RenderingError> {
    canvas.move_to(Point::new(x, y))?;
    canvas.line_to(Point::new(x + width, y))?;
    canvas.line_to(Point::new(x + width, y + height))?;
    canvas.line_to(Point::new(x, y + height))?;
    canvas.close_path()?;
    canvas.add_content(CLIP_AND_DISCARD)
}
