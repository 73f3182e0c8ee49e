//! Context-sensitive rewrites applied to calls just before they are issued.
//!
//! The parser that builds the call tree sees one element at a time, so some
//! things can only be settled while replaying:
//!
//! * Text runs split across sibling `<tspan>`s continue where the previous
//!   fragment ended.  The parser emits `relative_draw_text` for those, and we
//!   keep a pending text cursor in [`InterpreterContext`].
//!
//! * Text anchors.  The canvas draws text left-anchored, so for `middle` and
//!   `end` we measure the text and move its position.
//!
//! * Transformation matrices are relative to the enclosing frame's origin,
//!   but the canvas applies them in page coordinates.
//!
//! * `clip`, `save` and `restore` are not canvas calls at all; they turn into
//!   raw content or graphics state operations, after which the children run.

use crate::call_tree::{Arguments, Call, Operation, Options, Value, KERNING, TEXT_ANCHOR};
use crate::canvas::{Bounds, Canvas, Point};
use crate::error::RenderingError;
use crate::session::Session;
use crate::svgreplay_log;

/// Content stream operators that intersect the clip with the current path, then discard the path.
pub const CLIP_AND_DISCARD: &str = "W n";

/// Content stream operator that ends the current path without painting it.
pub const END_PATH: &str = "n";

/// The glyph whose width separates consecutive text fragments.
const SPACE_EQUIVALENT: &str = "n";

/// State carried from one call to the next during a single replay.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InterpreterContext {
    /// Where the next `relative_draw_text` starts horizontally, if a text
    /// fragment was drawn since the last text group began.
    pub relative_text_position: Option<f64>,
}

impl InterpreterContext {
    pub fn new() -> InterpreterContext {
        InterpreterContext::default()
    }
}

/// What to do with a call after rewriting it.
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Issue this call to the canvas.
    Proceed(Call),

    /// Do not issue the call; perform the substitute, if any, and then run the children.
    Suppress(Option<Substitute>),
}

/// A canvas operation performed in place of a suppressed call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Substitute {
    AddContent(&'static str),
    SaveGraphicsState,
    RestoreGraphicsState,
}

impl Substitute {
    pub fn apply(&self, canvas: &mut dyn Canvas) -> Result<(), RenderingError> {
        match *self {
            Substitute::AddContent(content) => canvas.add_content(content),
            Substitute::SaveGraphicsState => canvas.save_graphics_state(),
            Substitute::RestoreGraphicsState => canvas.restore_graphics_state(),
        }
    }
}

/// Rewrites `call` for the current `context`.
///
/// The canvas is only queried, for text widths and the current bounds; any
/// state that must outlive this call goes into `context`.
pub fn rewrite(
    session: &Session,
    call: &Call,
    context: &mut InterpreterContext,
    canvas: &dyn Canvas,
) -> Result<Rewrite, RenderingError> {
    match call.operation {
        Operation::RelativeDrawText => {
            let mut arguments = call.arguments.clone();

            if let Some(x) = context.relative_text_position {
                let options = arguments.options.get_or_insert_with(Options::new);
                let at = options.at().unwrap_or_default();
                options.set_at(Point::new(x, at.y));
            }

            rewrite_draw_text(arguments, context, canvas)
        }

        Operation::DrawText => rewrite_draw_text(call.arguments.clone(), context, canvas),

        Operation::TextGroup => {
            context.relative_text_position = None;
            Ok(Rewrite::Suppress(None))
        }

        Operation::TransformationMatrix => {
            match absolute_transformation_matrix(&call.arguments, canvas.bounds()) {
                Some(arguments) => Ok(Rewrite::Proceed(Call::new(call.operation, arguments))),
                None => {
                    svgreplay_log!(
                        session,
                        "transformation_matrix expects six numbers, passing {} through uncorrected",
                        call.arguments
                    );
                    Ok(Rewrite::Proceed(call.clone()))
                }
            }
        }

        Operation::Clip => Ok(Rewrite::Suppress(Some(Substitute::AddContent(
            CLIP_AND_DISCARD,
        )))),

        Operation::Save => Ok(Rewrite::Suppress(Some(Substitute::SaveGraphicsState))),

        Operation::Restore => Ok(Rewrite::Suppress(Some(Substitute::RestoreGraphicsState))),

        _ => Ok(Rewrite::Proceed(call.clone())),
    }
}

/// Turns a text call into a plain, left-anchored `draw_text`, and moves the
/// text cursor past it.
fn rewrite_draw_text(
    mut arguments: Arguments,
    context: &mut InterpreterContext,
    canvas: &dyn Canvas,
) -> Result<Rewrite, RenderingError> {
    let text = arguments
        .values
        .first()
        .and_then(Value::as_text)
        .ok_or_else(|| {
            RenderingError::invalid_arguments(Operation::DrawText, "the first argument must be the text")
        })?
        .to_string();

    let mut options = arguments.options.take().unwrap_or_default();
    let mut at = options.at().unwrap_or_default();

    let width = canvas.width_of(&text, &options.clone().with(KERNING, true))?;

    // a centered run only extends half its width past the anchor
    let advance = match options.text_anchor() {
        Some("middle") => width / 2.0,
        _ => width,
    };

    if matches!(options.text_anchor(), Some("middle" | "end")) {
        at.x -= advance;
    }

    options.remove(TEXT_ANCHOR);
    options.set_at(at);

    let space_width = canvas.width_of(SPACE_EQUIVALENT, &options)?;
    context.relative_text_position = Some(at.x + advance + space_width);

    arguments.options = Some(options);
    Ok(Rewrite::Proceed(Call::new(Operation::DrawText, arguments)))
}

/// Moves the translation of a frame-relative matrix into page coordinates.
///
/// The matrix `[a b c d e f]` is meant to apply around the origin of the
/// current frame, whose top-left corner is at `(left, top)` on the page.
/// Returns `None` if the arguments are not six numbers.
pub fn absolute_transformation_matrix(arguments: &Arguments, bounds: Bounds) -> Option<Arguments> {
    let m = arguments.as_numbers()?;
    let [a, b, c, d, e, f]: [f64; 6] = m.try_into().ok()?;

    let left = bounds.absolute_left;
    let top = bounds.absolute_top;

    let e = e + left - (left * a + top * c);
    let f = f + top - (left * b + top * d);

    Some(Arguments {
        values: [a, b, c, d, e, f].into_iter().map(Value::Number).collect(),
        options: arguments.options.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_tree::{AT, SIZE};
    use crate::recording::RecordingCanvas;
    use float_cmp::approx_eq;
    use matches::assert_matches;

    fn session() -> Session {
        Session::new_for_test_suite(false)
    }

    fn text_call(op: Operation, text: &str, options: Options) -> Call {
        Call::new(op, Arguments::text(text, options))
    }

    fn proceed(r: Rewrite) -> Call {
        match r {
            Rewrite::Proceed(call) => call,
            Rewrite::Suppress(s) => panic!("expected the call to proceed, got Suppress({s:?})"),
        }
    }

    #[test]
    fn identity_matrix_keeps_its_translation() {
        let args = Arguments::numbers(&[1.0, 0.0, 0.0, 1.0, 5.0, 5.0]);
        let bounds = Bounds::new(10.0, 20.0, 100.0, 100.0);

        assert_eq!(
            absolute_transformation_matrix(&args, bounds),
            Some(Arguments::numbers(&[1.0, 0.0, 0.0, 1.0, 5.0, 5.0]))
        );
    }

    #[test]
    fn scaling_matrix_shifts_translation() {
        let args = Arguments::numbers(&[2.0, 0.0, 0.0, 3.0, 5.0, 5.0]);
        let bounds = Bounds::new(10.0, 20.0, 100.0, 100.0);

        // e' = 5 + 10 - (10 * 2 + 20 * 0), f' = 5 + 20 - (10 * 0 + 20 * 3)
        assert_eq!(
            absolute_transformation_matrix(&args, bounds),
            Some(Arguments::numbers(&[2.0, 0.0, 0.0, 3.0, -5.0, -35.0]))
        );
    }

    #[test]
    fn rotation_matrix_uses_all_linear_components() {
        let args = Arguments::numbers(&[0.0, 1.0, -1.0, 0.0, 0.0, 0.0]);
        let bounds = Bounds::new(10.0, 20.0, 100.0, 100.0);

        // e' = 0 + 10 - (0 + 20 * -1) = 30, f' = 0 + 20 - (10 * 1 + 0) = 10
        let corrected = absolute_transformation_matrix(&args, bounds)
            .unwrap()
            .as_numbers()
            .unwrap();
        assert!(approx_eq!(f64, corrected[4], 30.0));
        assert!(approx_eq!(f64, corrected[5], 10.0));
    }

    #[test]
    fn malformed_matrix_is_passed_through() {
        let canvas = RecordingCanvas::new(100.0, 100.0);
        let mut context = InterpreterContext::new();
        let call = Call::new(
            Operation::TransformationMatrix,
            Arguments::numbers(&[1.0, 0.0, 0.0]),
        );

        assert_eq!(
            rewrite(&session(), &call, &mut context, &canvas).unwrap(),
            Rewrite::Proceed(call)
        );
    }

    #[test]
    fn clip_save_and_restore_are_suppressed() {
        let canvas = RecordingCanvas::new(100.0, 100.0);
        let mut context = InterpreterContext::new();

        let r = |op| {
            rewrite(
                &session(),
                &Call::new(op, Arguments::none()),
                &mut InterpreterContext::new(),
                &canvas,
            )
            .unwrap()
        };

        assert_eq!(
            r(Operation::Clip),
            Rewrite::Suppress(Some(Substitute::AddContent("W n")))
        );
        assert_eq!(
            r(Operation::Save),
            Rewrite::Suppress(Some(Substitute::SaveGraphicsState))
        );
        assert_eq!(
            r(Operation::Restore),
            Rewrite::Suppress(Some(Substitute::RestoreGraphicsState))
        );

        context.relative_text_position = Some(42.0);
        assert_eq!(
            rewrite(
                &session(),
                &Call::new(Operation::TextGroup, Arguments::none()),
                &mut context,
                &canvas
            )
            .unwrap(),
            Rewrite::Suppress(None)
        );
        assert_eq!(context.relative_text_position, None);
    }

    #[test]
    fn other_calls_proceed_unchanged() {
        let canvas = RecordingCanvas::new(100.0, 100.0);
        let call = Call::new(Operation::LineTo, Arguments::numbers(&[1.0, 2.0]));

        assert_eq!(
            rewrite(&session(), &call, &mut InterpreterContext::new(), &canvas).unwrap(),
            Rewrite::Proceed(call)
        );
    }

    #[test]
    fn draw_text_sets_the_text_cursor() {
        // 10 units per character
        let canvas = RecordingCanvas::new(100.0, 100.0).with_advance(1.0);
        let mut context = InterpreterContext::new();
        let options = Options::new()
            .with(AT, Point::new(3.0, 4.0))
            .with(SIZE, 10.0);

        let call = proceed(
            rewrite(
                &session(),
                &text_call(Operation::DrawText, "AB", options.clone()),
                &mut context,
                &canvas,
            )
            .unwrap(),
        );

        assert_eq!(call, text_call(Operation::DrawText, "AB", options));
        assert_eq!(context.relative_text_position, Some(3.0 + 20.0 + 10.0));
    }

    #[test]
    fn relative_draw_text_continues_at_the_cursor() {
        let canvas = RecordingCanvas::new(100.0, 100.0).with_advance(1.0);
        let mut context = InterpreterContext {
            relative_text_position: Some(50.0),
        };

        let call = proceed(
            rewrite(
                &session(),
                &text_call(
                    Operation::RelativeDrawText,
                    "CD",
                    Options::new().with(AT, Point::new(0.0, 7.0)).with(SIZE, 10.0),
                ),
                &mut context,
                &canvas,
            )
            .unwrap(),
        );

        assert_eq!(call.operation, Operation::DrawText);
        assert_eq!(
            call.arguments.options.as_ref().unwrap().at(),
            Some(Point::new(50.0, 7.0))
        );
        assert_eq!(context.relative_text_position, Some(50.0 + 20.0 + 10.0));
    }

    #[test]
    fn relative_draw_text_without_cursor_keeps_its_position() {
        let canvas = RecordingCanvas::new(100.0, 100.0);
        let mut context = InterpreterContext::new();
        let options = Options::new().with(AT, Point::new(12.0, 7.0));

        let call = proceed(
            rewrite(
                &session(),
                &text_call(Operation::RelativeDrawText, "x", options.clone()),
                &mut context,
                &canvas,
            )
            .unwrap(),
        );

        assert_eq!(call, text_call(Operation::DrawText, "x", options));
    }

    #[test]
    fn anchors_are_resolved_to_left_aligned_text() {
        let canvas = RecordingCanvas::new(100.0, 100.0).with_advance(1.0);

        for (anchor, x, cursor) in [
            ("start", 100.0, 100.0 + 40.0 + 10.0),
            ("middle", 80.0, 80.0 + 20.0 + 10.0),
            ("end", 60.0, 60.0 + 40.0 + 10.0),
        ] {
            let mut context = InterpreterContext::new();
            let call = proceed(
                rewrite(
                    &session(),
                    &text_call(
                        Operation::DrawText,
                        "abcd",
                        Options::new()
                            .with(AT, Point::new(100.0, 0.0))
                            .with(SIZE, 10.0)
                            .with(TEXT_ANCHOR, anchor),
                    ),
                    &mut context,
                    &canvas,
                )
                .unwrap(),
            );

            let options = call.arguments.options.unwrap();
            assert!(!options.contains_key(TEXT_ANCHOR));
            assert_eq!(options.at(), Some(Point::new(x, 0.0)), "anchor {anchor}");
            assert_eq!(context.relative_text_position, Some(cursor), "anchor {anchor}");
        }
    }

    #[test]
    fn text_is_measured_with_kerning_and_the_space_without() {
        let canvas = RecordingCanvas::new(100.0, 100.0);
        let options = Options::new()
            .with(AT, Point::new(10.0, 0.0))
            .with(SIZE, 10.0)
            .with(TEXT_ANCHOR, "end");

        rewrite(
            &session(),
            &text_call(Operation::DrawText, "abcd", options),
            &mut InterpreterContext::new(),
            &canvas,
        )
        .unwrap();

        // the space is measured at the final, left-anchored position
        let placed = Options::new()
            .with(AT, Point::new(-10.0, 0.0))
            .with(SIZE, 10.0);

        assert_eq!(
            canvas.measurements(),
            vec![
                (
                    "abcd".to_string(),
                    Options::new()
                        .with(AT, Point::new(10.0, 0.0))
                        .with(KERNING, true)
                        .with(SIZE, 10.0)
                        .with(TEXT_ANCHOR, "end"),
                ),
                ("n".to_string(), placed),
            ]
        );
    }

    #[test]
    fn middle_anchor_advances_the_cursor_by_half_the_width() {
        let canvas = RecordingCanvas::new(100.0, 100.0).with_advance(1.0);
        let mut context = InterpreterContext::new();

        let centered = proceed(
            rewrite(
                &session(),
                &text_call(
                    Operation::DrawText,
                    "abcd",
                    Options::new()
                        .with(AT, Point::new(100.0, 0.0))
                        .with(SIZE, 10.0)
                        .with(TEXT_ANCHOR, "middle"),
                ),
                &mut context,
                &canvas,
            )
            .unwrap(),
        );
        let next = proceed(
            rewrite(
                &session(),
                &text_call(
                    Operation::RelativeDrawText,
                    "x",
                    Options::new().with(SIZE, 10.0),
                ),
                &mut context,
                &canvas,
            )
            .unwrap(),
        );

        assert_eq!(
            centered.arguments.options.unwrap().at(),
            Some(Point::new(80.0, 0.0))
        );
        assert_eq!(
            next.arguments.options.unwrap().at(),
            Some(Point::new(110.0, 0.0))
        );
    }

    #[test]
    fn text_without_position_starts_at_the_origin() {
        let canvas = RecordingCanvas::new(100.0, 100.0);
        let call = proceed(
            rewrite(
                &session(),
                &text_call(Operation::DrawText, "x", Options::new()),
                &mut InterpreterContext::new(),
                &canvas,
            )
            .unwrap(),
        );

        assert_eq!(
            call.arguments.options.unwrap().at(),
            Some(Point::new(0.0, 0.0))
        );
    }

    #[test]
    fn draw_text_without_text_is_an_error() {
        let canvas = RecordingCanvas::new(100.0, 100.0);
        let r = rewrite(
            &session(),
            &Call::new(Operation::DrawText, Arguments::numbers(&[1.0])),
            &mut InterpreterContext::new(),
            &canvas,
        );

        assert_matches!(r, Err(RenderingError::InvalidArguments { .. }));
    }
}
