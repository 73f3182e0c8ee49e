//! Replays a call tree onto a canvas.
//!
//! The walk is depth-first and left to right.  Each call is first offered to
//! [`rewrite`]; calls that survive are issued to the canvas, and calls with
//! children hand the canvas a [`Block`](crate::canvas::Block) that interprets
//! the children when the canvas runs it.  The canvas is a content stream, so
//! the order of side effects is the output: nothing here is reordered, retried
//! or rolled back, and the first error stops the walk.

use crate::call_tree::{CallNode, Operation};
use crate::canvas::Canvas;
use crate::error::RenderingError;
use crate::rewrite::{rewrite, InterpreterContext, Rewrite, END_PATH};
use crate::session::Session;
use crate::svgreplay_log;

/// Walks call trees for one replay, carrying the pending text cursor between siblings.
pub struct Interpreter<'s> {
    session: &'s Session,
    context: InterpreterContext,
}

impl<'s> Interpreter<'s> {
    pub fn new(session: &'s Session) -> Interpreter<'s> {
        Interpreter {
            session,
            context: InterpreterContext::new(),
        }
    }

    pub fn context(&self) -> &InterpreterContext {
        &self.context
    }

    /// Issues `calls`, in order, onto `canvas`.
    pub fn interpret(
        &mut self,
        canvas: &mut dyn Canvas,
        calls: &[CallNode],
    ) -> Result<(), RenderingError> {
        for node in calls {
            self.issue(canvas, node)?;
        }

        Ok(())
    }

    fn issue_children(
        &mut self,
        canvas: &mut dyn Canvas,
        node: &CallNode,
    ) -> Result<(), RenderingError> {
        for child in node.children() {
            self.issue(canvas, &child)?;
        }

        Ok(())
    }

    fn issue(&mut self, canvas: &mut dyn Canvas, node: &CallNode) -> Result<(), RenderingError> {
        let call = node.borrow();

        // Nested clips and paints must come before the path is terminated.
        if call.operation == Operation::EndPath {
            self.issue_children(canvas, node)?;
            return canvas.add_content(END_PATH);
        }

        match rewrite(self.session, &call, &mut self.context, &*canvas)? {
            Rewrite::Suppress(substitute) => {
                svgreplay_log!(self.session, "not issuing {}", call.operation);

                if let Some(substitute) = substitute {
                    substitute.apply(canvas)?;
                }

                self.issue_children(canvas, node)
            }

            Rewrite::Proceed(rewritten) => {
                if !node.has_children() {
                    if rewritten.operation.requires_block() {
                        svgreplay_log!(
                            self.session,
                            "skipping {} because it has nothing to wrap",
                            rewritten.operation
                        );
                        Ok(())
                    } else {
                        canvas.invoke(rewritten.operation, &rewritten.arguments, None)
                    }
                } else {
                    let mut block = |c: &mut dyn Canvas| self.issue_children(c, node);
                    canvas.invoke(rewritten.operation, &rewritten.arguments, Some(&mut block))
                }
            }
        }
    }
}
