//! Tracks metadata for a rendering session.

use crate::log;

/// Metadata for a rendering session.
///
/// A [`Renderer`](crate::Renderer) creates one of these when it is built, and
/// hands it to the interpreter so that code deep in the tree walk can decide
/// whether to log without consulting the environment again.
#[derive(Debug, Clone)]
pub struct Session {
    log_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            log_enabled: log::log_enabled(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with logging forced on or off, regardless of the environment.
    pub fn new_for_test_suite(log_enabled: bool) -> Self {
        Self { log_enabled }
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled
    }
}
