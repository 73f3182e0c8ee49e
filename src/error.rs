//! Error types.

use std::error;
use std::fmt;

use crate::call_tree::Operation;

/// Errors found while validating the options for a render, before anything is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No output anchor position was supplied.
    MissingPosition,

    /// A requested output width or height was negative, zero or not finite.
    InvalidSize(String),
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigError::MissingPosition => write!(f, "an output position (at) must be specified"),
            ConfigError::InvalidSize(ref s) => write!(f, "invalid output size: {s}"),
        }
    }
}

/// Errors that can happen while replaying a call tree onto a canvas.
///
/// The interpreter never recovers from any of these; the first one aborts the
/// rest of the tree walk, and whatever was already issued to the canvas stays there.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderingError {
    /// An error raised by the canvas implementation.
    Canvas(String),

    /// A call reached the canvas with arguments it could not use.
    InvalidArguments {
        operation: Operation,
        reason: String,
    },

    /// The render was misconfigured.
    Config(ConfigError),
}

impl RenderingError {
    pub fn invalid_arguments(operation: Operation, reason: &str) -> RenderingError {
        RenderingError::InvalidArguments {
            operation,
            reason: reason.to_string(),
        }
    }
}

impl error::Error for RenderingError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            RenderingError::Config(ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RenderingError::Canvas(ref s) => write!(f, "canvas error: {s}"),
            RenderingError::InvalidArguments {
                ref operation,
                ref reason,
            } => write!(f, "invalid arguments for {operation}: {reason}"),
            RenderingError::Config(ref e) => write!(f, "configuration error: {e}"),
        }
    }
}

impl From<ConfigError> for RenderingError {
    fn from(e: ConfigError) -> RenderingError {
        RenderingError::Config(e)
    }
}

/// Returned when no recognizable color notation occurs anywhere in a color descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    NoColorFound(String),
}

impl error::Error for ColorError {}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ColorError::NoColorFound(ref s) => write!(f, "no color found in {s:?}"),
        }
    }
}

/// Error returned when a string is not the name of a known operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl error::Error for UnknownOperation {}

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation {:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_is_the_source_of_rendering_error() {
        let e = RenderingError::from(ConfigError::MissingPosition);
        assert_eq!(e, RenderingError::Config(ConfigError::MissingPosition));

        let source = error::Error::source(&e).unwrap();
        assert_eq!(
            source.to_string(),
            "an output position (at) must be specified"
        );
    }

    #[test]
    fn formats_invalid_arguments() {
        let e = RenderingError::invalid_arguments(Operation::DrawText, "missing text");
        assert_eq!(e.to_string(), "invalid arguments for draw_text: missing text");
    }
}
