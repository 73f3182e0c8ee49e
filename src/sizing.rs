//! Output size of a rendered document.

use float_cmp::approx_eq;

use crate::error::ConfigError;

/// The size of the box that a document is drawn into, in canvas units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sizing {
    pub output_width: f64,
    pub output_height: f64,
}

impl Sizing {
    pub fn new(output_width: f64, output_height: f64) -> Sizing {
        Sizing {
            output_width,
            output_height,
        }
    }

    /// Computes the output size for a document of `document_width` by `document_height`.
    ///
    /// A requested width wins over a requested height; the other dimension
    /// follows the document's aspect ratio.  With neither, the document is
    /// drawn at its own size.
    pub fn resolve(
        document_width: f64,
        document_height: f64,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Result<Sizing, ConfigError> {
        check_dimension("document width", document_width)?;
        check_dimension("document height", document_height)?;

        match (width, height) {
            (Some(w), _) => {
                check_dimension("width", w)?;
                Ok(Sizing::new(w, document_height * w / document_width))
            }

            (None, Some(h)) => {
                check_dimension("height", h)?;
                Ok(Sizing::new(document_width * h / document_height, h))
            }

            (None, None) => Ok(Sizing::new(document_width, document_height)),
        }
    }
}

fn check_dimension(what: &str, v: f64) -> Result<(), ConfigError> {
    if !v.is_finite() || v < 0.0 || approx_eq!(f64, v, 0.0) {
        Err(ConfigError::InvalidSize(format!(
            "{what} must be a positive number, got {v}"
        )))
    } else {
        Ok(())
    }
}
