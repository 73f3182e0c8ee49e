//! Where to look for font files.
//!
//! The renderer does no font discovery of its own; it only carries a list of
//! directories to the canvas.  [`FontPaths::probe_default`] is a bootstrap
//! helper that collects the usual system font directories which exist on this
//! machine, for callers that have no better idea.

use std::env;
use std::path::{Path, PathBuf};

/// Directories searched by [`FontPaths::probe_default`], besides `~/Library/Fonts`.
const WELL_KNOWN_FONT_DIRS: &[&str] = &[
    "/Library/Fonts",
    "/System/Library/Fonts",
    "/usr/share/fonts/truetype",
];

/// An ordered list of font directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontPaths {
    paths: Vec<PathBuf>,
}

impl FontPaths {
    pub fn new() -> FontPaths {
        FontPaths::default()
    }

    /// Collects the well-known font directories that exist.
    pub fn probe_default() -> FontPaths {
        let mut candidates: Vec<PathBuf> = WELL_KNOWN_FONT_DIRS.iter().map(PathBuf::from).collect();

        if let Some(home) = env::var_os("HOME") {
            // keep the user's fonts after the system-wide Mac directories
            candidates.insert(2, Path::new(&home).join("Library/Fonts"));
        }

        FontPaths::probe(candidates)
    }

    /// Keeps those of `candidates` that are existing directories, in order.
    pub fn probe<I, P>(candidates: I) -> FontPaths
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        FontPaths {
            paths: candidates
                .into_iter()
                .map(P::into)
                .filter(|p| p.is_dir())
                .collect(),
        }
    }

    #[must_use]
    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> FontPaths {
        self.paths.push(path.into());
        self
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
