//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the [`operations`](super::operations) module (which decides what thumbnail
//! to create and where) and the [`backend`](super::backend) (which does the
//! pixel work), so a mock backend can stand in during tests.
//!
//! ## Types
//!
//! - [`Geometry`]: A `WIDTHxHEIGHT` bounding box, displayed as `"160x240"`.
//! - [`Quality`]: Lossy encoding quality (1–100, default 90).
//! - [`ResizeParams`]: Source, output path, bounding box, output codec, quality.

use std::fmt;
use std::path::PathBuf;

/// Bounding box every thumbnail is fitted into.
pub const THUMBNAIL_GEOMETRY: Geometry = Geometry {
    width: 160,
    height: 240,
};

/// A `WIDTHxHEIGHT` bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a fit-within resize.
///
/// `output` is usually a staged temp file without a meaningful extension,
/// so the codec is carried separately in `format_extension` (the source
/// image's extension, without the dot).
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bounds: Geometry,
    pub format_extension: String,
    pub quality: Quality,
}
