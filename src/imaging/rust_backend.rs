//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF, WebP) | `image::ImageReader` |
//! | Fit-within dimensions | [`calculate_fit_dimensions`](super::calculations::calculate_fit_dimensions) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode | codec chosen from the source extension; JPEG via `JpegEncoder` with quality |
//!
//! The output codec always matches the source: a `.png` source produces a PNG
//! thumbnail, a `.jpg` source a JPEG one. No format conversion happens.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::ResizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Extensions the compiled-in codecs can both decode and encode.
const SUPPORTED_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

/// Map a file extension (without the dot, any case) to an output codec.
pub fn format_for_extension(ext: &str) -> Option<ImageFormat> {
    SUPPORTED_CANDIDATES
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
        .map(|(_, fmt)| *fmt)
        .filter(|fmt| fmt.reading_enabled() && fmt.writing_enabled())
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode `img` to `path` with an explicit codec.
///
/// The path usually has no extension (it is a staged temp file), so the
/// codec cannot be inferred from it.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    quality: u32,
) -> Result<(), BackendError> {
    let file = File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);

    let result = match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality as u8))
        }
        other => img.write_to(&mut writer, other),
    };
    result.map_err(|e| BackendError::ProcessingFailed(format!("{format:?} encode failed: {e}")))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError> {
        let format = format_for_extension(&params.format_extension)
            .ok_or_else(|| BackendError::UnsupportedFormat(params.format_extension.clone()))?;

        let img = load_image(&params.source)?;
        let (width, height) = calculate_fit_dimensions((img.width(), img.height()), params.bounds);
        let resized = img.resize_exact(width, height, FilterType::Lanczos3);

        save_image(&resized, &params.output, format, params.quality.value())?;
        Ok(Dimensions { width, height })
    }
}
