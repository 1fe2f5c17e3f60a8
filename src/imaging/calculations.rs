//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Geometry;

/// Calculate the largest size that fits inside `bounds` while keeping the
/// source aspect ratio.
///
/// This is the default `WIDTHxHEIGHT` resize of ImageMagick-style tools: no
/// cropping, no distortion, and smaller sources are scaled up until one edge
/// touches the box. Neither edge is ever rounded down to zero.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Bounding box to fit into
///
/// # Returns
/// * `(width, height)` - Fitted dimensions (at least one matches `bounds`)
///
/// # Examples
/// ```
/// # use thumbnailify::imaging::{Geometry, calculate_fit_dimensions};
/// let bounds = Geometry { width: 160, height: 240 };
/// // Landscape: width is the constraint
/// assert_eq!(calculate_fit_dimensions((800, 600), bounds), (160, 120));
/// // Tall portrait: height is the constraint
/// assert_eq!(calculate_fit_dimensions((600, 1200), bounds), (120, 240));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: Geometry) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return (bounds.width.min(src_w.max(1)), bounds.height.min(src_h.max(1)));
    }

    let scale_w = bounds.width as f64 / src_w as f64;
    let scale_h = bounds.height as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the constraint
        let h = (src_h as f64 * scale_w).round().max(1.0) as u32;
        (bounds.width, h.min(bounds.height))
    } else {
        // Height is the constraint
        let w = (src_w as f64 * scale_h).round().max(1.0) as u32;
        (w.min(bounds.width), bounds.height)
    }
}
