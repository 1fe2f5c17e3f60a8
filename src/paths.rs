//! Path resolution, thumbnail naming, and URL building.
//!
//! Given a validated filename and the configured images directory:
//!
//! ```text
//! filename           posts/foo.png
//! source path        <site source>/images/posts/foo.png
//! thumbnail name     foo_t.png            (stem of the last component)
//! destination dir    images
//! image url          /images/posts/foo.png
//! thumbnail url      /images/foo_t.png
//! ```
//!
//! The thumbnail is named after the last path component only, so nested
//! filenames land flat in the images directory. Two images with the same
//! name in different subdirectories therefore share a thumbnail name.

use crate::filename::ImageFilename;
use std::path::{Path, PathBuf};

/// Suffix inserted between the stem and the extension of a thumbnail.
pub const THUMBNAIL_SUFFIX: &str = "_t";

/// Everything derived from one request before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Absolute path of the source image.
    pub source: PathBuf,
    /// Filename of the generated thumbnail, extension included.
    pub thumbnail_name: String,
    /// Directory (relative to the site destination) the thumbnail is copied to.
    pub dest_dir: String,
}

impl ResolvedPaths {
    /// Resolve `filename` under `site_source/images_directory`.
    pub fn resolve(site_source: &Path, images_directory: &str, filename: &ImageFilename) -> Self {
        Self {
            source: join_under(site_source, &[images_directory, filename.as_str()]),
            thumbnail_name: thumbnail_name(filename.as_str()),
            dest_dir: images_directory.to_string(),
        }
    }
}

/// Join segments onto `base` textually, the way a shell would concatenate
/// them with `/`.
///
/// `Path::join` replaces the base when a segment is absolute; a filename
/// like `/etc/passwd` must instead stay inside the images directory, so
/// leading separators are stripped from every segment first.
fn join_under(base: &Path, segments: &[&str]) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in segments {
        let relative = segment.trim_start_matches(['/', '\\']);
        if !relative.is_empty() {
            path.push(relative);
        }
    }
    path
}

/// Split a filename into `(stem, extension)`, where the extension keeps its
/// leading dot.
///
/// Only the last path component is considered. Leading dots never start an
/// extension (`.hidden` and `..png` have none, `.hidden.png` has `.png`), and
/// a trailing dot is an empty one (`foo.` → `("foo", ".")`).
pub fn split_extension(filename: &str) -> (&str, &str) {
    let base = filename
        .rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or("");
    let leading_dots = base.len() - base.trim_start_matches('.').len();
    match base[leading_dots..].rfind('.') {
        None => (base, ""),
        Some(dot) => base.split_at(leading_dots + dot),
    }
}

/// `foo.png` → `foo_t.png`, `dir/foo.jpg` → `foo_t.jpg`.
pub fn thumbnail_name(filename: &str) -> String {
    let (stem, ext) = split_extension(filename);
    format!("{stem}{THUMBNAIL_SUFFIX}{ext}")
}

/// Build a site URL path from segments.
///
/// Segments are joined with `/`, backslashes become `/`, and the result
/// starts with exactly one `/`.
///
/// ```
/// # use thumbnailify::paths::urlize;
/// assert_eq!(urlize(&["images", "foo.png"]), "/images/foo.png");
/// assert_eq!(urlize(&["assets\\posts", "foo.png"]), "/assets/posts/foo.png");
/// ```
pub fn urlize(segments: &[&str]) -> String {
    let joined = segments.join("/").replace('\\', "/");
    format!("/{}", joined.trim_start_matches('/'))
}
