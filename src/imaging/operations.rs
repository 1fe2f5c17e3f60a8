//! High-level image operations.
//!
//! These functions combine parameter planning with backend execution.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Quality, ResizeParams, THUMBNAIL_GEOMETRY};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Plan a thumbnail resize without executing it.
///
/// The codec is taken from the source's extension; a source with no
/// extension plans an empty codec, which every backend rejects.
pub fn plan_thumbnail(source: &Path, output: &Path) -> ResizeParams {
    let format_extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string();

    ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        bounds: THUMBNAIL_GEOMETRY,
        format_extension,
        quality: Quality::default(),
    }
}

/// Create a 160x240 fit-within thumbnail of `source` at `output`.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
) -> Result<Dimensions> {
    let params = plan_thumbnail(source, output);
    backend.resize(&params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(1920, 1080);
        let dims = get_dimensions(&backend, Path::new("/test.jpg")).unwrap();
        assert_eq!(dims, (1920, 1080));
    }

    #[test]
    fn plan_thumbnail_uses_source_extension_as_codec() {
        let params = plan_thumbnail(Path::new("/site/images/foo.PNG"), Path::new("/tmp/x"));
        assert_eq!(params.format_extension, "PNG");
        assert_eq!(params.bounds, THUMBNAIL_GEOMETRY);
        assert_eq!(params.output, Path::new("/tmp/x"));
    }

    #[test]
    fn plan_thumbnail_without_extension() {
        let params = plan_thumbnail(Path::new("/site/images/README"), Path::new("/tmp/x"));
        assert_eq!(params.format_extension, "");
    }

    #[test]
    fn create_thumbnail_uses_backend() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("foo_t.jpg");
        let backend = MockBackend::with_dimensions(1000, 2000);

        let dims = create_thumbnail(&backend, Path::new("/images/foo.jpg"), &output).unwrap();
        assert_eq!(dims, Dimensions { width: 120, height: 240 });

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize { source, format, .. }
                if source == "/images/foo.jpg" && format == "jpg"
        ));
    }
}
