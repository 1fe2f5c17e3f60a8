//! The `t` template tag: filename in, linked thumbnail out.
//!
//! ```text
//! {% t foo.png %}
//!   → <a class="image" href="/images/foo.png"><img src="/images/foo_t.png" /></a>
//! ```
//!
//! ## Flow
//!
//! ```text
//! Received ─┬─ Rejected ─────────────────────────→ "Image filename '…' contains invalid characters or sequences"
//!           └─ Validated ─┬─ NotFound ───────────→ "File … not found in …"
//!                         └─ Found ─→ Resized ───→ <a …><img … /></a>
//! ```
//!
//! Rejected and not-found invocations are not errors for the build: their
//! message is inlined into the page in place of the tag, and nothing touches
//! the filesystem beyond the existence check. A resize failure (corrupt or
//! unsupported source) is different: it is returned as a [`RenderError`] and
//! aborts the page.
//!
//! [`render`] holds the whole decision logic with the filesystem query and the
//! resize passed in as closures. [`ThumbnailTag::render`] wires in the real
//! collaborators from a [`SiteContext`].

use crate::config::SiteConfig;
use crate::filename;
use crate::imaging::{self, BackendError, ImageBackend};
use crate::paths::{ResolvedPaths, urlize};
use crate::registry::{StaticFile, StaticFileRegistry};
use crate::staging::StagingArea;
use maud::{PreEscaped, html};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name the tag is invoked by in page sources.
pub const TAG_NAME: &str = "t";

/// Inline failures. `Display` is the exact text placed in the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Image filename '{filename}' contains invalid characters or sequences")]
    InvalidFilename { filename: String },
    #[error("File {filename} not found in {directory}")]
    ImageNotFound { filename: String, directory: String },
}

/// Failures that abort the current page.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create thumbnail of {}: {source}", path.display())]
    ResizeFailed {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Failed to stage thumbnail {name}: {source}")]
    Staging {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Outcome of one tag invocation. Both variants render to page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    Html(String),
    Error(TagError),
}

impl RenderResult {
    pub fn is_html(&self) -> bool {
        matches!(self, RenderResult::Html(_))
    }

    /// Text that replaces the tag in the page.
    pub fn into_string(self) -> String {
        match self {
            RenderResult::Html(html) => html,
            RenderResult::Error(err) => err.to_string(),
        }
    }
}

impl std::fmt::Display for RenderResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderResult::Html(html) => f.write_str(html),
            RenderResult::Error(err) => write!(f, "{err}"),
        }
    }
}

/// One tag invocation: the trimmed filename plus the configuration it is
/// rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub filename: String,
    pub images_directory: String,
    pub css_class: String,
}

impl ThumbnailRequest {
    pub fn new(raw_filename: &str, config: &SiteConfig) -> Self {
        Self {
            filename: raw_filename.trim().to_string(),
            images_directory: config.images_directory.clone(),
            css_class: config.images_css_class.clone(),
        }
    }
}

/// Validate the request and resolve its paths, up to and including the
/// existence check.
///
/// `image_exists` is not called when the filename is rejected.
pub fn resolve_request(
    request: &ThumbnailRequest,
    site_source: &Path,
    image_exists: impl FnOnce(&Path) -> bool,
) -> Result<ResolvedPaths, TagError> {
    let filename =
        filename::validate(&request.filename).ok_or_else(|| TagError::InvalidFilename {
            filename: request.filename.clone(),
        })?;

    let paths = ResolvedPaths::resolve(site_source, &request.images_directory, &filename);
    if !image_exists(&paths.source) {
        return Err(TagError::ImageNotFound {
            filename: request.filename.clone(),
            directory: request.images_directory.clone(),
        });
    }
    Ok(paths)
}

/// Render a request.
///
/// `resize` runs only for a valid, existing image; it must produce the
/// thumbnail and register it. Its error is the only way this function fails.
pub fn render(
    request: &ThumbnailRequest,
    site_source: &Path,
    image_exists: impl FnOnce(&Path) -> bool,
    resize: impl FnOnce(&ResolvedPaths) -> Result<(), RenderError>,
) -> Result<RenderResult, RenderError> {
    let paths = match resolve_request(request, site_source, image_exists) {
        Ok(paths) => paths,
        Err(err) => return Ok(RenderResult::Error(err)),
    };

    resize(&paths)?;

    Ok(RenderResult::Html(thumbnail_link(
        &request.css_class,
        &urlize(&[&request.images_directory, &request.filename]),
        &urlize(&[&request.images_directory, &paths.thumbnail_name]),
    )))
}

/// `<a class="…" href="…"><img src="…" /></a>`
///
/// All three attribute values are written exactly as given, without HTML
/// escaping.
pub fn thumbnail_link(css_class: &str, href: &str, src: &str) -> String {
    // maud writes void elements as `<img …>`; the link keeps the ` />` form
    let img = format!(r#"<img src="{src}" />"#);
    html! {
        a class=(PreEscaped(css_class)) href=(PreEscaped(href)) { (PreEscaped(img)) }
    }
    .into_string()
}

/// Collaborators shared by every tag rendered during one build.
pub struct SiteContext<'a, B: ImageBackend> {
    /// Site source root.
    pub source: &'a Path,
    pub config: &'a SiteConfig,
    pub backend: &'a B,
    pub staging: &'a StagingArea,
    pub registry: &'a StaticFileRegistry,
}

/// A parsed `{% t ... %}` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailTag {
    filename: String,
}

impl ThumbnailTag {
    /// The whole tag markup is the filename, trimmed. Markup with inner
    /// whitespace is kept as-is and later fails validation.
    pub fn new(markup: &str) -> Self {
        Self {
            filename: markup.trim().to_string(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Render against a site: stage a thumbnail, register it, return the link.
    pub fn render<B: ImageBackend>(
        &self,
        ctx: &SiteContext<'_, B>,
    ) -> Result<RenderResult, RenderError> {
        let request = ThumbnailRequest::new(&self.filename, ctx.config);

        let result = render(&request, ctx.source, Path::is_file, |paths| {
            let staged = ctx
                .staging
                .stage(&paths.thumbnail_name)
                .map_err(|source| RenderError::Staging {
                    name: paths.thumbnail_name.clone(),
                    source,
                })?;

            let dims = imaging::create_thumbnail(ctx.backend, &paths.source, staged.path())
                .map_err(|source| RenderError::ResizeFailed {
                    path: paths.source.clone(),
                    source,
                })?;
            log::debug!(
                "thumbnail {} ({}x{} within {}) staged at {}",
                paths.thumbnail_name,
                dims.width,
                dims.height,
                imaging::THUMBNAIL_GEOMETRY,
                staged.path().display()
            );

            ctx.registry.push(StaticFile::new(
                staged.into_path(),
                paths.dest_dir.clone(),
                paths.thumbnail_name.clone(),
            ));
            Ok(())
        })?;

        if let RenderResult::Error(err) = &result {
            log::warn!("{{% {TAG_NAME} {} %}}: {err}", self.filename);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{TestSite, write_test_png};
    use std::cell::Cell;

    fn request(filename: &str) -> ThumbnailRequest {
        ThumbnailRequest::new(filename, &SiteConfig::default())
    }

    fn custom_config() -> SiteConfig {
        SiteConfig {
            images_directory: "assets".to_string(),
            images_css_class: "thumbnailify".to_string(),
            ..SiteConfig::default()
        }
    }

    // =========================================================================
    // render() with closure collaborators
    // =========================================================================

    #[test]
    fn render_existing_image_defaults() {
        let resized = Cell::new(false);
        let result = render(&request("foobar.png"), Path::new("/site"), |_| true, |paths| {
            assert_eq!(paths.source, Path::new("/site/images/foobar.png"));
            assert_eq!(paths.thumbnail_name, "foobar_t.png");
            resized.set(true);
            Ok(())
        })
        .unwrap();

        assert!(resized.get());
        assert_eq!(
            result,
            RenderResult::Html(
                r#"<a class="image" href="/images/foobar.png"><img src="/images/foobar_t.png" /></a>"#
                    .to_string()
            )
        );
    }

    #[test]
    fn render_custom_params() {
        let req = ThumbnailRequest::new("foobar.png", &custom_config());
        let result = render(&req, Path::new("/site"), |_| true, |_| Ok(())).unwrap();
        assert_eq!(
            result.into_string(),
            r#"<a class="thumbnailify" href="/assets/foobar.png"><img src="/assets/foobar_t.png" /></a>"#
        );
    }

    #[test]
    fn render_invalid_chars_does_not_touch_filesystem() {
        let result = render(
            &request("foo@bar.png"),
            Path::new("/site"),
            |_| panic!("existence must not be checked"),
            |_| panic!("resize must not run"),
        )
        .unwrap();

        assert_eq!(
            result.into_string(),
            "Image filename 'foo@bar.png' contains invalid characters or sequences"
        );
    }

    #[test]
    fn render_traversal_rejected() {
        let result = render(
            &request("../config.toml"),
            Path::new("/site"),
            |_| panic!("existence must not be checked"),
            |_| panic!("resize must not run"),
        )
        .unwrap();
        assert!(matches!(result, RenderResult::Error(TagError::InvalidFilename { .. })));
    }

    #[test]
    fn render_unknown_image() {
        let result = render(
            &request("foobaar.png"),
            Path::new("/site"),
            |_| false,
            |_| panic!("resize must not run"),
        )
        .unwrap();
        assert_eq!(result.into_string(), "File foobaar.png not found in images");
    }

    #[test]
    fn render_unknown_image_custom_directory() {
        let req = ThumbnailRequest::new("foobaar.png", &custom_config());
        let result = render(&req, Path::new("/site"), |_| false, |_| Ok(())).unwrap();
        assert_eq!(result.into_string(), "File foobaar.png not found in assets");
    }

    #[test]
    fn request_trims_whitespace() {
        let padded = render(&request("  foobar.png  "), Path::new("/s"), |_| true, |_| Ok(()));
        let plain = render(&request("foobar.png"), Path::new("/s"), |_| true, |_| Ok(()));
        assert_eq!(padded.unwrap(), plain.unwrap());
    }

    #[test]
    fn render_nested_filename_thumbnail_is_flat() {
        let result = render(&request("posts/foo.jpg"), Path::new("/s"), |_| true, |_| Ok(()));
        assert_eq!(
            result.unwrap().into_string(),
            r#"<a class="image" href="/images/posts/foo.jpg"><img src="/images/foo_t.jpg" /></a>"#
        );
    }

    #[test]
    fn render_propagates_resize_failure() {
        let result = render(&request("foobar.png"), Path::new("/s"), |_| true, |paths| {
            Err(RenderError::ResizeFailed {
                path: paths.source.clone(),
                source: BackendError::ProcessingFailed("corrupt".into()),
            })
        });
        assert!(matches!(result, Err(RenderError::ResizeFailed { .. })));
    }

    #[test]
    fn thumbnail_link_writes_attributes_literally() {
        let html = thumbnail_link("x&y", "/a&b/foobar.png", "/a&b/foobar_t.png");
        assert_eq!(
            html,
            r#"<a class="x&y" href="/a&b/foobar.png"><img src="/a&b/foobar_t.png" /></a>"#
        );
    }

    #[test]
    fn render_ampersand_directory_and_class_stay_literal() {
        let config = SiteConfig {
            images_directory: "a&b".to_string(),
            images_css_class: "x&y".to_string(),
            ..SiteConfig::default()
        };
        let req = ThumbnailRequest::new("foobar.png", &config);
        let result = render(&req, Path::new("/site"), |_| true, |_| Ok(())).unwrap();
        assert_eq!(
            result.into_string(),
            r#"<a class="x&y" href="/a&b/foobar.png"><img src="/a&b/foobar_t.png" /></a>"#
        );
    }

    #[test]
    fn tag_new_trims_markup() {
        assert_eq!(ThumbnailTag::new("    foobar.png       ").filename(), "foobar.png");
    }

    // =========================================================================
    // ThumbnailTag::render against a site on disk
    // =========================================================================

    #[test]
    fn tag_render_registers_staged_thumbnail() {
        let site = TestSite::new(SiteConfig::default());
        write_test_png(&site.image_path("foobar.png"), 320, 480);
        let backend = MockBackend::new();

        let result = ThumbnailTag::new("foobar.png")
            .render(&site.context(&backend))
            .unwrap();

        assert_eq!(
            result.into_string(),
            r#"<a class="image" href="/images/foobar.png"><img src="/images/foobar_t.png" /></a>"#
        );
        let files = site.registry.entries();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].dest_dir, "images");
        assert_eq!(files[0].dest_name, "foobar_t.png");
        assert!(files[0].path().starts_with(site.staging.path()));
        assert!(
            files[0]
                .path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("foobar_t.png")
        );
        assert!(files[0].path().exists());

        let ops = backend.get_operations();
        assert!(matches!(
            &ops[..],
            [RecordedOp::Resize { format, width: 160, height: 240, .. }] if format == "png"
        ));
    }

    #[test]
    fn tag_render_invalid_registers_nothing() {
        let site = TestSite::new(SiteConfig::default());
        let backend = MockBackend::new();

        let result = ThumbnailTag::new("foo@bar.png")
            .render(&site.context(&backend))
            .unwrap();

        assert!(!result.is_html());
        assert!(site.registry.is_empty());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn tag_render_missing_registers_nothing() {
        let site = TestSite::new(SiteConfig::default());
        let backend = MockBackend::new();

        let result = ThumbnailTag::new("foobaar.png")
            .render(&site.context(&backend))
            .unwrap();

        assert_eq!(result.into_string(), "File foobaar.png not found in images");
        assert!(site.registry.is_empty());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn tag_render_directory_is_not_an_image() {
        let site = TestSite::new(SiteConfig::default());
        std::fs::create_dir_all(site.image_path("album")).unwrap();
        let backend = MockBackend::new();

        let result = ThumbnailTag::new("album")
            .render(&site.context(&backend))
            .unwrap();
        assert_eq!(result.into_string(), "File album not found in images");
    }

    #[test]
    fn tag_render_resize_failure_is_fatal_and_registers_nothing() {
        let site = TestSite::new(SiteConfig::default());
        write_test_png(&site.image_path("foobar.png"), 10, 10);
        let backend = MockBackend::failing("corrupt image");

        let result = ThumbnailTag::new("foobar.png").render(&site.context(&backend));

        match result {
            Err(RenderError::ResizeFailed { path, .. }) => {
                assert_eq!(path, site.image_path("foobar.png"));
            }
            other => panic!("expected ResizeFailed, got {other:?}"),
        }
        assert!(site.registry.is_empty());
    }

    #[test]
    fn tag_render_same_image_twice_stages_two_files() {
        let site = TestSite::new(SiteConfig::default());
        write_test_png(&site.image_path("foobar.png"), 32, 32);
        let backend = MockBackend::new();
        let ctx = site.context(&backend);

        ThumbnailTag::new("foobar.png").render(&ctx).unwrap();
        ThumbnailTag::new("foobar.png").render(&ctx).unwrap();

        let files = site.registry.entries();
        assert_eq!(files.len(), 2);
        assert_ne!(files[0].source, files[1].source);
    }
}
