//! Host build: runs the thumbnail tag over a site and delivers its output.
//!
//! This is deliberately minimal. It knows one tag and no layouts:
//!
//! 1. Walk the site source. Entries starting with `_` or `.` are skipped, as
//!    are the root `config.toml` and the destination directory.
//! 2. Page files (`.html`, `.htm`, `.md`, `.markdown`, `.txt`) have every
//!    `{% t ... %}` replaced by the tag output and are written to the same
//!    relative path under the destination. Pages render in parallel.
//! 3. Every other file is copied unchanged.
//! 4. Registered thumbnails are copied to `<destination>/<dest_dir>/<name>`.
//! 5. The staging area is cleaned up, once, after step 4.
//!
//! ```text
//! site/                          _site/
//! ├── config.toml                ├── index.html     (tags expanded)
//! ├── index.html        →        └── images/
//! └── images/                        ├── foo.png    (copied)
//!     └── foo.png                    └── foo_t.png  (thumbnail)
//! ```

use crate::config::{CONFIG_FILENAME, SiteConfig};
use crate::imaging::{self, ImageBackend};
use crate::liquid;
use crate::registry::{StaticFile, StaticFileRegistry};
use crate::staging::StagingArea;
use crate::tag::{
    RenderError, RenderResult, SiteContext, TagError, ThumbnailRequest, ThumbnailTag,
    resolve_request,
};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions of files whose text is scanned for tags.
const PAGE_EXTENSIONS: &[&str] = &["html", "htm", "md", "markdown", "txt"];

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("{}: {source}", path.display())]
    Page {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
}

/// One tag invocation as it ended up in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    pub filename: String,
    /// `None` when the tag rendered a thumbnail link.
    pub error: Option<TagError>,
}

/// A page written during the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// Path relative to the site source.
    pub path: PathBuf,
    pub tags: Vec<TagReport>,
}

/// What a build produced, for CLI output.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<PageReport>,
    /// Non-page files copied, relative to the site source.
    pub copied: Vec<PathBuf>,
    /// Thumbnails written, as absolute destination paths.
    pub thumbnails: Vec<PathBuf>,
}

impl BuildReport {
    pub fn tag_count(&self) -> usize {
        self.pages.iter().map(|p| p.tags.len()).sum()
    }

    pub fn tag_errors(&self) -> impl Iterator<Item = (&Path, &TagReport)> {
        self.pages.iter().flat_map(|p| {
            p.tags
                .iter()
                .filter(|t| t.error.is_some())
                .map(move |t| (p.path.as_path(), t))
        })
    }
}

/// Source entries split into pages and plain files, both relative to the
/// source root and sorted.
#[derive(Debug, Default)]
struct SourceTree {
    pages: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

fn is_page(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PAGE_EXTENSIONS.iter().any(|p| p.eq_ignore_ascii_case(ext)))
}

fn is_excluded_name(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// Walk `source`, leaving out `destination` wherever it is nested.
///
/// Both roots are canonicalized first, so a relative source and an absolute
/// destination (or either one spelled with `..`) still compare equal. A
/// destination that does not exist yet has nothing to exclude.
fn collect_source(source: &Path, destination: &Path) -> Result<SourceTree, BuildError> {
    let source = fs::canonicalize(source)?;
    let destination = fs::canonicalize(destination).ok();
    let mut tree = SourceTree::default();
    let walker = WalkDir::new(&source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(is_excluded_name(&entry.file_name().to_string_lossy())
                    || destination
                        .as_deref()
                        .is_some_and(|dest| entry.path().starts_with(dest)))
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&source)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| entry.path().to_path_buf());
        if relative == Path::new(CONFIG_FILENAME) {
            continue;
        }
        if is_page(&relative) {
            tree.pages.push(relative);
        } else {
            tree.files.push(relative);
        }
    }
    Ok(tree)
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn copy_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map(|_| ())
}

/// Expand the tags of one page and write it to the destination.
///
/// Thumbnails are registered in a page-local registry and returned, so the
/// caller can merge them in page order whatever thread rendered the page.
fn render_page<B: ImageBackend>(
    relative: &Path,
    destination: &Path,
    ctx: &SiteContext<'_, B>,
) -> Result<(PageReport, Vec<StaticFile>), BuildError> {
    let text = fs::read_to_string(ctx.source.join(relative))?;
    let page_registry = StaticFileRegistry::new();
    let page_ctx = SiteContext {
        source: ctx.source,
        config: ctx.config,
        backend: ctx.backend,
        staging: ctx.staging,
        registry: &page_registry,
    };
    let mut tags = Vec::new();

    let expanded = liquid::expand_tags(&text, |markup| {
        let tag = ThumbnailTag::new(markup);
        let result = tag.render(&page_ctx)?;
        tags.push(TagReport {
            filename: tag.filename().to_string(),
            error: match &result {
                RenderResult::Html(_) => None,
                RenderResult::Error(err) => Some(err.clone()),
            },
        });
        Ok(result.into_string())
    })
    .map_err(|source| BuildError::Page {
        path: relative.to_path_buf(),
        source,
    })?;

    write_file(&destination.join(relative), &expanded)?;
    log::debug!("rendered {} ({} tags)", relative.display(), tags.len());
    let report = PageReport {
        path: relative.to_path_buf(),
        tags,
    };
    Ok((report, page_registry.entries()))
}

/// Build the site at `source` into `destination`.
pub fn build(
    source: &Path,
    destination: &Path,
    config: &SiteConfig,
    backend: &impl ImageBackend,
) -> Result<BuildReport, BuildError> {
    if !source.is_dir() {
        return Err(BuildError::SourceNotFound(source.to_path_buf()));
    }
    let tree = collect_source(source, destination)?;
    log::info!(
        "building {} → {} ({} pages, {} files)",
        source.display(),
        destination.display(),
        tree.pages.len(),
        tree.files.len()
    );

    let staging = StagingArea::new()?;
    let registry = StaticFileRegistry::new();
    let ctx = SiteContext {
        source,
        config,
        backend,
        staging: &staging,
        registry: &registry,
    };

    fs::create_dir_all(destination)?;
    let rendered = tree
        .pages
        .par_iter()
        .map(|page| render_page(page, destination, &ctx))
        .collect::<Result<Vec<_>, _>>()?;

    // Registration follows page order, so same-named thumbnails resolve the
    // same way on every build: the last page wins.
    let mut pages = Vec::with_capacity(rendered.len());
    for (report, files) in rendered {
        for file in files {
            ctx.registry.push(file);
        }
        pages.push(report);
    }

    for file in &tree.files {
        copy_file(&source.join(file), &destination.join(file))?;
    }

    // Thumbnails last: they win over any same-named file in the source.
    let thumbnails = registry.copy_all(destination)?;
    staging.cleanup()?;

    Ok(BuildReport {
        pages,
        copied: tree.files,
        thumbnails,
    })
}

/// Render a single tag invocation against the site and deliver its thumbnail.
///
/// Returns the tag output and the thumbnail paths written under
/// `destination` (empty when the tag rendered an inline error).
pub fn render_one(
    source: &Path,
    destination: &Path,
    config: &SiteConfig,
    backend: &impl ImageBackend,
    markup: &str,
) -> Result<(RenderResult, Vec<PathBuf>), BuildError> {
    let staging = StagingArea::new()?;
    let registry = StaticFileRegistry::new();
    let ctx = SiteContext {
        source,
        config,
        backend,
        staging: &staging,
        registry: &registry,
    };

    let tag = ThumbnailTag::new(markup);
    let result = tag.render(&ctx).map_err(|source| BuildError::Page {
        path: PathBuf::from(tag.filename()),
        source,
    })?;
    let written = registry.copy_all(destination)?;
    staging.cleanup()?;
    Ok((result, written))
}

/// Result of checking one tag without generating anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCheck {
    /// The image exists and decodes; its dimensions.
    Ok { width: u32, height: u32 },
    /// The tag would render this inline error.
    Inline(TagError),
    /// The image exists but cannot be read; a build would abort here.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedTag {
    pub page: PathBuf,
    pub filename: String,
    pub status: TagCheck,
}

/// Validate every tag in the site without writing anything.
pub fn check(
    source: &Path,
    config: &SiteConfig,
    backend: &impl ImageBackend,
) -> Result<Vec<CheckedTag>, BuildError> {
    if !source.is_dir() {
        return Err(BuildError::SourceNotFound(source.to_path_buf()));
    }
    let destination = source.join(&config.destination);
    let tree = collect_source(source, &destination)?;

    let mut checked = Vec::new();
    for page in &tree.pages {
        let text = fs::read_to_string(source.join(page))?;
        for invocation in liquid::find_tags(&text) {
            let request = ThumbnailRequest::new(invocation.markup, config);
            let status = match resolve_request(&request, source, Path::is_file) {
                Err(err) => TagCheck::Inline(err),
                Ok(paths) => match imaging::get_dimensions(backend, &paths.source) {
                    Ok((width, height)) => TagCheck::Ok { width, height },
                    Err(err) => TagCheck::Unreadable(err.to_string()),
                },
            };
            checked.push(CheckedTag {
                page: page.clone(),
                filename: request.filename,
                status,
            });
        }
    }
    Ok(checked)
}
