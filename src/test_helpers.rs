//! Shared test utilities for the thumbnailify test suite.
//!
//! Provides synthetic image writers and a throwaway site with its build-wide
//! collaborators (staging area, registry) already wired up.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let site = TestSite::new(SiteConfig::default());
//! write_test_png(&site.image_path("foobar.png"), 320, 480);
//!
//! let backend = MockBackend::new();
//! let result = ThumbnailTag::new("foobar.png").render(&site.context(&backend));
//! assert_eq!(site.registry.len(), 1);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::imaging::ImageBackend;
use crate::registry::StaticFileRegistry;
use crate::staging::StagingArea;
use crate::tag::SiteContext;

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> image::RgbImage {
    image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
}

/// Write a PNG of the given size, creating parent directories.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Write a JPEG of the given size, creating parent directories.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

// =========================================================================
// Site fixture
// =========================================================================

/// A temporary site source plus the per-build collaborators.
pub struct TestSite {
    pub dir: TempDir,
    pub config: SiteConfig,
    pub staging: StagingArea,
    pub registry: StaticFileRegistry,
}

impl TestSite {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            config,
            staging: StagingArea::new().unwrap(),
            registry: StaticFileRegistry::new(),
        }
    }

    pub fn source(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the configured images directory.
    pub fn image_path(&self, name: &str) -> PathBuf {
        self.source()
            .join(&self.config.images_directory)
            .join(name)
    }

    pub fn context<'a, B: ImageBackend>(&'a self, backend: &'a B) -> SiteContext<'a, B> {
        SiteContext {
            source: self.source(),
            config: &self.config,
            backend,
            staging: &self.staging,
            registry: &self.registry,
        }
    }
}
