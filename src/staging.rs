//! Staging area for generated thumbnails.
//!
//! A thumbnail is written to a uniquely named temp file first and copied into
//! the site destination later, when the host copies every registered static
//! file. The staged file must therefore outlive the tag render that created
//! it. [`StagingArea`] owns a temp directory for the whole build:
//!
//! ```text
//! let staging = StagingArea::new()?;     // once per build
//! ... render tags, each staging one thumbnail ...
//! registry.copy_all(destination)?;       // host copies staged files
//! staging.cleanup()?;                    // exactly once, afterwards
//! ```
//!
//! Dropping the area without calling [`cleanup`](StagingArea::cleanup) also
//! removes the directory, so staged files never outlive the process.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of the staging directory name.
const STAGING_PREFIX: &str = "thumbnailify-";

/// Temp directory holding every thumbnail staged during a build.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

/// A staged file reserved by [`StagingArea::stage`].
///
/// The file exists (empty) as soon as it is reserved, so two renders of the
/// same thumbnail name never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedThumbnail {
    path: PathBuf,
}

impl StagedThumbnail {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl StagingArea {
    /// Create a staging area under the system temp directory.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Reserve a unique file for a thumbnail named `name`.
    ///
    /// The name is only used as a prefix, for readability of the temp dir.
    pub fn stage(&self, name: &str) -> io::Result<StagedThumbnail> {
        let file = tempfile::Builder::new()
            .prefix(name)
            .tempfile_in(self.dir.path())?;
        let path = file.into_temp_path().keep().map_err(|e| e.error)?;
        Ok(StagedThumbnail { path })
    }

    /// Remove the staging directory and everything staged in it.
    ///
    /// Call once, after every registered file has been copied.
    pub fn cleanup(self) -> io::Result<()> {
        self.dir.close()
    }
}
