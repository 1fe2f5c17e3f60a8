//! Static files generated during a build.
//!
//! Each successful tag render registers one [`StaticFile`]: where the staged
//! thumbnail is now, and where it must end up in the site destination. The
//! host copies every entry once all pages are rendered.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// A file to copy into the generated site.
///
/// `source` is a complete path; `dest_dir` and `dest_name` are relative to
/// the site destination and need not share a name with the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    pub source: PathBuf,
    pub dest_dir: String,
    pub dest_name: String,
}

impl StaticFile {
    pub fn new(
        source: impl Into<PathBuf>,
        dest_dir: impl Into<String>,
        dest_name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            dest_dir: dest_dir.into(),
            dest_name: dest_name.into(),
        }
    }

    /// Path the host reads the file from.
    pub fn path(&self) -> &Path {
        &self.source
    }

    /// Path of the copy under `site_destination`.
    pub fn destination(&self, site_destination: &Path) -> PathBuf {
        let mut dest = site_destination.to_path_buf();
        for part in self.dest_dir.split(['/', '\\']).filter(|p| !p.is_empty()) {
            dest.push(part);
        }
        dest.push(&self.dest_name);
        dest
    }

    /// Copy the file to its place under `site_destination`, creating
    /// directories as needed. Returns the written path.
    pub fn write_to(&self, site_destination: &Path) -> io::Result<PathBuf> {
        let dest = self.destination(site_destination);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&self.source, &dest)?;
        Ok(dest)
    }
}

/// Append-only collection of [`StaticFile`]s.
///
/// Pushes take `&self` and go through a mutex, so a registry can be shared
/// by reference across rayon workers.
#[derive(Debug, Default)]
pub struct StaticFileRegistry {
    files: Mutex<Vec<StaticFile>>,
}

impl StaticFileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, file: StaticFile) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(file);
    }

    /// Snapshot of the registered files, in registration order.
    pub fn entries(&self) -> Vec<StaticFile> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy every registered file into `site_destination`.
    ///
    /// Later registrations overwrite earlier ones with the same destination.
    pub fn copy_all(&self, site_destination: &Path) -> io::Result<Vec<PathBuf>> {
        self.entries()
            .iter()
            .map(|file| file.write_to(site_destination))
            .collect()
    }
}
