//! # Thumbnailify
//!
//! A template tag for static sites: `{% t foo.png %}` becomes a 160x240
//! thumbnail linked to the full image.
//!
//! ```text
//! {% t foo.png %}
//!   → <a class="image" href="/images/foo.png"><img src="/images/foo_t.png" /></a>
//! ```
//!
//! Rendering a tag:
//!
//! 1. trims and validates the filename (`[a-zA-Z0-9_/.-]+`, no `./` or `/.`),
//! 2. resolves it under `<site source>/<images_directory>`,
//! 3. fits the image into 160x240 in its own codec, staging the result,
//! 4. registers the staged file for delivery as `<images_directory>/<stem>_t<ext>`,
//! 5. returns the link, or an inline message when the filename is invalid
//!    or the image missing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`tag`] | The tag itself: request, render, inline and fatal errors |
//! | [`filename`] | Character-class and traversal-sequence validation |
//! | [`paths`] | Source path resolution, thumbnail naming, URL building |
//! | [`imaging`] | Pure-Rust fit-within resize behind the [`imaging::ImageBackend`] trait |
//! | [`staging`] | Build-lifetime temp directory holding staged thumbnails |
//! | [`registry`] | Static files to copy into the built site |
//! | [`liquid`] | Locating `{% t ... %}` invocations in page text |
//! | [`site`] | Minimal host build: expand pages, copy files, deliver thumbnails |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Inline Errors
//!
//! An invalid filename or a missing image does not fail the build. The
//! message replaces the tag in the page, where the author sees it on the
//! next preview. Only a failed resize (corrupt or unsupported image) aborts,
//! since continuing would ship a link to a thumbnail that does not exist.
//!
//! ## Same Codec In, Same Codec Out
//!
//! A `.png` gets a PNG thumbnail and a `.jpg` a JPEG one. The thumbnail URL
//! is derived from the source filename, so converting formats would break it.
//!
//! ## Staged, Then Delivered
//!
//! Thumbnails are written to a [`staging::StagingArea`] that lives for the
//! whole build and are copied into the destination after every page has
//! rendered. The area is removed once, after that copy.

pub mod config;
pub mod filename;
pub mod imaging;
pub mod liquid;
pub mod output;
pub mod paths;
pub mod registry;
pub mod site;
pub mod staging;
pub mod tag;

#[cfg(test)]
pub(crate) mod test_helpers;
