//! Validation of the filename passed to a `{% t ... %}` tag.
//!
//! The filename comes straight from page source, so it is untrusted. Two
//! checks are applied, in order:
//!
//! 1. Every character must be in `[a-zA-Z0-9_/.-]` (and there must be at
//!    least one).
//! 2. The text must not contain `./` or `/.` anywhere.
//!
//! The second check is a textual substring test, not path normalization. It
//! rejects `../x`, `a/../b`, `./x` and hidden path segments such as `a/.git`,
//! but it lets through shapes like `..`, `foo..png`, `.hidden` or an absolute
//! `/etc/passwd`. Those are kept accepted for compatibility with existing
//! sites; containment under the images directory is instead guaranteed by
//! [`resolve`](crate::paths::ResolvedPaths::resolve), which never lets an
//! absolute filename replace the base directory.

use std::fmt;

/// Sequences that are rejected anywhere in the filename.
const FORBIDDEN_SEQUENCES: [&str; 2] = ["./", "/."];

/// A filename that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFilename(String);

impl ImageFilename {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '.' | '-')
}

/// Check a (already trimmed) filename against the allowed character class
/// and the forbidden sequences.
///
/// Returns `None` when the filename is rejected; the caller decides how the
/// rejection is reported. No filesystem access happens here.
pub fn validate(raw: &str) -> Option<ImageFilename> {
    if raw.is_empty() || !raw.chars().all(is_allowed_char) {
        return None;
    }
    if FORBIDDEN_SEQUENCES.iter().any(|seq| raw.contains(seq)) {
        return None;
    }
    Some(ImageFilename(raw.to_string()))
}
