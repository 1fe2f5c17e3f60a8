//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Each page is listed by its path relative to the site source, with its tag
//! invocations indented underneath. A tag that rendered a thumbnail shows
//! where the thumbnail went; a tag that rendered an inline error shows the
//! exact text placed in the page, so the console and the built site agree.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 index.html
//!     foobar.png → images/foobar_t.png
//!     foo@bar.png: Image filename 'foo@bar.png' contains invalid characters or sequences
//! 002 posts/hello.md
//!
//! Built 2 pages, 3 tags (1 inline error), 1 thumbnail, 4 files copied
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 index.html
//!     foobar.png: ok (320x480)
//!     gone.png: File gone.png not found in images
//!
//! Checked 2 tags: 1 ok, 1 inline error, 0 unreadable
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::paths::thumbnail_name;
use crate::site::{BuildReport, CheckedTag, TagCheck};
use crate::tag::RenderResult;
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 thumbnail`, `2 thumbnails`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Format the result of a full build.
pub fn format_build_output(report: &BuildReport, images_directory: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
    }
    for (idx, page) in report.pages.iter().enumerate() {
        lines.push(format!("{} {}", format_index(idx + 1), page.path.display()));
        for tag in &page.tags {
            match &tag.error {
                None => lines.push(format!(
                    "{}{} \u{2192} {}/{}",
                    indent(1),
                    tag.filename,
                    images_directory.trim_matches('/'),
                    thumbnail_name(&tag.filename)
                )),
                Some(err) => lines.push(format!("{}{}: {}", indent(1), tag.filename, err)),
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let errors = report.tag_errors().count();
    lines.push(format!(
        "Built {}, {} ({}), {}, {} copied",
        plural(report.pages.len(), "page"),
        plural(report.tag_count(), "tag"),
        plural(errors, "inline error"),
        plural(report.thumbnails.len(), "thumbnail"),
        plural(report.copied.len(), "file"),
    ));
    lines
}

pub fn print_build_output(report: &BuildReport, images_directory: &str) {
    for line in format_build_output(report, images_directory) {
        println!("{}", line);
    }
}

/// Format the result of `check`, grouped by page in discovery order.
pub fn format_check_output(checked: &[CheckedTag]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_page: Option<&Path> = None;
    let mut page_index = 0;
    let (mut ok, mut inline, mut unreadable) = (0, 0, 0);

    for tag in checked {
        if current_page != Some(tag.page.as_path()) {
            page_index += 1;
            current_page = Some(tag.page.as_path());
            lines.push(format!("{} {}", format_index(page_index), tag.page.display()));
        }
        let status = match &tag.status {
            TagCheck::Ok { width, height } => {
                ok += 1;
                format!("ok ({width}x{height})")
            }
            TagCheck::Inline(err) => {
                inline += 1;
                err.to_string()
            }
            TagCheck::Unreadable(msg) => {
                unreadable += 1;
                format!("unreadable: {msg}")
            }
        };
        lines.push(format!("{}{}: {}", indent(1), tag.filename, status));
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Checked {}: {} ok, {}, {} unreadable",
        plural(checked.len(), "tag"),
        ok,
        plural(inline, "inline error"),
        unreadable
    ));
    lines
}

pub fn print_check_output(checked: &[CheckedTag]) {
    for line in format_check_output(checked) {
        println!("{}", line);
    }
}

/// Format a single `render`: the tag output, then where thumbnails went.
pub fn format_render_output(result: &RenderResult, written: &[PathBuf]) -> Vec<String> {
    let mut lines = vec![result.to_string()];
    for path in written {
        lines.push(format!("{}\u{2192} {}", indent(1), path.display()));
    }
    lines
}

pub fn print_render_output(result: &RenderResult, written: &[PathBuf]) {
    for line in format_render_output(result, written) {
        println!("{}", line);
    }
}
