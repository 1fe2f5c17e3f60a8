//! Finding `{% t ... %}` invocations in page text.
//!
//! Only the thumbnail tag is recognized. Any other `{% ... %}` block is left
//! exactly as written, so pages can carry markup meant for a later stage.
//!
//! ```text
//! {% t foo.png %}        tag "t", markup "foo.png"
//! {%t foo.png%}          same
//! {% t  foo bar.png %}   tag "t", markup "foo bar.png" (rejected at render)
//! {% include x.html %}   untouched
//! {% t foo.png           untouched (no closing %})
//! ```

use crate::tag::TAG_NAME;

const OPEN: &str = "{%";
const CLOSE: &str = "%}";

/// A tag invocation found in page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInvocation<'a> {
    /// Byte range of the whole `{% ... %}` block.
    pub span: std::ops::Range<usize>,
    /// Everything between the tag name and `%}`, untrimmed.
    pub markup: &'a str,
}

/// If `inner` (the text between `{%` and `%}`) invokes the thumbnail tag,
/// return its markup.
fn thumbnail_markup(inner: &str) -> Option<&str> {
    let body = inner.trim_start();
    let rest = body.strip_prefix(TAG_NAME)?;
    // The tag name must end here: `{% t %}` or `{% t foo %}`, not `{% tab %}`
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// All thumbnail tag invocations in `text`, in order.
pub fn find_tags(text: &str) -> Vec<TagInvocation<'_>> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(open) = text[cursor..].find(OPEN) {
        let start = cursor + open;
        let inner_start = start + OPEN.len();
        let Some(close) = text[inner_start..].find(CLOSE) else {
            break;
        };
        let inner_end = inner_start + close;
        let end = inner_end + CLOSE.len();

        if let Some(markup) = thumbnail_markup(&text[inner_start..inner_end]) {
            found.push(TagInvocation {
                span: start..end,
                markup,
            });
        }
        cursor = end;
    }
    found
}

/// Replace every thumbnail tag in `text` with the output of `render`.
///
/// Stops at the first error `render` returns.
pub fn expand_tags<E>(
    text: &str,
    mut render: impl FnMut(&str) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for invocation in find_tags(text) {
        out.push_str(&text[last..invocation.span.start]);
        out.push_str(&render(invocation.markup)?);
        last = invocation.span.end;
    }
    out.push_str(&text[last..]);
    Ok(out)
}
