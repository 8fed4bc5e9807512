//! Locate the HTML rendering of a message.
//!
//! The descent is a fixed three-step path, not a general MIME walk:
//!
//! ```text
//! multipart/mixed
//! └── multipart/alternative   (first match)
//!     └── text/html           (first match)
//! ```
//!
//! Each step takes the first matching child only and never recurses. Trees
//! that nest the alternative part deeper, reorder it, or carry only a
//! `text/plain` rendering are rejected with a shape error; there is no
//! fallback to plain text.

use crate::error::{ExtractError, Result, ShapeStep};
use crate::types::MimePart;
use tracing::debug;

pub const MULTIPART_MIXED: &str = "multipart/mixed";
pub const MULTIPART_ALTERNATIVE: &str = "multipart/alternative";
pub const TEXT_HTML: &str = "text/html";

/// Find the `text/html` leaf of a `multipart/mixed` message
pub fn locate_html_body(root: &MimePart) -> Result<&MimePart> {
    let mixed = expect_mixed_root(root)?;
    let alternative = find_alternative(mixed)?;
    let html = find_html(alternative)?;

    debug!(
        "Located html body ({} encoded bytes)",
        html.body.as_deref().map_or(0, str::len)
    );
    Ok(html)
}

/// Step 1: the root itself must be `multipart/mixed`
pub fn expect_mixed_root(root: &MimePart) -> Result<&MimePart> {
    if root.has_type(MULTIPART_MIXED) {
        Ok(root)
    } else {
        Err(ExtractError::Shape {
            step: ShapeStep::MixedRoot,
            expected: MULTIPART_MIXED,
            found: vec![root.content_type.clone()],
        })
    }
}

/// Step 2: first `multipart/alternative` child of the mixed part
pub fn find_alternative(mixed: &MimePart) -> Result<&MimePart> {
    first_child(mixed, MULTIPART_ALTERNATIVE, ShapeStep::Alternative)
}

/// Step 3: first `text/html` child of the alternative part
pub fn find_html(alternative: &MimePart) -> Result<&MimePart> {
    first_child(alternative, TEXT_HTML, ShapeStep::Html)
}

fn first_child<'a>(
    parent: &'a MimePart,
    content_type: &'static str,
    step: ShapeStep,
) -> Result<&'a MimePart> {
    parent
        .children
        .iter()
        .find(|child| child.has_type(content_type))
        .ok_or_else(|| ExtractError::Shape {
            step,
            expected: content_type,
            found: parent
                .children
                .iter()
                .map(|child| child.content_type.clone())
                .collect(),
        })
}
