//! Span replacement for consumed tag blocks.

use std::ops::Range;

/// One span of the original message and the status text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub span: Range<usize>,
    pub text: String,
}

/// Apply replacements to `text`, left to right, and trim the result.
///
/// Replacements are sorted by span start; a span overlapping an earlier one
/// (a tag nested inside another tag's content) is dropped rather than
/// double-consumed.
#[must_use]
pub fn apply(text: &str, mut replacements: Vec<Replacement>) -> String {
    replacements.sort_by_key(|r| (r.span.start, r.span.end));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0_usize;
    for replacement in replacements {
        if replacement.span.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..replacement.span.start]);
        out.push_str(&replacement.text);
        cursor = replacement.span.end;
    }
    out.push_str(&text[cursor..]);
    out.trim().to_string()
}
