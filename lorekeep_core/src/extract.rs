//! Tagged-block extraction from message text.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Compiled matcher for one tag name.
///
/// Matches `<tag>...</tag>` case-insensitively, tolerating whitespace between
/// the tag name and `>`, spanning multiple lines, non-greedy across content.
/// Unterminated or malformed tags simply produce no matches.
#[derive(Debug, Clone)]
pub struct TagPattern {
    tag: String,
    regex: Regex,
}

/// One matched block: the full span in the source text and the inner content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBlock<'t> {
    pub span: Range<usize>,
    pub inner: &'t str,
}

impl TagPattern {
    pub fn new(tag: &str) -> Result<Self> {
        let escaped = regex::escape(tag);
        let pattern = format!("<{escaped}\\s*>(.*?)</{escaped}>");
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| Error::InvalidTag {
                tag: tag.to_string(),
                source,
            })?;
        Ok(Self {
            tag: tag.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// All non-overlapping matches in `text`, in document order.
    #[must_use]
    pub fn find_blocks<'t>(&self, text: &'t str) -> Vec<TagBlock<'t>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let inner = caps.get(1)?;
                Some(TagBlock {
                    span: full.range(),
                    inner: inner.as_str(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn pattern(tag: &str) -> TagPattern {
        TagPattern::new(tag).expect("tag pattern should compile")
    }

    #[test]
    fn test_single_block() {
        let blocks = pattern("location").find_blocks("before <location>id: 1</location> after");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner, "id: 1");
        assert_eq!(blocks[0].span, 7..33);
    }

    #[test]
    fn test_case_insensitive_and_trailing_whitespace() {
        let blocks = pattern("namedcharacter")
            .find_blocks("<NamedCharacter >id: 2</NAMEDCHARACTER>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner, "id: 2");
    }

    #[test]
    fn test_multiline_content() {
        let text = "x <location>id: 1\nname: Tavern\nmood: warm</location> y";
        let blocks = pattern("location").find_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner, "id: 1\nname: Tavern\nmood: warm");
    }

    #[test]
    fn test_unterminated_tag_matches_nothing() {
        let blocks = pattern("location").find_blocks("<location>id: 1\nname: Tavern");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_multiple_blocks_in_order() {
        let text = "<opinion>a: 1</opinion> mid <opinion>b: 2</opinion>";
        let blocks = pattern("opinion").find_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].inner, "a: 1");
        assert_eq!(blocks[1].inner, "b: 2");
        assert!(blocks[0].span.end <= blocks[1].span.start);
    }

    #[test]
    fn test_non_greedy_across_blocks() {
        let text = "<clothing>first</clothing><clothing>second</clothing>";
        let blocks = pattern("clothing").find_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].inner, "first");
    }

    #[test]
    fn test_unrelated_tags_are_ignored() {
        let blocks = pattern("location").find_blocks("<b>bold</b> plain text");
        assert!(blocks.is_empty());
    }
}
