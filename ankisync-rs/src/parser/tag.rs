//! Tag extraction from frontmatter and inline `#tag` markers.

use crate::parser::frontmatter::Metadata;
use crate::types::TagSet;
use regex::Regex;
use std::sync::LazyLock;

// A hash immediately followed by one or more word characters. Headings
// ("# Title") have a space after the hash and never match.
static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());

/// Parse inline tags (without the leading `#`) in order of appearance.
///
/// Matches anywhere in the text, including inside wikilinks and image
/// embeds, so this must run on the content before it is rewritten.
pub fn parse_inline_tags(content: &str) -> Vec<String> {
    INLINE_TAG
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Union of frontmatter tags and inline tags.
pub fn extract_tags(metadata: &Metadata, content: &str) -> TagSet {
    let mut tags: TagSet = metadata.tags().into_iter().collect();
    tags.extend(parse_inline_tags(content));
    tags
}
