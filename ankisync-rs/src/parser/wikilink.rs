//! Wikilink and image-embed rewriting.
//!
//! Rewriting runs two passes in a fixed order:
//! 1. `![[picture.png]]` image embeds become [`IMAGE_PLACEHOLDER`].
//! 2. `[[target]]` and `[[target|alias]]` links become `<ins>alias</ins>`,
//!    and every target is reported as a discovered note.
//!
//! Images have to go first, otherwise the link pass would consume the
//! `[[...]]` part of an embed and leave a stray `!` behind.

use crate::parser::frontmatter::truncate_at_delimiter;
use crate::types::NoteId;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Text that replaces an image embed on the card.
pub const IMAGE_PLACEHOLDER: &str = "[image]";

/// Extensions treated as images by the masking pass.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"];

// ![[path.ext]] or ![[path.ext|alias or size]]
static IMAGE_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    let extensions = IMAGE_EXTENSIONS.join("|");
    Regex::new(&format!(
        r"(?i)!\[\[[^\[\]\|]+?\.(?:{extensions})\s*(?:\|[^\[\]]*)?\]\]"
    ))
    .unwrap()
});

// [[target]] or [[target|alias]]
// \[\[               - Opening [[
// ([^\[\]\|]+)       - Target (group 1)
// (?:\|([^\[\]]*))?  - Alias (group 2)
// \]\]               - Closing ]]
static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]\|]+)(?:\|([^\[\]]*))?\]\]").unwrap());

/// Output of [`rewrite_content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Content with images masked, links rendered and any trailing block cut.
    pub content: String,
    /// Link targets in order of appearance. May repeat.
    pub discovered: Vec<NoteId>,
}

/// Apply both rewriting passes and the trailing-block truncation.
pub fn rewrite_content(content: &str) -> Rewrite {
    let masked = mask_images(content);
    let (linked, discovered) = rewrite_links(&masked);
    let content = truncate_at_delimiter(&linked).to_string();
    Rewrite {
        content,
        discovered,
    }
}

/// Replace every image embed with [`IMAGE_PLACEHOLDER`].
pub fn mask_images(content: &str) -> Cow<'_, str> {
    IMAGE_EMBED.replace_all(content, IMAGE_PLACEHOLDER)
}

/// Render wikilinks as underlined text and collect their targets.
///
/// Single left-to-right pass: replacement text is never rescanned.
pub fn rewrite_links(content: &str) -> (String, Vec<NoteId>) {
    let mut output = String::with_capacity(content.len());
    let mut discovered = Vec::new();
    let mut last = 0;

    for cap in WIKILINK.captures_iter(content) {
        let full_match = cap.get(0).unwrap();
        let target = cap.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let alias = cap
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|alias| !alias.is_empty());

        output.push_str(&content[last..full_match.start()]);
        output.push_str("<ins>");
        output.push_str(alias.unwrap_or(target));
        output.push_str("</ins>");
        last = full_match.end();

        if let Some(id) = link_note_id(target) {
            discovered.push(id);
        }
    }

    output.push_str(&content[last..]);
    (output, discovered)
}

/// Note named by a link target, ignoring any `#heading` or `#^block` suffix.
///
/// Returns `None` for same-note links such as `[[#Heading]]`.
pub fn link_note_id(target: &str) -> Option<NoteId> {
    let note = target.split('#').next().unwrap_or(target);
    NoteId::new(note)
}
