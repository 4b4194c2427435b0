//! Parsers for Obsidian-style note syntax.

pub mod frontmatter;
pub mod tag;
pub mod wikilink;

pub use frontmatter::{split_frontmatter, split_note, truncate_at_delimiter, Metadata, NoteParts};
pub use tag::{extract_tags, parse_inline_tags};
pub use wikilink::{mask_images, rewrite_content, rewrite_links, Rewrite, IMAGE_PLACEHOLDER};
