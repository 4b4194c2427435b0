//! Card synthesis from a processed note.

use crate::types::{Card, SKIP_NOTICE, SKIP_TAG, TagSet};
use pulldown_cmark::{Options, Parser, html};

/// Turns rewritten markdown into the markup stored on the card back.
pub trait MarkupRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark to HTML, with the GitHub-style extensions Obsidian users expect.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl MarkupRenderer for HtmlRenderer {
    fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES;
        let parser = Parser::new_ext(markdown, options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}

/// Composes cards. Pure: no file or network access.
#[derive(Debug, Clone)]
pub struct CardBuilder<R = HtmlRenderer> {
    prefix: String,
    default_tag: Option<String>,
    renderer: R,
}

impl CardBuilder<HtmlRenderer> {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_renderer(prefix, HtmlRenderer)
    }
}

impl<R: MarkupRenderer> CardBuilder<R> {
    pub fn with_renderer(prefix: impl Into<String>, renderer: R) -> Self {
        Self {
            prefix: prefix.into(),
            default_tag: None,
            renderer,
        }
    }

    /// Tag added to cards whose note declares no tags at all.
    pub fn default_tag(mut self, tag: Option<String>) -> Self {
        self.default_tag = tag.filter(|t| !t.trim().is_empty());
        self
    }

    /// Front text for a note: the configured prefix followed by the note stem.
    pub fn front(&self, note_stem: &str) -> String {
        format!("{}{}", self.prefix, note_stem)
    }

    /// Build the card for a note.
    ///
    /// `content` is the already rewritten content block. Notes tagged
    /// [`SKIP_TAG`] get a skip-marked card whose back is [`SKIP_NOTICE`].
    pub fn build(&self, note_stem: &str, mut tags: TagSet, content: &str) -> Card {
        if tags.is_empty() {
            if let Some(ref tag) = self.default_tag {
                tags.insert(tag.clone());
            }
        }

        let front = self.front(note_stem);
        if tags.contains(SKIP_TAG) {
            return Card {
                front,
                back: SKIP_NOTICE.to_string(),
                tags,
                should_skip: true,
            };
        }

        Card {
            front,
            back: self.renderer.render(content),
            tags,
            should_skip: false,
        }
    }
}
