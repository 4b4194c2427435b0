//! YAML frontmatter splitting.

use serde_yaml::{Mapping, Value};

/// Line that opens and closes a frontmatter block.
pub const DELIMITER: &str = "---";

/// Frontmatter extraction result.
#[derive(Debug, Clone)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML string (without delimiters).
    pub yaml: Option<&'a str>,
    /// The content after the frontmatter.
    pub content: &'a str,
}

/// Parsed frontmatter of a note. Empty when the note has none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata(Mapping);

impl Metadata {
    pub fn new(mapping: Mapping) -> Self {
        Self(mapping)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Tags declared under the `tags` key, in declaration order.
    ///
    /// A sequence contributes each scalar element; a lone string counts as one
    /// tag. Values are taken verbatim.
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A note body separated into metadata and content.
#[derive(Debug, Clone)]
pub struct NoteParts<'a> {
    pub metadata: Metadata,
    pub content: &'a str,
    /// A delimited block was present but did not parse as a YAML mapping.
    pub malformed: bool,
}

/// Split content into frontmatter and body.
///
/// Returns the raw YAML string (if present) and the remaining content.
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        yaml: None,
        content,
    };

    // Frontmatter must start at the very beginning with ---
    if !content.starts_with(DELIMITER) {
        return no_frontmatter;
    }

    let after_first_delimiter = &content[3..];
    let yaml_start = if after_first_delimiter.starts_with('\n') {
        4
    } else if after_first_delimiter.starts_with("\r\n") {
        5
    } else {
        // No newline after ---, not valid frontmatter
        return no_frontmatter;
    };

    let remaining = &content[yaml_start..];

    // Empty block: the closing delimiter follows the opening one directly
    if let Some(first_line) = remaining.split_inclusive('\n').next() {
        if is_delimiter_line(first_line) {
            return FrontmatterSplit {
                yaml: Some(""),
                content: &remaining[first_line.len()..],
            };
        }
    }

    // The closing delimiter must be on its own line: \n---\n or \n--- at EOF
    let closing_pos = remaining
        .find("\n---\n")
        .or_else(|| remaining.find("\n---\r\n"))
        .or_else(|| remaining.ends_with("\n---").then(|| remaining.len() - 4));

    match closing_pos {
        Some(pos) => {
            let yaml_end = yaml_start + pos;
            let content_start = yaml_end + 4; // \n---
            let content_after = if content_start < content.len() {
                skip_line_break(&content[content_start..])
            } else {
                ""
            };

            FrontmatterSplit {
                yaml: Some(&content[yaml_start..yaml_end]),
                content: content_after,
            }
        }
        None => no_frontmatter,
    }
}

fn skip_line_break(rest: &str) -> &str {
    rest.strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest)
}

fn is_delimiter_line(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Separate a raw note into its metadata and content block.
///
/// Never fails: a block that is not a YAML mapping is treated as absent
/// metadata, and when no block exists the content is the input unchanged.
pub fn split_note(raw: &str) -> NoteParts<'_> {
    let split = split_frontmatter(raw);
    let Some(yaml) = split.yaml else {
        return NoteParts {
            metadata: Metadata::default(),
            content: raw,
            malformed: false,
        };
    };

    let (metadata, malformed) = match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => (Metadata::new(mapping), false),
        Ok(Value::Null) => (Metadata::default(), false),
        Ok(_) | Err(_) => (Metadata::default(), true),
    };

    NoteParts {
        metadata,
        content: split.content,
        malformed,
    }
}

/// Cut content at the first line consisting only of `---`.
///
/// Drops a trailing frontmatter-like block. Content without such a line is
/// returned unchanged.
pub fn truncate_at_delimiter(content: &str) -> &str {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if is_delimiter_line(line) {
            return &content[..offset];
        }
        offset += line.len();
    }
    content
}
