//! Front-matter parsing for source documents.
//!
//! A source document may open with a block of `key: value` lines fenced by
//! `---` lines:
//!
//! ```text
//! ---
//! title: Hello
//! template: landing.html
//! ---
//! <p>Body text</p>
//! ```
//!
//! Every value is a plain string. There is no nesting, no quoting and no
//! multi-line values: one colon-separated line per field.

use std::sync::LazyLock;

use regex::Regex;

/// Leading `---` fenced block. The interior must hold at least one character.
static FRONT_MATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---\n((?s:.+?))\n---").expect("front matter pattern"));

/// Ordered `key -> value` pairs from a front-matter block.
///
/// Insertion order is preserved. Re-inserting an existing key replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: Vec<(String, String)>,
}

impl FrontMatter {
    /// Create an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `template` field, if present.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.get("template")
    }

    /// Iterate over fields in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A parsed source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    /// Header fields.
    pub front_matter: FrontMatter,

    /// Document body with the front-matter block removed.
    pub body: String,
}

/// Split a raw document into front matter and body.
///
/// Documents without a leading `---` block are returned unchanged as body
/// with no fields. When a block is found, the body is the remaining text
/// trimmed of surrounding whitespace.
#[must_use]
pub fn parse_front_matter(raw: &str) -> SourceDocument {
    let Some(captures) = FRONT_MATTER_RE.captures(raw) else {
        return SourceDocument {
            front_matter: FrontMatter::new(),
            body: raw.to_string(),
        };
    };

    let mut front_matter = FrontMatter::new();
    let block = captures.get(1).map_or("", |m| m.as_str());

    for line in block.split('\n').filter(|l| !l.trim().is_empty()) {
        // Split on the first colon only so values such as URLs keep theirs.
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        front_matter.insert(key, value.trim());
    }

    let matched_end = captures.get(0).map_or(0, |m| m.end());
    let body = raw[matched_end..].trim().to_string();

    SourceDocument { front_matter, body }
}
