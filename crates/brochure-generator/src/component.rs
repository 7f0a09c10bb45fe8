//! Component inclusion.
//!
//! Replaces `<component src="PATH"></component>` tags with the contents of
//! the named fragment from the component directory. Expansion is a single
//! pass: tags inside an included fragment are left as they are.

use std::{path::PathBuf, sync::LazyLock};

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::store::DocumentStore;

static COMPONENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<component\s+src="([^"]+)"\s*></component>"#).expect("component pattern")
});

/// Component expansion errors.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// A component exists but could not be read.
    #[error("failed to read component {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for component operations.
pub type Result<T> = std::result::Result<T, ComponentError>;

/// Expands component tags from a component directory.
#[derive(Debug, Clone)]
pub struct ComponentExpander {
    store: DocumentStore,
}

impl ComponentExpander {
    /// Create an expander over the given component directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: DocumentStore::new(dir),
        }
    }

    /// Replace every component tag in `html`.
    ///
    /// Missing components expand to an empty string with a warning.
    pub fn expand(&self, html: &str) -> Result<String> {
        let mut output = String::with_capacity(html.len());
        let mut last = 0;

        for captures in COMPONENT_RE.captures_iter(html) {
            let (Some(tag), Some(src)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            output.push_str(&html[last..tag.start()]);
            output.push_str(&self.fragment(src.as_str())?);
            last = tag.end();
        }

        output.push_str(&html[last..]);
        Ok(output)
    }

    fn fragment(&self, name: &str) -> Result<String> {
        match self.store.read(name) {
            Ok(Some(content)) => {
                debug!(component = name, "expanded component");
                Ok(content)
            }
            Ok(None) => {
                warn!(component = name, "component not found");
                Ok(String::new())
            }
            Err(source) => Err(ComponentError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}
