//! Template loading and placeholder substitution.
//!
//! Templates are plain text documents with `{{ name }}` placeholders.
//! Whitespace inside the braces is ignored, so `{{title}}` and
//! `{{  title }}` are the same placeholder. `{{ content }}` receives the page
//! body; every other placeholder is filled from front-matter fields.
//! Placeholders with no matching field stay in the output verbatim.

use std::{borrow::Cow, path::PathBuf};

use brochure_core::FrontMatter;
use regex::{NoExpand, Regex};
use thiserror::Error;
use tracing::debug;

use crate::store::DocumentStore;

/// Placeholder name for the page body.
pub const CONTENT_PLACEHOLDER: &str = "content";

/// Front-matter key selecting the template. Never substituted.
pub const TEMPLATE_KEY: &str = "template";

/// Template errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found. The build is misconfigured.
    #[error("template not found: {name} (looked in {dir})")]
    NotFound { name: String, dir: PathBuf },

    /// Template could not be read.
    #[error("failed to read template {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Placeholder pattern could not be compiled.
    #[error("invalid placeholder {name}: {source}")]
    Placeholder {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// A loaded template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the raw template text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Fill the template with a page body and its front-matter fields.
    ///
    /// The body goes in first, then every field except `template` replaces
    /// all of its placeholders. Values are inserted literally.
    pub fn fill(&self, body: &str, fields: &FrontMatter) -> Result<String> {
        let mut result = substitute(&self.content, CONTENT_PLACEHOLDER, body)?;

        for (key, value) in fields.iter() {
            if key == TEMPLATE_KEY {
                continue;
            }
            result = substitute(&result, key, value)?;
        }

        Ok(result)
    }
}

/// Build the whitespace-tolerant pattern for `{{ name }}`.
fn placeholder_pattern(name: &str) -> Result<Regex> {
    let pattern = format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(name));
    Regex::new(&pattern).map_err(|source| TemplateError::Placeholder {
        name: name.to_string(),
        source,
    })
}

/// Replace every `{{ name }}` in `text` with `value`.
pub fn substitute(text: &str, name: &str, value: &str) -> Result<String> {
    let pattern = placeholder_pattern(name)?;
    Ok(match pattern.replace_all(text, NoExpand(value)) {
        Cow::Borrowed(unchanged) => unchanged.to_string(),
        Cow::Owned(replaced) => replaced,
    })
}

/// Loads templates by file name from a template directory.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    store: DocumentStore,
}

impl TemplateLoader {
    /// Create a loader over the given template directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: DocumentStore::new(dir),
        }
    }

    /// Load a template by name.
    ///
    /// A missing template is a configuration error: callers propagate it and
    /// abort the whole build.
    pub fn load(&self, name: &str) -> Result<Template> {
        let content = self
            .store
            .read(name)
            .map_err(|source| TemplateError::Io {
                name: name.to_string(),
                source,
            })?
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_string(),
                dir: self.store.root().to_path_buf(),
            })?;

        debug!(template = name, "loaded template");
        Ok(Template::new(name, content))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FrontMatter {
        let mut fm = FrontMatter::new();
        for (k, v) in pairs {
            fm.insert(*k, *v);
        }
        fm
    }

    #[test]
    fn test_fill_title_and_content() {
        let template = Template::new("page.html", "<h1>{{title}}</h1>{{content}}");
        let result = template
            .fill("Body text", &fields(&[("title", "Hello")]))
            .unwrap();

        assert_eq!(result, "<h1>Hello</h1>Body text");
    }

    #[test]
    fn test_whitespace_tolerant_placeholders() {
        let template = Template::new("t", "{{ title }}|{{title}}|{{   title\t}}");
        let result = template.fill("", &fields(&[("title", "X")])).unwrap();

        assert_eq!(result, "X|X|X");
    }

    #[test]
    fn test_content_replaced_everywhere() {
        let template = Template::new("t", "{{ content }}-{{content}}");
        let result = template.fill("B", &FrontMatter::new()).unwrap();

        assert_eq!(result, "B-B");
    }

    #[test]
    fn test_unresolved_placeholders_left_verbatim() {
        let template = Template::new("t", "{{ title }} {{ missing }}");
        let result = template.fill("", &fields(&[("title", "T")])).unwrap();

        assert_eq!(result, "T {{ missing }}");
    }

    #[test]
    fn test_template_field_is_not_substituted() {
        let template = Template::new("t", "[{{ template }}]");
        let result = template
            .fill("", &fields(&[("template", "landing.html")]))
            .unwrap();

        assert_eq!(result, "[{{ template }}]");
    }

    #[test]
    fn test_values_are_inserted_literally() {
        let template = Template::new("t", "{{ price }} {{ content }}");
        let result = template
            .fill("costs $1 and ${name}", &fields(&[("price", "$0 $&")]))
            .unwrap();

        assert_eq!(result, "$0 $& costs $1 and ${name}");
    }

    #[test]
    fn test_field_names_with_regex_characters() {
        let template = Template::new("t", "{{ a.b }} {{ axb }}");
        let result = template.fill("", &fields(&[("a.b", "dot")])).unwrap();

        assert_eq!(result, "dot {{ axb }}");
    }

    #[test]
    fn test_body_placeholders_filled_from_fields() {
        let template = Template::new("t", "<main>{{ content }}</main>");
        let result = template
            .fill("Hi {{ name }}", &fields(&[("name", "Ada")]))
            .unwrap();

        assert_eq!(result, "<main>Hi Ada</main>");
    }

    #[test]
    fn test_loader_reads_template() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page.html"), "<body>{{ content }}</body>").unwrap();

        let loader = TemplateLoader::new(dir.path());
        let template = loader.load("page.html").unwrap();

        assert_eq!(template.name(), "page.html");
        assert_eq!(template.content(), "<body>{{ content }}</body>");
    }

    #[test]
    fn test_loader_missing_template() {
        let dir = TempDir::new().unwrap();
        let loader = TemplateLoader::new(dir.path());

        let err = loader.load("nope.html").unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { ref name, .. } if name == "nope.html"));
        assert!(err.to_string().contains("template not found: nope.html"));
    }

    #[test]
    fn test_loader_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let loader = TemplateLoader::new(dir.path().join("templates"));

        let err = loader.load("../page.html").unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
    }
}
