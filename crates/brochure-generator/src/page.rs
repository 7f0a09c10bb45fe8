//! Page generation.
//!
//! Turns one source document into a finished page: parse front matter, pick
//! and fill a template, then expand components.

use std::{
    fs,
    path::{Path, PathBuf},
};

use brochure_core::{BuildConfig, parse_front_matter};
use thiserror::Error;
use tracing::debug;

use crate::{
    component::{ComponentError, ComponentExpander},
    template::{TemplateError, TemplateLoader},
};

/// Page generation errors.
#[derive(Debug, Error)]
pub enum PageError {
    /// The source document could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template error.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Component error.
    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// Result type for page operations.
pub type Result<T> = std::result::Result<T, PageError>;

/// Generates pages from source documents.
#[derive(Debug, Clone)]
pub struct PageGenerator {
    templates: TemplateLoader,
    components: ComponentExpander,
    default_template: String,
}

impl PageGenerator {
    /// Create a generator from its parts.
    #[must_use]
    pub fn new(
        templates: TemplateLoader,
        components: ComponentExpander,
        default_template: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            components,
            default_template: default_template.into(),
        }
    }

    /// Create a generator from build settings.
    #[must_use]
    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(
            TemplateLoader::new(&config.templates_dir),
            ComponentExpander::new(&config.components_dir),
            config.default_template.clone(),
        )
    }

    /// Generate the page for a source file.
    pub fn generate(&self, source_path: &Path) -> Result<String> {
        let raw = fs::read_to_string(source_path).map_err(|source| PageError::Read {
            path: source_path.to_path_buf(),
            source,
        })?;

        debug!(path = %source_path.display(), "generating page");
        self.render(&raw)
    }

    /// Generate a page from raw source text.
    pub fn render(&self, raw: &str) -> Result<String> {
        let doc = parse_front_matter(raw);

        let template_name = doc
            .front_matter
            .template()
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_template.as_str());
        let template = self.templates.load(template_name)?;

        let filled = template.fill(&doc.body, &doc.front_matter)?;
        Ok(self.components.expand(&filled)?)
    }
}
