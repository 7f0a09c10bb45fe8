//! Brochure Core Library
//!
//! Core types, configuration, and error handling for the Brochure static site
//! generator and its admin handlers.

pub mod config;
pub mod error;
pub mod frontmatter;

pub use config::{AuthConfig, BuildConfig, Config, ServerConfig};
pub use error::{CoreError, Result};
pub use frontmatter::{FrontMatter, SourceDocument, parse_front_matter};
