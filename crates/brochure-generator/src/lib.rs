//! Brochure Generator Library
//!
//! Static site generation engine for Brochure.
//!
//! # Modules
//!
//! - [`store`] - Read-only named document stores (templates, components)
//! - [`template`] - Template loading and placeholder substitution
//! - [`component`] - `<component src="...">` inclusion expansion
//! - [`page`] - Page generation from a source document
//! - [`build`] - Recursive site build orchestration

pub mod build;
pub mod component;
pub mod page;
pub mod store;
pub mod template;

pub use build::{BuildError, BuildStats, Builder};
pub use component::{ComponentError, ComponentExpander};
pub use page::{PageError, PageGenerator};
pub use store::DocumentStore;
pub use template::{Template, TemplateError, TemplateLoader};
