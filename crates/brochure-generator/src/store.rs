//! Read-only stores of named text documents.
//!
//! Templates and components both live in a flat-or-nested directory and are
//! addressed by a relative name such as `page.html` or `nav/header.html`.
//! Documents are read fresh on every lookup; nothing is cached.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

/// A directory of named documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a document name to a path inside the store.
    ///
    /// Returns `None` for names that are empty, absolute or that step outside
    /// the root (`..`).
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let mut components = relative.components().peekable();
        components.peek()?;

        if components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
            Some(self.root.join(relative))
        } else {
            None
        }
    }

    /// Read a document by name.
    ///
    /// `Ok(None)` means the document does not exist (or the name is not a
    /// valid store name). Other I/O failures are returned as errors.
    pub fn read(&self, name: &str) -> io::Result<Option<String>> {
        let Some(path) = self.resolve(name) else {
            return Ok(None);
        };

        if !path.is_file() {
            return Ok(None);
        }

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
