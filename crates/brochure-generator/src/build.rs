//! Build orchestration.
//!
//! Walks the source tree and mirrors it into the output tree. Directories are
//! recreated, `.html` documents are generated, anything else is skipped.
//! The first error aborts the build.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use brochure_core::BuildConfig;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::page::{PageError, PageGenerator};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error on a specific path.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Page generation error.
    #[error("page error in {path}: {source}")]
    Page {
        path: PathBuf,
        #[source]
        source: PageError,
    },

    /// Source directory is missing.
    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages generated.
    pub pages: usize,

    /// Number of directories mirrored.
    pub directories: usize,

    /// Number of non-HTML files left untouched.
    pub skipped: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that mirrors a source tree into an output tree.
#[derive(Debug)]
pub struct Builder {
    generator: PageGenerator,
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        generator: PageGenerator,
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator,
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create a builder from build settings.
    #[must_use]
    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(
            PageGenerator::from_config(config),
            &config.source_dir,
            &config.output_dir,
        )
    }

    /// Override the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Execute the build.
    ///
    /// Entries are visited depth-first in file-name order so repeated builds
    /// of the same tree produce identical output. Existing output files are
    /// overwritten; nothing is deleted.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            source = %self.source_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        if !self.source_dir.is_dir() {
            return Err(BuildError::MissingSource(self.source_dir.clone()));
        }

        fs::create_dir_all(&self.output_dir).map_err(|source| BuildError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        for entry in WalkDir::new(&self.source_dir)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            let out_path = self.output_path(path);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&out_path).map_err(|source| BuildError::Io {
                    path: out_path.clone(),
                    source,
                })?;
                stats.directories += 1;
            } else if entry.file_type().is_file() && is_html(path) {
                self.write_page(path, &out_path)?;
                stats.pages += 1;
            } else {
                debug!(path = %path.display(), "skipping non-html entry");
                stats.skipped += 1;
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            directories = stats.directories,
            skipped = stats.skipped,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Mirror a source path into the output tree.
    fn output_path(&self, source: &Path) -> PathBuf {
        let relative = source.strip_prefix(&self.source_dir).unwrap_or(source);
        self.output_dir.join(relative)
    }

    fn write_page(&self, source: &Path, out_path: &Path) -> Result<()> {
        let html = self
            .generator
            .generate(source)
            .map_err(|e| BuildError::Page {
                path: source.to_path_buf(),
                source: e,
            })?;

        fs::write(out_path, html).map_err(|source| BuildError::Io {
            path: out_path.to_path_buf(),
            source,
        })?;

        debug!(path = %out_path.display(), "wrote page");
        Ok(())
    }
}

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}
