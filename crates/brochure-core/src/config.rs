//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Brochure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session settings. Secrets are never read from the config file.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding source pages.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Output directory for the generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory holding page templates.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Directory holding component fragments.
    #[serde(default = "default_components_dir")]
    pub components_dir: PathBuf,

    /// Template used when a page names none.
    #[serde(default = "default_template")]
    pub default_template: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8888").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory for the file-backed blob stores.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session lifetime in seconds. Also used as the cookie `Max-Age`.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

// Default value functions
fn default_source_dir() -> PathBuf {
    PathBuf::from("pages")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_components_dir() -> PathBuf {
    PathBuf::from("components")
}

fn default_template() -> String {
    "page.html".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8888".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_session_ttl_secs() -> u64 {
    3600
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            templates_dir: default_templates_dir(),
            components_dir: default_components_dir(),
            default_template: default_template(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl AuthConfig {
    /// Session lifetime in milliseconds.
    #[must_use]
    pub fn session_ttl_millis(&self) -> i64 {
        i64::try_from(self.session_ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `BROCHURE__*`
    /// environment variables over the optional file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), exists = path.exists(), "loading configuration");
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("BROCHURE").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.build.default_template.trim().is_empty() {
            return Err(CoreError::config("build.default_template cannot be empty"));
        }

        if self.build.source_dir == self.build.output_dir {
            return Err(CoreError::config(
                "build.source_dir and build.output_dir must differ",
            ));
        }

        if self.auth.session_ttl_secs == 0 {
            return Err(CoreError::config("auth.session_ttl_secs must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[build]
source_dir = "content"
output_dir = "dist"
templates_dir = "layout"
components_dir = "partials"
default_template = "base.html"

[server]
bind_addr = "0.0.0.0:9000"
data_dir = "/var/lib/brochure"

[auth]
session_ttl_secs = 600
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("brochure.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.build.source_dir, PathBuf::from("content"));
        assert_eq!(config.build.output_dir, PathBuf::from("dist"));
        assert_eq!(config.build.templates_dir, PathBuf::from("layout"));
        assert_eq!(config.build.components_dir, PathBuf::from("partials"));
        assert_eq!(config.build.default_template, "base.html");
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.server.data_dir, PathBuf::from("/var/lib/brochure"));
        assert_eq!(config.auth.session_ttl_secs, 600);
        assert_eq!(config.auth.session_ttl_millis(), 600_000);
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("brochure.toml");
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.build.source_dir, PathBuf::from("pages"));
        assert_eq!(config.build.output_dir, PathBuf::from("public"));
        assert_eq!(config.build.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.build.components_dir, PathBuf::from("components"));
        assert_eq!(config.build.default_template, "page.html");
        assert_eq!(config.server.bind_addr, "127.0.0.1:8888");
        assert_eq!(config.auth.session_ttl_secs, 3600);
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/brochure.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_config_validation_same_dirs() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("brochure.toml");
        std::fs::write(
            &config_path,
            "[build]\nsource_dir = \"site\"\noutput_dir = \"site\"\n",
        )
        .expect("write");

        let result = Config::load(&config_path);
        assert!(result.unwrap_err().to_string().contains("must differ"));
    }

    #[test]
    fn test_config_validation_zero_ttl() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("brochure.toml");
        std::fs::write(&config_path, "[auth]\nsession_ttl_secs = 0\n").expect("write");

        let result = Config::load(&config_path);
        assert!(result.unwrap_err().to_string().contains("session_ttl_secs"));
    }

    #[test]
    fn test_config_parse_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("brochure.toml");
        std::fs::write(&config_path, "[build\n").expect("write");

        let result = Config::load(&config_path);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse config file")
        );
    }

    #[test]
    fn test_load_with_env_without_file() {
        let config = Config::load_with_env(Path::new("/nonexistent/brochure.toml"))
            .expect("load with env");
        assert_eq!(config.auth.session_ttl_secs, 3600);
    }
}
