//! Secret and credential settings.
//!
//! Secrets come from the process environment, never from the config file:
//!
//! - `SESSION_SECRET`: HMAC key for session tokens
//! - `ADMIN_USERNAME`: the single admin account name
//! - `ADMIN_PASSWORD_HASH`: argon2 PHC hash of the admin password

use std::fmt;

use argon2::password_hash::PasswordHash;
use brochure_core::{AuthConfig, CoreError};

use crate::password::{PasswordError, verify_password};

/// Environment variable holding the session secret.
pub const SESSION_SECRET_VAR: &str = "SESSION_SECRET";

/// Environment variable holding the admin username.
pub const ADMIN_USERNAME_VAR: &str = "ADMIN_USERNAME";

/// Environment variable holding the admin password hash.
pub const ADMIN_PASSWORD_HASH_VAR: &str = "ADMIN_PASSWORD_HASH";

/// Session signing secret. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSecret(Vec<u8>);

impl SessionSecret {
    /// Wrap secret bytes.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// The raw secret bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

/// The single admin account.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AdminCredentials {
    /// Create credentials from a username and an argon2 PHC hash.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// The admin username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a login attempt.
    ///
    /// `Ok(false)` for a wrong username or password. `Err` only when the
    /// stored hash itself is unusable.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, PasswordError> {
        if username != self.username {
            return Ok(false);
        }
        verify_password(password, &self.password_hash)
    }
}

/// Everything the auth handlers need, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HMAC key for session tokens.
    pub secret: SessionSecret,

    /// Admin account.
    pub admin: AdminCredentials,

    /// Session lifetime in milliseconds.
    pub session_ttl_millis: i64,
}

impl AuthSettings {
    /// Load settings from the process environment.
    pub fn from_env(config: &AuthConfig) -> Result<Self, CoreError> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(
        config: &AuthConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CoreError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(CoreError::MissingEnv(name))
        };

        let secret = SessionSecret::new(required(SESSION_SECRET_VAR)?);
        let username = required(ADMIN_USERNAME_VAR)?;
        let password_hash = required(ADMIN_PASSWORD_HASH_VAR)?;

        PasswordHash::new(&password_hash).map_err(|e| {
            CoreError::config(format!("{ADMIN_PASSWORD_HASH_VAR} is not a PHC hash: {e}"))
        })?;

        tracing::info!(
            admin = %username,
            session_ttl_secs = config.session_ttl_secs,
            "auth settings loaded"
        );

        Ok(Self {
            secret,
            admin: AdminCredentials::new(username, password_hash),
            session_ttl_millis: config.session_ttl_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::password::hash_password;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_lookup_complete() {
        let hash = hash_password("hunter2").unwrap();
        let vars = env(&[
            (SESSION_SECRET_VAR, "s3cret"),
            (ADMIN_USERNAME_VAR, "admin"),
            (ADMIN_PASSWORD_HASH_VAR, &hash),
        ]);

        let settings =
            AuthSettings::from_lookup(&AuthConfig::default(), |k| vars.get(k).cloned()).unwrap();

        assert_eq!(settings.secret.expose(), b"s3cret");
        assert_eq!(settings.admin.username(), "admin");
        assert_eq!(settings.session_ttl_millis, 3_600_000);
        assert!(settings.admin.verify("admin", "hunter2").unwrap());
        assert!(!settings.admin.verify("admin", "wrong").unwrap());
        assert!(!settings.admin.verify("root", "hunter2").unwrap());
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let vars = env(&[(ADMIN_USERNAME_VAR, "admin")]);

        let err = AuthSettings::from_lookup(&AuthConfig::default(), |k| vars.get(k).cloned())
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingEnv(SESSION_SECRET_VAR)));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let vars = env(&[
            (SESSION_SECRET_VAR, "s"),
            (ADMIN_USERNAME_VAR, "   "),
            (ADMIN_PASSWORD_HASH_VAR, "x"),
        ]);

        let err = AuthSettings::from_lookup(&AuthConfig::default(), |k| vars.get(k).cloned())
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingEnv(ADMIN_USERNAME_VAR)));
    }

    #[test]
    fn test_invalid_hash_is_config_error() {
        let vars = env(&[
            (SESSION_SECRET_VAR, "s"),
            (ADMIN_USERNAME_VAR, "admin"),
            (ADMIN_PASSWORD_HASH_VAR, "plaintext-password"),
        ]);

        let err = AuthSettings::from_lookup(&AuthConfig::default(), |k| vars.get(k).cloned())
            .unwrap_err();
        assert!(err.to_string().contains("ADMIN_PASSWORD_HASH"));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let secret = SessionSecret::new("top-secret");
        let creds = AdminCredentials::new("admin", "$argon2id$v=19$hash");

        assert!(!format!("{secret:?}").contains("top-secret"));
        assert!(!format!("{creds:?}").contains("argon2id"));
    }
}
