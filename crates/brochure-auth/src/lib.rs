//! Brochure Auth Library
//!
//! Session-based admin authentication.
//!
//! # Modules
//!
//! - [`session`] - Signed session token issuing and verification
//! - [`cookie`] - `Cookie` header parsing and `Set-Cookie` values
//! - [`gate`] - Admin gate authorizing requests from their cookies
//! - [`password`] - Argon2 password hashing
//! - [`settings`] - Secret and credential settings from the environment

pub mod cookie;
pub mod gate;
pub mod password;
pub mod session;
pub mod settings;

pub use cookie::{SESSION_COOKIE, clear_session_cookie, cookie_value, session_cookie};
pub use gate::{AdminGate, Unauthorized};
pub use password::{PasswordError, hash_password, verify_password};
pub use session::{SessionCodec, SessionError, SessionPayload, SessionToken, TokenRejection};
pub use settings::{AdminCredentials, AuthSettings, SessionSecret};
