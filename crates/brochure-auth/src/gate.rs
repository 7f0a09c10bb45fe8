//! Admin gate.
//!
//! Authorizes a request from its `Cookie` header. Callers only learn whether
//! access is granted; the rejection cause is logged at debug level and goes
//! no further.

use thiserror::Error;
use tracing::debug;

use crate::{
    cookie::{SESSION_COOKIE, cookie_value},
    session::{SessionCodec, SessionPayload, TokenRejection},
};

/// Access denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unauthorized")]
pub struct Unauthorized;

/// Checks session cookies against a session codec.
#[derive(Debug, Clone)]
pub struct AdminGate {
    codec: SessionCodec,
}

impl AdminGate {
    /// Create a gate around a codec.
    #[must_use]
    pub fn new(codec: SessionCodec) -> Self {
        Self { codec }
    }

    /// The underlying codec.
    #[must_use]
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Authorize a request given its `Cookie` header, if any.
    pub fn authorize(&self, cookie_header: Option<&str>) -> Result<SessionPayload, Unauthorized> {
        let token = cookie_header.and_then(|h| cookie_value(h, SESSION_COOKIE));
        self.check(self.codec.verify(token))
    }

    /// Authorize as of `now_millis`.
    pub fn authorize_at(
        &self,
        cookie_header: Option<&str>,
        now_millis: i64,
    ) -> Result<SessionPayload, Unauthorized> {
        let token = cookie_header.and_then(|h| cookie_value(h, SESSION_COOKIE));
        self.check(self.codec.verify_at(token, now_millis))
    }

    fn check(
        &self,
        verified: Result<SessionPayload, TokenRejection>,
    ) -> Result<SessionPayload, Unauthorized> {
        verified.map_err(|reason| {
            debug!(%reason, "session rejected");
            Unauthorized
        })
    }
}
