//! Signed session tokens.
//!
//! A token is `<base64 payload>.<hex signature>`:
//!
//! - the payload is the JSON object `{"username": ..., "exp": ...}` where
//!   `exp` is the expiry instant in milliseconds since the Unix epoch,
//!   encoded with the standard base64 alphabet (which has no `.`);
//! - the signature is HMAC-SHA256 over the base64 text, as lowercase hex.
//!
//! Tokens are never stored server-side. Verification is a pure function of
//! the secret, the token and the current instant.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::settings::SessionSecret;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 signature.
const SIGNATURE_HEX_LEN: usize = 64;

/// Errors raised while setting up a codec or issuing a token.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The signing secret is empty.
    #[error("session secret must not be empty")]
    EmptySecret,

    /// The signing key was rejected.
    #[error("invalid signing key: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),

    /// Payload serialization failed.
    #[error("failed to encode session payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a token was rejected. For logging only; never sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    /// No token, or an empty one.
    #[error("missing token")]
    Missing,

    /// The token is not two `.`-separated parts.
    #[error("malformed token")]
    Malformed,

    /// The signature does not match the payload.
    #[error("signature mismatch")]
    BadSignature,

    /// The payload is not valid base64 JSON of the expected shape.
    #[error("unreadable payload")]
    BadPayload,

    /// The token expired.
    #[error("token expired")]
    Expired,
}

/// Session claims carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Authenticated user.
    pub username: String,

    /// Expiry instant, milliseconds since the Unix epoch.
    pub exp: i64,
}

/// An encoded session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// The token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Issues and verifies session tokens with a fixed secret and lifetime.
#[derive(Clone)]
pub struct SessionCodec {
    mac: HmacSha256,
    ttl_millis: i64,
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec")
            .field("ttl_millis", &self.ttl_millis)
            .finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// Create a codec keyed with `secret` issuing tokens valid for
    /// `ttl_millis`.
    pub fn new(secret: &SessionSecret, ttl_millis: i64) -> Result<Self, SessionError> {
        if secret.expose().is_empty() {
            return Err(SessionError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(secret.expose())?;
        Ok(Self { mac, ttl_millis })
    }

    /// Token lifetime in milliseconds.
    #[must_use]
    pub fn ttl_millis(&self) -> i64 {
        self.ttl_millis
    }

    /// Issue a token for `username` expiring one lifetime from now.
    pub fn issue(&self, username: &str) -> Result<SessionToken, SessionError> {
        self.issue_at(username, now_millis())
    }

    /// Issue a token for `username` expiring one lifetime after `now_millis`.
    pub fn issue_at(&self, username: &str, now_millis: i64) -> Result<SessionToken, SessionError> {
        let payload = SessionPayload {
            username: username.to_string(),
            exp: now_millis.saturating_add(self.ttl_millis),
        };
        let encoded = STANDARD.encode(serde_json::to_vec(&payload)?);
        let signature = self.sign(&encoded);

        Ok(SessionToken(format!("{encoded}.{signature}")))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: Option<&str>) -> Result<SessionPayload, TokenRejection> {
        self.verify_at(token, now_millis())
    }

    /// Verify a token as of `now_millis`.
    ///
    /// The token is valid when its signature matches and its expiry is
    /// strictly after `now_millis`.
    pub fn verify_at(
        &self,
        token: Option<&str>,
        now_millis: i64,
    ) -> Result<SessionPayload, TokenRejection> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(TokenRejection::Missing)?;

        let mut parts = token.split('.');
        let (Some(encoded), Some(signature), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenRejection::Malformed);
        };

        self.check_signature(encoded, signature)?;

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|_| TokenRejection::BadPayload)?;
        let payload: SessionPayload =
            serde_json::from_slice(&bytes).map_err(|_| TokenRejection::BadPayload)?;

        if payload.exp <= now_millis {
            return Err(TokenRejection::Expired);
        }

        Ok(payload)
    }

    fn sign(&self, encoded: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(encoded.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Only the exact lowercase hex encoding is accepted. The byte comparison
    /// is constant-time.
    fn check_signature(&self, encoded: &str, signature: &str) -> Result<(), TokenRejection> {
        let well_formed = signature.len() == SIGNATURE_HEX_LEN
            && signature
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(TokenRejection::BadSignature);
        }

        let provided = hex::decode(signature).map_err(|_| TokenRejection::BadSignature)?;
        let mut mac = self.mac.clone();
        mac.update(encoded.as_bytes());
        mac.verify_slice(&provided)
            .map_err(|_| TokenRejection::BadSignature)
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;
    const HOUR: i64 = 3_600_000;

    fn codec() -> SessionCodec {
        SessionCodec::new(&SessionSecret::new("test-secret"), HOUR).unwrap()
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let codec = codec();
        let token = codec.issue_at("admin", NOW).unwrap();

        let payload = codec.verify_at(Some(token.as_str()), NOW).unwrap();
        assert_eq!(payload.username, "admin");
        assert_eq!(payload.exp, NOW + HOUR);
    }

    #[test]
    fn test_verify_with_real_clock() {
        let codec = codec();
        let token = codec.issue("admin").unwrap();

        assert_eq!(codec.verify(Some(token.as_str())).unwrap().username, "admin");
    }

    #[test]
    fn test_token_shape() {
        let token = codec().issue_at("admin", NOW).unwrap();
        let (payload, signature) = token.as_str().split_once('.').unwrap();

        assert_eq!(signature.len(), SIGNATURE_HEX_LEN);
        assert!(signature.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));

        let json = STANDARD.decode(payload).unwrap();
        assert_eq!(
            String::from_utf8(json).unwrap(),
            format!(r#"{{"username":"admin","exp":{}}}"#, NOW + HOUR)
        );
    }

    #[test]
    fn test_signature_matches_known_hmac() {
        let codec = codec();
        let token = codec.issue_at("admin", NOW).unwrap();
        let (payload, signature) = token.as_str().split_once('.').unwrap();

        let mut mac = HmacSha256::new_from_slice(b"test-secret").unwrap();
        mac.update(payload.as_bytes());
        assert_eq!(signature, hex::encode(mac.finalize().into_bytes()));
    }

    #[test]
    fn test_any_signature_mutation_is_rejected() {
        let codec = codec();
        let token = codec.issue_at("admin", NOW).unwrap().into_string();
        let dot = token.find('.').unwrap();

        for i in dot + 1..token.len() {
            let mut bytes = token.clone().into_bytes();
            for replacement in [b'0', b'f', b'A', b'.', b'z'] {
                if bytes[i] == replacement {
                    continue;
                }
                bytes[i] = replacement;
                let mutated = String::from_utf8(bytes.clone()).unwrap();
                assert!(
                    codec.verify_at(Some(&mutated), NOW).is_err(),
                    "mutation at {i} to {} accepted",
                    replacement as char
                );
            }
        }
    }

    #[test]
    fn test_payload_mutation_is_rejected() {
        let codec = codec();
        let token = codec.issue_at("admin", NOW).unwrap().into_string();
        let forged = format!("A{}", &token[1..]);

        assert_eq!(
            codec.verify_at(Some(&forged), NOW),
            Err(TokenRejection::BadSignature)
        );
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let codec = codec();
        let token = codec.issue_at("admin", NOW).unwrap();

        assert!(codec.verify_at(Some(token.as_str()), NOW + HOUR - 1).is_ok());
        assert_eq!(
            codec.verify_at(Some(token.as_str()), NOW + HOUR),
            Err(TokenRejection::Expired)
        );
        assert_eq!(
            codec.verify_at(Some(token.as_str()), NOW + 2 * HOUR),
            Err(TokenRejection::Expired)
        );
    }

    #[test]
    fn test_missing_and_empty_tokens() {
        let codec = codec();
        assert_eq!(codec.verify_at(None, NOW), Err(TokenRejection::Missing));
        assert_eq!(codec.verify_at(Some(""), NOW), Err(TokenRejection::Missing));
    }

    #[test]
    fn test_wrong_part_count() {
        let codec = codec();
        assert_eq!(
            codec.verify_at(Some("justonepart"), NOW),
            Err(TokenRejection::Malformed)
        );
        assert_eq!(
            codec.verify_at(Some("a.b.c"), NOW),
            Err(TokenRejection::Malformed)
        );
    }

    #[test]
    fn test_other_secret_rejects_token() {
        let token = codec().issue_at("admin", NOW).unwrap();
        let other = SessionCodec::new(&SessionSecret::new("other-secret"), HOUR).unwrap();

        assert_eq!(
            other.verify_at(Some(token.as_str()), NOW),
            Err(TokenRejection::BadSignature)
        );
    }

    #[test]
    fn test_signed_garbage_payload_is_rejected() {
        let codec = codec();

        let not_base64 = "%%%";
        let token = format!("{not_base64}.{}", codec.sign(not_base64));
        assert_eq!(
            codec.verify_at(Some(&token), NOW),
            Err(TokenRejection::BadPayload)
        );

        let wrong_shape = STANDARD.encode(br#"{"a":1}"#);
        let token = format!("{wrong_shape}.{}", codec.sign(&wrong_shape));
        assert_eq!(
            codec.verify_at(Some(&token), NOW),
            Err(TokenRejection::BadPayload)
        );
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let err = SessionCodec::new(&SessionSecret::new(""), HOUR).unwrap_err();
        assert!(matches!(err, SessionError::EmptySecret));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = codec().issue_at("admin", NOW).unwrap();
        assert_eq!(format!("{token:?}"), "SessionToken(..)");
    }
}
