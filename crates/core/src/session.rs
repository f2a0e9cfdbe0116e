//! Signed admin session tokens.
//!
//! A token is two dot-joined base64url segments: the JSON payload, then an
//! HMAC-SHA256 over the payload segment. Tokens live for a fixed 24 hours
//! and cannot be revoked early; logging out only drops the cookie.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// How long a freshly minted token stays valid, in milliseconds (24 hours).
pub const SESSION_DURATION_MS: i64 = 24 * 60 * 60 * 1000;

/// Errors that can occur when minting a token.
#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("invalid signing key: {0}")]
    Key(String),
    #[error("failed to encode session payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Claims carried inside an admin token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub authenticated: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

impl AdminSession {
    /// A session starting at `now` and lasting [`SESSION_DURATION_MS`].
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        let created_at = now.timestamp_millis();
        Self {
            authenticated: true,
            created_at,
            expires_at: created_at + SESSION_DURATION_MS,
        }
    }

    /// Whether the session is authenticated and not yet past its expiry.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.authenticated && now.timestamp_millis() <= self.expires_at
    }
}

/// Mints and checks admin session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| TokenError::Key(e.to_string()))
    }

    /// Sign `session` into a token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized or the key is
    /// rejected by the MAC.
    pub fn sign(&self, session: &AdminSession) -> Result<String, TokenError> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(session)?);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Mint a token for a session starting at `now`.
    ///
    /// # Errors
    ///
    /// See [`TokenSigner::sign`].
    pub fn mint(&self, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.sign(&AdminSession::starting_at(now))
    }

    /// Check the signature and decode the payload.
    ///
    /// Returns `None` for anything malformed or forged. Expiry is not
    /// checked here.
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<AdminSession> {
        let (payload, signature) = token.split_once('.')?;
        if payload.is_empty() || signature.is_empty() || signature.contains('.') {
            return None;
        }

        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// Whether `token` is a genuine, authenticated, unexpired session at `now`.
    #[must_use]
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.decode(token)
            .is_some_and(|session| session.is_valid_at(now))
    }
}

/// Compare two strings without short-circuiting on the first differing byte.
///
/// Length differences still return early; only the contents are protected.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn signer() -> TokenSigner {
        TokenSigner::new(SecretString::from("a-long-test-signing-secret-value-123".to_owned()))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_token_valid_within_window() {
        let token = signer().mint(t0()).unwrap();
        assert!(signer().verify(&token, t0()));
        assert!(signer().verify(&token, t0() + Duration::hours(23) + Duration::minutes(59)));
        assert!(signer().verify(&token, t0() + Duration::hours(24)));
    }

    #[test]
    fn test_token_expires_after_window() {
        let token = signer().mint(t0()).unwrap();
        assert!(!signer().verify(&token, t0() + Duration::hours(24) + Duration::seconds(1)));
    }

    #[test]
    fn test_payload_shape() {
        let token = signer().mint(t0()).unwrap();
        let (payload, _) = token.split_once('.').unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
        assert_eq!(json["authenticated"], true);
        assert_eq!(json["createdAt"], t0().timestamp_millis());
        assert_eq!(
            json["expiresAt"],
            t0().timestamp_millis() + 24 * 60 * 60 * 1000
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = signer().mint(t0()).unwrap();
        let other = TokenSigner::new(SecretString::from("another-secret-entirely-different-456".to_owned()));
        assert!(!other.verify(&token, t0()));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = signer().mint(t0()).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged = AdminSession {
            authenticated: true,
            created_at: t0().timestamp_millis(),
            expires_at: i64::MAX,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        assert!(!signer().verify(&format!("{forged_payload}.{signature}"), t0()));
    }

    #[test]
    fn test_unauthenticated_payload_rejected() {
        let session = AdminSession {
            authenticated: false,
            ..AdminSession::starting_at(t0())
        };
        let token = signer().sign(&session).unwrap();
        assert!(signer().decode(&token).is_some());
        assert!(!signer().verify(&token, t0()));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let token = signer().mint(t0()).unwrap();
        let extra_segment = format!("{token}.extra");
        let no_dot = token.replace('.', "");
        for bad in [
            "",
            ".",
            "no-dot-here",
            "!!!.???",
            extra_segment.as_str(),
            no_dot.as_str(),
        ] {
            assert!(!signer().verify(bad, t0()), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("hunter22", "hunter22"));
        assert!(!constant_time_eq("hunter22", "hunter23"));
        assert!(!constant_time_eq("short", "longer"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", signer());
        assert!(!debug.contains("signing-secret"));
    }
}
