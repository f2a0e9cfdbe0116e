//! Password login for the admin area.
//!
//! A single shared password (`ADMIN_PASSWORD`) unlocks the admin API. A
//! successful login mints a signed session token carried in the
//! `admin_session` cookie. There is no server-side session record, so
//! logging out only clears the cookie.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};

use bihar_bhojan_core::session::{SESSION_DURATION_MS, TokenError, TokenSigner, constant_time_eq};

/// Admin session cookie name.
pub const ADMIN_COOKIE_NAME: &str = "admin_session";

/// Errors from admin login. Display strings are shown to users.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// No admin password is configured.
    #[error("Admin authentication is not configured.")]
    NotConfigured,

    #[error("Invalid password.")]
    InvalidPassword,

    /// The session token could not be minted.
    #[error("Authentication failed. Please try again.")]
    Token(#[from] TokenError),
}

/// Checks the admin password and issues session tokens.
#[derive(Clone)]
pub struct AdminAuthService {
    password: Option<SecretString>,
    signer: TokenSigner,
    secure_cookies: bool,
}

impl std::fmt::Debug for AdminAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthService")
            .field("configured", &self.password.is_some())
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}

impl AdminAuthService {
    #[must_use]
    pub const fn new(password: Option<SecretString>, signer: TokenSigner, secure_cookies: bool) -> Self {
        Self {
            password,
            signer,
            secure_cookies,
        }
    }

    /// Check `password` and mint a session token valid from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminAuthError::NotConfigured`] when no password is set,
    /// [`AdminAuthError::InvalidPassword`] on mismatch.
    pub fn authenticate(&self, password: &str, now: DateTime<Utc>) -> Result<String, AdminAuthError> {
        let Some(expected) = &self.password else {
            tracing::error!("ADMIN_PASSWORD environment variable not set");
            return Err(AdminAuthError::NotConfigured);
        };

        if !constant_time_eq(password, expected.expose_secret()) {
            tracing::warn!("Admin login failed: invalid password");
            return Err(AdminAuthError::InvalidPassword);
        }

        let token = self.signer.mint(now)?;
        tracing::info!("Admin logged in");
        Ok(token)
    }

    /// Whether `token` is a valid, unexpired admin session at `now`.
    #[must_use]
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.signer.verify(token, now)
    }

    /// Cookie carrying a freshly minted token.
    #[must_use]
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((ADMIN_COOKIE_NAME, token))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(Duration::milliseconds(SESSION_DURATION_MS))
            .path("/")
            .build()
    }

    /// Cookie that makes the browser drop the session cookie.
    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((ADMIN_COOKIE_NAME, ""))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .build();
        cookie.make_removal();
        cookie
    }
}

/// Find the admin session token in a `Cookie` request header value.
#[must_use]
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == ADMIN_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(SecretString::from("k7Pq9xR2mW4vT8zL1nB6cY3hJ5fD0gS".to_owned()))
    }

    fn service(password: Option<&str>) -> AdminAuthService {
        AdminAuthService::new(password.map(|p| SecretString::from(p.to_owned())), signer(), true)
    }

    #[test]
    fn test_correct_password_mints_verifiable_token() {
        let service = service(Some("tandoori-nights"));
        let now = Utc::now();
        let token = service.authenticate("tandoori-nights", now).unwrap();
        assert!(service.verify(&token, now));
    }

    #[test]
    fn test_wrong_password() {
        let err = service(Some("tandoori-nights"))
            .authenticate("tandoori-night", Utc::now())
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid password.");
    }

    #[test]
    fn test_not_configured() {
        let err = service(None).authenticate("anything-at-all", Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Admin authentication is not configured.");
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = service(Some("tandoori-nights")).session_cookie("abc.def".to_owned());
        let header = cookie.to_string();
        assert!(header.starts_with("admin_session=abc.def"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=86400"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let header = service(None).removal_cookie().to_string();
        assert!(header.starts_with("admin_session=;"));
        assert!(header.contains("Max-Age=0"));
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(
            token_from_cookie_header("bb_session=xyz; admin_session=abc.def").as_deref(),
            Some("abc.def")
        );
        assert_eq!(token_from_cookie_header("bb_session=xyz"), None);
        assert_eq!(token_from_cookie_header("admin_session="), None);
    }
}
