//! Signed session cookie and one-shot flash messages.
//!
//! The session cookie carries `<user-id>.<hmac-sha256-hex>`, keyed by the
//! configured session secret. Anything that fails to verify is treated as
//! "not logged in", never as an error. Credential checking happens outside
//! this application; the cookie only proves we minted it for that user.
//!
//! Flash messages ride in a separate hex-encoded cookie set next to a
//! mutation redirect and cleared by the next page render.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use plantrack_db::models::User;
use plantrack_db::queries::users;

use crate::error::AppError;
use crate::routes::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// Secret used to sign session cookies.
#[derive(Clone)]
pub struct SessionKey(Vec<u8>);

impl SessionKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

fn mac_for(key: &SessionKey) -> HmacSha256 {
    // HMAC accepts keys of any length, so this cannot fail.
    HmacSha256::new_from_slice(&key.0).expect("HMAC accepts any key length")
}

/// Produce the signed cookie value for a user id.
pub fn sign_session(key: &SessionKey, user_id: Uuid) -> String {
    let mut mac = mac_for(key);
    mac.update(user_id.as_bytes());
    format!("{user_id}.{}", hex::encode(mac.finalize().into_bytes()))
}

/// Verify a cookie value and extract the user id. `None` on any mismatch.
pub fn verify_session(key: &SessionKey, value: &str) -> Option<Uuid> {
    let (id_part, mac_hex) = value.split_once('.')?;
    let user_id = Uuid::parse_str(id_part).ok()?;
    let sig = hex::decode(mac_hex).ok()?;
    let mut mac = mac_for(key);
    mac.update(user_id.as_bytes());
    mac.verify_slice(&sig).ok()?;
    Some(user_id)
}

// -----------------------------------------------------------------------
// Cookie builders
// -----------------------------------------------------------------------

/// Set-Cookie value establishing a session for `user_id`.
pub fn session_cookie(key: &SessionKey, user_id: Uuid) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400",
        sign_session(key, user_id)
    )
}

/// Set-Cookie value removing the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Set-Cookie value carrying a one-shot flash message. Hex-encoded so any
/// UTF-8 message survives cookie syntax.
pub fn flash_cookie(message: &str) -> String {
    format!(
        "{FLASH_COOKIE}={}; Path=/; Max-Age=60",
        hex::encode(message.as_bytes())
    )
}

/// Set-Cookie value clearing the flash after display.
pub fn clear_flash_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; Max-Age=0")
}

/// Extract a named cookie's raw value from request headers.
pub fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Read the flash message, if any. Undecodable cookies are ignored.
pub fn take_flash(headers: &HeaderMap) -> Option<String> {
    let raw = cookie_value(headers, FLASH_COOKIE)?;
    if raw.is_empty() {
        return None;
    }
    let bytes = hex::decode(raw).ok()?;
    String::from_utf8(bytes).ok()
}

// -----------------------------------------------------------------------
// Extractor
// -----------------------------------------------------------------------

/// The requester's identity, resolved from the signed session cookie.
///
/// Extraction never rejects on a bad or stale cookie; `user` is simply
/// `None`. Handlers that need a login call [`AuthSession::require`].
pub struct AuthSession {
    pub user: Option<User>,
}

impl AuthSession {
    /// Return the logged-in user or fail with a redirect to `/login?next=…`.
    pub fn require(self, next: &str) -> Result<User, AppError> {
        self.user.ok_or_else(|| AppError::login_required(next))
    }
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = cookie_value(&parts.headers, SESSION_COOKIE)
            .and_then(|raw| verify_session(&state.session_key, raw));

        let user = match user_id {
            Some(id) => users::get_user(&state.pool, id)
                .await
                .map_err(AppError::internal)?,
            None => None,
        };

        Ok(Self { user })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn key() -> SessionKey {
        SessionKey::new(vec![42u8; 32])
    }

    #[test]
    fn sign_verify_roundtrip() {
        let user_id = Uuid::new_v4();
        let value = sign_session(&key(), user_id);
        assert_eq!(verify_session(&key(), &value), Some(user_id));
    }

    #[test]
    fn tampered_id_is_rejected() {
        let value = sign_session(&key(), Uuid::new_v4());
        let (_, mac) = value.split_once('.').unwrap();
        let forged = format!("{}.{mac}", Uuid::new_v4());
        assert_eq!(verify_session(&key(), &forged), None);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let user_id = Uuid::new_v4();
        let value = sign_session(&key(), user_id);
        let other = SessionKey::new(vec![7u8; 32]);
        assert_eq!(verify_session(&other, &value), None);
    }

    #[test]
    fn garbage_values_are_rejected() {
        assert_eq!(verify_session(&key(), ""), None);
        assert_eq!(verify_session(&key(), "no-dot-here"), None);
        assert_eq!(verify_session(&key(), "not-a-uuid.abcdef"), None);
    }

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("a=1; session=xyz; flash=6869"),
        );
        assert_eq!(cookie_value(&headers, "session"), Some("xyz"));
        assert_eq!(cookie_value(&headers, "flash"), Some("6869"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn flash_roundtrips_utf8() {
        let cookie = flash_cookie("Task ünïcode marked as done");
        let value = cookie
            .strip_prefix("flash=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("flash={value}")).unwrap(),
        );
        assert_eq!(
            take_flash(&headers).as_deref(),
            Some("Task ünïcode marked as done")
        );
    }

    #[test]
    fn empty_or_bad_flash_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash="));
        assert_eq!(take_flash(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=zzzz"));
        assert_eq!(take_flash(&headers), None);
    }
}
