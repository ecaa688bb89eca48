//! Session cookie construction.
//!
//! The session rides in a single cookie named `token`. Both the live and
//! the revoking cookie carry the same attribute set (path `/`, `HttpOnly`,
//! `SameSite=None`, `Secure`), so the revoking cookie always matches and
//! replaces the live one in the browser's jar.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Cookie lifetime, matching the token's one-day validity.
const SESSION_TTL: Duration = Duration::days(1);

fn base_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::None);
    cookie.set_secure(true);
    cookie
}

/// Build the session cookie carrying a freshly signed token.
#[must_use]
pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = base_cookie(token);
    cookie.set_expires(OffsetDateTime::now_utc() + SESSION_TTL);
    cookie
}

/// Build the logout cookie: empty value, already expired.
///
/// Logout is idempotent; sending this with no live session is harmless.
#[must_use]
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = base_cookie(String::new());
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum_extra::extract::cookie::Expiration;

    use super::*;

    fn expiry(cookie: &Cookie<'static>) -> OffsetDateTime {
        match cookie.expires().unwrap() {
            Expiration::DateTime(dt) => dt,
            Expiration::Session => panic!("expected an explicit expiry"),
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("some-token".to_string());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "some-token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.secure(), Some(true));

        let expires = expiry(&cookie);
        assert!(expires > OffsetDateTime::now_utc() + Duration::hours(23));
        assert!(expires <= OffsetDateTime::now_utc() + Duration::hours(25));
    }

    #[test]
    fn test_expired_cookie_revokes_session() {
        let cookie = expired_session_cookie();
        assert_eq!(cookie.name(), "token");
        assert!(cookie.value().is_empty());
        assert_eq!(expiry(&cookie), OffsetDateTime::UNIX_EPOCH);

        // Attributes must match the live cookie so the browser replaces it.
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.secure(), Some(true));
    }
}
