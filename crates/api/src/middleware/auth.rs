//! Authentication and authorization extractors.
//!
//! [`RequireAuth`] gates a route on a valid session: cookie present, token
//! verified under the role-selected key, and the member still on the
//! roster. Every failure along that path surfaces as the same generic 401.
//!
//! [`RequireAdmin`] runs the full authentication gate first and only then
//! checks the role, so an unauthenticated caller probing an admin route
//! sees 401, not 403.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use harvest_roster_core::Role;

use super::session::SESSION_COOKIE;
use crate::error::AppError;
use crate::models::CurrentMember;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Extractor requiring a valid session.
///
/// On success the request proceeds with the password-free member attached;
/// it is also inserted into request extensions for downstream layers.
pub struct RequireAuth(pub CurrentMember);

/// Extractor requiring a valid session with the admin role.
pub struct RequireAdmin(pub CurrentMember);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .ok_or(AppError::Unauthenticated)?;

        let claims = state.tokens().verify(&token).map_err(|error| {
            tracing::debug!(%error, "session token rejected");
            AppError::Auth(AuthError::InvalidToken)
        })?;

        let member = AuthService::new(state.pool())
            .resolve(claims.member_id())
            .await?;

        let current = CurrentMember::from(member);
        parts.extensions.insert(current.clone());

        Ok(Self(current))
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(member) = RequireAuth::from_request_parts(parts, state).await?;
        ensure_admin(Some(&member))?;
        Ok(Self(member))
    }
}

/// Fail-closed admin check: only an authenticated member whose role is
/// admin passes; an absent member is always forbidden.
///
/// # Errors
///
/// Returns `AppError::Forbidden` for everyone else.
pub fn ensure_admin(member: Option<&CurrentMember>) -> Result<(), AppError> {
    match member {
        Some(member) if member.role == Role::Admin => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}
