//! Authentication route handlers.
//!
//! Registration and login return the member with a fresh token and also
//! set the session cookie; logout replaces the cookie with an expired one.
//! The status probe reports whether the request carries a live session and
//! never fails.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use harvest_roster_core::Role;

use crate::error::{AppError, Result};
use crate::middleware::{SESSION_COOKIE, expired_session_cookie, session_cookie};
use crate::models::CurrentMember;
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub next_of_kin_name: String,
    #[serde(default)]
    pub next_of_kin_contact: String,
    #[serde(default)]
    pub next_of_kin_address: String,
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Member plus a fresh session token, returned by register and login.
#[derive(Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub member: CurrentMember,
    pub token: String,
}

/// Simple message response.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl RegisterForm {
    /// Every profile field is required at registration; only the avatar is
    /// optional. Blank-padded values count as missing.
    pub(crate) fn validate_required_fields(&self) -> Result<()> {
        let required = [
            &self.name,
            &self.email,
            &self.password,
            &self.phone,
            &self.address,
            &self.designation,
            &self.team,
            &self.department,
            &self.next_of_kin_name,
            &self.next_of_kin_contact,
            &self.next_of_kin_address,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::BadRequest(
                "Please fill in all required fields".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<RegisterForm> for Registration {
    fn from(form: RegisterForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            password: form.password,
            phone: form.phone,
            address: form.address,
            designation: form.designation,
            team: form.team,
            department: form.department,
            next_of_kin_name: form.next_of_kin_name,
            next_of_kin_contact: form.next_of_kin_contact,
            next_of_kin_address: form.next_of_kin_address,
            avatar: None,
            role: Role::Worker,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/auth/register` - Self-registration, always as a worker.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<RegisterForm>,
) -> Result<(CookieJar, (StatusCode, Json<AuthResponse>))> {
    form.validate_required_fields()?;

    let member = AuthService::new(state.pool())
        .register(form.into())
        .await?;

    tracing::info!(member_id = %member.id, "member registered");

    let token = state
        .tokens()
        .sign(member.id, member.role)
        .map_err(AuthError::TokenSigning)?;
    let jar = jar.add(session_cookie(token.clone()));

    let body = AuthResponse {
        member: member.into(),
        token,
    };
    Ok((jar, (StatusCode::CREATED, Json(body))))
}

/// `POST /api/auth/login` - Verify credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let member = AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await?;

    tracing::info!(member_id = %member.id, "member logged in");

    let token = state
        .tokens()
        .sign(member.id, member.role)
        .map_err(AuthError::TokenSigning)?;
    let jar = jar.add(session_cookie(token.clone()));

    let body = AuthResponse {
        member: member.into(),
        token,
    };
    Ok((jar, Json(body)))
}

/// `POST /api/auth/logout` - Replace the session cookie with an expired one.
///
/// Idempotent: succeeds whether or not a live session was attached.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(expired_session_cookie());
    (
        jar,
        Json(MessageResponse {
            message: "Successfully logged out",
        }),
    )
}

/// `GET /api/auth/status` - Report whether the request carries a live
/// session.
///
/// Returns a bare boolean and never errors: no cookie, a malformed token,
/// and an expired token are all simply `false`.
pub async fn login_status(State(state): State<AppState>, jar: CookieJar) -> Json<bool> {
    let live = jar
        .get(SESSION_COOKIE)
        .is_some_and(|cookie| state.tokens().verify(cookie.value()).is_ok());
    Json(live)
}
