//! HTTP route handlers for the roster API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register      - Self-registration (always worker role)
//! POST /api/auth/login         - Login, sets session cookie
//! POST /api/auth/logout        - Logout, expires session cookie
//! GET  /api/auth/status        - Session liveness probe (bare boolean)
//!
//! # Profile (requires auth)
//! GET  /api/members/me         - Own profile
//! PUT  /api/members/me         - Update own profile (multipart, avatar upload)
//!
//! # Roster (requires admin)
//! POST   /api/members          - Create member with explicit role
//! GET    /api/members          - List all members
//! PUT    /api/members/{id}     - Update a member's profile
//! DELETE /api/members/{id}     - Remove a member
//! ```

pub mod auth;
pub mod members;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/status", get(auth::login_status))
}

/// Create the member routes router.
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(members::me).put(members::update_me))
        .route("/", post(members::create_member).get(members::list_members))
        .route(
            "/{id}",
            put(members::update_member).delete(members::delete_member),
        )
}

/// Assemble the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/members", member_routes())
}
