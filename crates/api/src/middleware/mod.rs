//! Request middleware: session cookies and auth gates.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth, ensure_admin};
pub use session::{SESSION_COOKIE, expired_session_cookie, session_cookie};
