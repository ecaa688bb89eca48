//! Authentication error types.

use thiserror::Error;

use harvest_roster_core::EmailError;

use crate::db::RepositoryError;

/// Errors from registration, login, and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password did not match a member.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token claims name a member that no longer exists.
    #[error("member not found")]
    MemberNotFound,

    /// Registration attempted with an email already on the roster.
    #[error("email already registered")]
    EmailTaken,

    /// Password failed the strength policy.
    #[error("{0}")]
    WeakPassword(String),

    /// Email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Session token is malformed, expired, or fails signature
    /// verification under the role-selected key.
    #[error("invalid session token")]
    InvalidToken,

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    /// Password hashing or verification failed unexpectedly.
    #[error("password hashing failed")]
    PasswordHash,

    /// Underlying repository failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
