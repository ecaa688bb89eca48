//! Authentication service: registration, login, and session tokens.
//!
//! Passwords are hashed with Argon2id. Session tokens are handled by
//! [`TokenCodec`]; cookie plumbing lives in the middleware layer.

pub mod error;
pub mod token;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::PgPool;

use harvest_roster_core::{Email, MemberId, Role};

pub use error::AuthError;
pub use token::{Claims, TokenCodec};

use crate::db::{MemberRepository, RepositoryError, members::NewMember};
use crate::models::Member;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// A registration request, validated and persisted by
/// [`AuthService::register`].
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub designation: String,
    pub team: String,
    pub department: String,
    pub next_of_kin_name: String,
    pub next_of_kin_contact: String,
    pub next_of_kin_address: String,
    pub avatar: Option<String>,
    pub role: Role,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Account operations over the member repository.
pub struct AuthService<'a> {
    members: MemberRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service backed by the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            members: MemberRepository::new(pool),
        }
    }

    /// Register a new member.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword` on
    /// validation failure, `AuthError::EmailTaken` if the email is already
    /// on the roster.
    pub async fn register(&self, registration: Registration) -> Result<Member, AuthError> {
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;
        let password_hash = hash_password(&registration.password)?;

        let new = NewMember {
            email: &email,
            password_hash: &password_hash,
            name: &registration.name,
            phone: &registration.phone,
            address: &registration.address,
            designation: &registration.designation,
            team: &registration.team,
            department: &registration.department,
            next_of_kin_name: &registration.next_of_kin_name,
            next_of_kin_contact: &registration.next_of_kin_contact,
            next_of_kin_address: &registration.next_of_kin_address,
            avatar: registration.avatar.as_deref(),
            role: registration.role,
        };

        self.members.create(&new).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Repository(other),
        })
    }

    /// Verify credentials and return the member on success.
    ///
    /// A malformed email, an unknown email, and a wrong password all map to
    /// `AuthError::InvalidCredentials`; login never reveals which one failed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the credentials do not
    /// match a member.
    pub async fn login(&self, email: &str, password: &str) -> Result<Member, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let member = self
            .members
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &member.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(member)
    }

    /// Resolve verified token claims to the member they name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MemberNotFound` if the member was deleted after
    /// the token was issued.
    pub async fn resolve(&self, id: MemberId) -> Result<Member, AuthError> {
        self.members
            .get_by_id(id)
            .await?
            .ok_or(AuthError::MemberNotFound)
    }
}

/// Enforce the password strength policy.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` with a client-facing message.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Check a password against a stored Argon2 hash.
///
/// An unparseable stored hash verifies as `false` rather than erroring;
/// login treats it as a credential mismatch.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy_rejects_short_passwords() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn test_registration_debug_redacts_password() {
        let registration = Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
            phone: String::new(),
            address: String::new(),
            designation: String::new(),
            team: String::new(),
            department: String::new(),
            next_of_kin_name: String::new(),
            next_of_kin_contact: String::new(),
            next_of_kin_address: String::new(),
            avatar: None,
            role: Role::Worker,
        };
        let debug_output = format!("{registration:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter22"));
    }
}
