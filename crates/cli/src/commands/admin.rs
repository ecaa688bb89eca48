//! Admin member management commands.
//!
//! # Usage
//!
//! ```bash
//! roster-cli admin create -e admin@example.com -n "Admin Name" -p "strong password"
//! ```
//!
//! # Environment Variables
//!
//! - `ROSTER_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher};
use sqlx::PgPool;
use thiserror::Error;

use harvest_roster_core::{Email, Role};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too short.
    #[error("Password must be at least 6 characters")]
    WeakPassword,

    /// Member already exists.
    #[error("Member already exists with email: {0}")]
    MemberExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new admin member.
///
/// # Returns
///
/// The ID of the created member.
///
/// # Errors
///
/// Returns `AdminError` on validation failure, a duplicate email, or a
/// database error.
pub async fn create_admin(
    email: &str,
    name: &str,
    password: &str,
    phone: &str,
    designation: &str,
) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    if password.len() < 6 {
        return Err(AdminError::WeakPassword);
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AdminError::PasswordHash)?
        .to_string();

    let database_url = std::env::var("ROSTER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("ROSTER_DATABASE_URL"))?;

    tracing::info!("Connecting to roster database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin member: {}", email);

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM member WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AdminError::MemberExists(email.as_str().to_owned()));
    }

    let member_id: i32 = sqlx::query_scalar(
        "INSERT INTO member (email, password_hash, name, phone, address, designation, \
         team, department, next_of_kin_name, next_of_kin_contact, next_of_kin_address, role) \
         VALUES ($1, $2, $3, $4, '', $5, '', '', '', '', '', $6) \
         RETURNING id",
    )
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(name)
    .bind(phone)
    .bind(designation)
    .bind(Role::Admin.as_str())
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Admin member created successfully! ID: {}, Email: {}",
        member_id,
        email
    );

    Ok(member_id)
}
