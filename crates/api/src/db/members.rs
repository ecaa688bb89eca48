//! Member repository for database operations.
//!
//! Queries are runtime-checked (`query_as` with binds) so the workspace
//! builds without a live database. Rows are fetched into a raw row type and
//! converted into the validated domain type, surfacing invalid stored data
//! as `RepositoryError::DataCorruption`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use harvest_roster_core::{Email, MemberId, Role};

use super::RepositoryError;
use crate::models::Member;
use crate::services::avatar::AvatarStore;

/// All member columns, in the order `MemberRow` expects them.
const MEMBER_COLUMNS: &str = "id, email, password_hash, name, phone, address, designation, \
     team, department, next_of_kin_name, next_of_kin_contact, next_of_kin_address, \
     avatar, role, created_at, updated_at";

/// Raw database row for a member.
#[derive(sqlx::FromRow)]
struct MemberRow {
    id: i32,
    email: String,
    password_hash: String,
    name: String,
    phone: String,
    address: String,
    designation: String,
    team: String,
    department: String,
    next_of_kin_name: String,
    next_of_kin_contact: String,
    next_of_kin_address: String,
    avatar: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = RepositoryError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row.role.parse::<Role>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: MemberId::new(row.id),
            email,
            password_hash: row.password_hash,
            name: row.name,
            phone: row.phone,
            address: row.address,
            designation: row.designation,
            team: row.team,
            department: row.department,
            next_of_kin_name: row.next_of_kin_name,
            next_of_kin_contact: row.next_of_kin_contact,
            next_of_kin_address: row.next_of_kin_address,
            avatar: row.avatar,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields for inserting a new member.
#[derive(Debug)]
pub struct NewMember<'a> {
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub designation: &'a str,
    pub team: &'a str,
    pub department: &'a str,
    pub next_of_kin_name: &'a str,
    pub next_of_kin_contact: &'a str,
    pub next_of_kin_address: &'a str,
    pub avatar: Option<&'a str>,
    pub role: Role,
}

/// Partial profile update; `None` fields keep their current value.
#[derive(Debug, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub team: Option<String>,
    pub department: Option<String>,
    pub avatar: Option<String>,
}

/// Repository for member database operations.
pub struct MemberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRepository<'a> {
    /// Create a new member repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a member by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: MemberId) -> Result<Option<Member>, RepositoryError> {
        let row: Option<MemberRow> = sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS} FROM member WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Member::try_from).transpose()
    }

    /// Get a member by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Member>, RepositoryError> {
        let row: Option<MemberRow> = sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS} FROM member WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Member::try_from).transpose()
    }

    /// List all members, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(&self) -> Result<Vec<Member>, RepositoryError> {
        let rows: Vec<MemberRow> = sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS} FROM member ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Member::try_from).collect()
    }

    /// Insert a new member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewMember<'_>) -> Result<Member, RepositoryError> {
        let default_avatar = AvatarStore::DEFAULT_AVATAR;
        let row: MemberRow = sqlx::query_as(&format!(
            "INSERT INTO member (email, password_hash, name, phone, address, designation, \
             team, department, next_of_kin_name, next_of_kin_contact, next_of_kin_address, \
             avatar, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, \
             COALESCE($12, '{default_avatar}'), $13) \
             RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(new.email.as_str())
        .bind(new.password_hash)
        .bind(new.name)
        .bind(new.phone)
        .bind(new.address)
        .bind(new.designation)
        .bind(new.team)
        .bind(new.department)
        .bind(new.next_of_kin_name)
        .bind(new.next_of_kin_contact)
        .bind(new.next_of_kin_address)
        .bind(new.avatar)
        .bind(new.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Member::try_from(row)
    }

    /// Apply a partial update to a member.
    ///
    /// `None` fields keep their current value (COALESCE in SQL).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no member has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: MemberId,
        update: &MemberUpdate,
    ) -> Result<Member, RepositoryError> {
        let row: Option<MemberRow> = sqlx::query_as(&format!(
            "UPDATE member SET \
             name = COALESCE($2, name), \
             designation = COALESCE($3, designation), \
             team = COALESCE($4, team), \
             department = COALESCE($5, department), \
             avatar = COALESCE($6, avatar), \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.name.as_deref())
        .bind(update.designation.as_deref())
        .bind(update.team.as_deref())
        .bind(update.department.as_deref())
        .bind(update.avatar.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), Member::try_from)
    }

    /// Delete a member.
    ///
    /// # Returns
    ///
    /// Returns `true` if the member was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: MemberId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM member WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
