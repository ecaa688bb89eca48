//! Member route handlers.
//!
//! Profile endpoints (`/me`) require any valid session; the roster CRUD
//! endpoints additionally require the admin role.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use harvest_roster_core::{MemberId, Role};

use crate::db::{
    MemberRepository, RepositoryError,
    members::MemberUpdate,
};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::CurrentMember;
use crate::routes::auth::{MessageResponse, RegisterForm};
use crate::services::auth::{AuthService, Registration};
use crate::services::avatar::{AvatarError, AvatarStore};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Admin member creation request: the registration fields plus an optional
/// role, defaulting to worker.
#[derive(Deserialize)]
pub struct CreateMemberForm {
    #[serde(flatten)]
    pub registration: RegisterForm,
    #[serde(default)]
    pub role: Role,
}

/// Admin profile update request.
#[derive(Deserialize)]
pub struct UpdateMemberForm {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub team: Option<String>,
    pub department: Option<String>,
}

// =============================================================================
// Profile Handlers
// =============================================================================

/// `GET /api/members/me` - The authenticated member's own profile.
pub async fn me(RequireAuth(member): RequireAuth) -> Json<CurrentMember> {
    Json(member)
}

/// `PUT /api/members/me` - Update own profile from a multipart form.
///
/// Text fields update in place; an `image` part is stored on disk and its
/// path recorded. Omitted fields keep their current value.
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(member): RequireAuth,
    mut multipart: Multipart,
) -> Result<Json<CurrentMember>> {
    let mut update = MemberUpdate::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        match name.as_str() {
            "name" => update.name = Some(read_text(field).await?),
            "designation" => update.designation = Some(read_text(field).await?),
            "team" => update.team = Some(read_text(field).await?),
            "department" => update.department = Some(read_text(field).await?),
            "image" => {
                let file_name = field
                    .file_name()
                    .map(ToOwned::to_owned)
                    .ok_or_else(|| AppError::BadRequest("image is missing a file name".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("image upload failed: {e}")))?;

                let store = AvatarStore::new(&state.config().upload_dir);
                let stored = store
                    .save(member.id, &file_name, &bytes)
                    .await
                    .map_err(|e| match e {
                        AvatarError::UnsupportedType => {
                            AppError::BadRequest("unsupported image type".to_string())
                        }
                        AvatarError::Io(io) => {
                            AppError::Internal(format!("avatar write failed: {io}"))
                        }
                    })?;
                update.avatar = Some(stored);
            }
            _ => {}
        }
    }

    let updated = MemberRepository::new(state.pool())
        .update(member.id, &update)
        .await?;

    Ok(Json(updated.into()))
}

// =============================================================================
// Admin Roster Handlers
// =============================================================================

/// `POST /api/members` - Admin creation of a member with an explicit role.
///
/// Unlike self-registration, no session cookie is issued: the admin stays
/// logged in as themselves.
pub async fn create_member(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(form): Json<CreateMemberForm>,
) -> Result<(StatusCode, Json<CurrentMember>)> {
    form.registration.validate_required_fields()?;

    let mut registration = Registration::from(form.registration);
    registration.role = form.role;

    let member = AuthService::new(state.pool()).register(registration).await?;

    tracing::info!(member_id = %member.id, role = %member.role, "member created by admin");

    Ok((StatusCode::CREATED, Json(member.into())))
}

/// `GET /api/members` - Full roster, newest first.
pub async fn list_members(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<CurrentMember>>> {
    let members = MemberRepository::new(state.pool()).list().await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

/// `PUT /api/members/{id}` - Admin update of another member's profile.
pub async fn update_member(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(form): Json<UpdateMemberForm>,
) -> Result<Json<CurrentMember>> {
    let update = MemberUpdate {
        name: form.name,
        designation: form.designation,
        team: form.team,
        department: form.department,
        avatar: None,
    };

    let updated = MemberRepository::new(state.pool())
        .update(MemberId::new(id), &update)
        .await
        .map_err(not_found_or_db)?;

    Ok(Json(updated.into()))
}

/// `DELETE /api/members/{id}` - Remove a member from the roster.
pub async fn delete_member(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    let deleted = MemberRepository::new(state.pool())
        .delete(MemberId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("member not found".to_string()));
    }

    tracing::info!(member_id = id, "member deleted");

    Ok(Json(MessageResponse {
        message: "Member deleted successfully",
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart field: {e}")))
}

fn not_found_or_db(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("member not found".to_string()),
        other => AppError::Database(other),
    }
}
