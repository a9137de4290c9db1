use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{profile, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::profile::*;
use crate::models::shared::{PageQuery, Pagination};
use crate::state::AppState;

async fn find_profile_with_user<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<(profile::Model, user::Model), AppError> {
    let (profile, owner) = profile::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;
    let owner = owner.ok_or_else(|| AppError::Internal("Profile owner missing".into()))?;
    Ok((profile, owner))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Profiles",
    operation_id = "listProfiles",
    summary = "List user profiles",
    description = "Returns a paginated list of profiles with the owning user embedded.",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated profiles", body = ProfileListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_profiles(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProfileListResponse>, AppError> {
    auth_user.require_admin()?;

    let (page, per_page) = query.resolve();

    let total = profile::Entity::find()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let rows = profile::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(profile::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let mut data = Vec::with_capacity(rows.len());
    for (profile, owner) in rows {
        let owner = owner.ok_or_else(|| AppError::Internal("Profile owner missing".into()))?;
        data.push(ProfileResponse::from_parts(profile, owner));
    }

    Ok(Json(ProfileListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Profiles",
    operation_id = "getProfile",
    summary = "Get a profile by ID",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile details", body = ProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(profile_id = %id))]
pub async fn get_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProfileResponse>, AppError> {
    auth_user.require_admin()?;

    let (profile, owner) = find_profile_with_user(&state.db, id).await?;
    Ok(Json(ProfileResponse::from_parts(profile, owner)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Profiles",
    operation_id = "updateProfile",
    summary = "Update a profile and its user account",
    description = "Partially updates profile fields and the owning user account. Only \
        provided fields change; `bio` supports omit/null/value semantics. A provided \
        password is re-hashed before storage.",
    params(("id" = i32, Path, description = "Profile ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Email already in use (EMAIL_TAKEN) or username taken (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(profile_id = %id))]
pub async fn update_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_profile(&payload)?;

    let txn = state.db.begin().await?;

    let (existing, owner) = find_profile_with_user(&txn, id).await?;
    let now = chrono::Utc::now();

    if let Some(ref email) = payload.email {
        let taken = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim()))
            .filter(user::Column::Id.ne(owner.id))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(AppError::EmailTaken);
        }
    }

    let mut user_active: user::ActiveModel = owner.into();
    if let Some(ref email) = payload.email {
        user_active.email = Set(email.trim().to_string());
    }
    if let Some(ref password) = payload.password {
        let hashed = crate::utils::hash::hash_password(password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;
        user_active.password = Set(hashed);
    }
    if let Some(ref role) = payload.role {
        user_active.role = Set(role.clone());
    }
    let updated_user = user_active.update(&txn).await?;

    let mut active: profile::ActiveModel = existing.into();
    if let Some(ref first_name) = payload.first_name {
        active.first_name = Set(first_name.trim().to_string());
    }
    if let Some(ref last_name) = payload.last_name {
        active.last_name = Set(last_name.trim().to_string());
    }
    if let Some(ref username) = payload.username {
        active.username = Set(username.trim().to_string());
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(bio);
    }
    if let Some(birth_date) = payload.birth_date {
        active.birth_date = Set(Some(birth_date));
    }
    if let Some(points) = payload.points {
        active.points = Set(points);
    }
    active.updated_at = Set(now);

    let updated = active.update(&txn).await.map_err(|err| {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            AppError::Conflict("Username already taken".into())
        } else {
            err.into()
        }
    })?;

    txn.commit().await?;

    Ok(Json(ProfileResponse::from_parts(updated, updated_user)))
}
