use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{recycling_bin, recycling_session};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::bin::*;
use crate::state::AppState;

async fn find_bin<C: ConnectionTrait>(db: &C, id: i32) -> Result<recycling_bin::Model, AppError> {
    recycling_bin::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recycling bin not found".into()))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Bins",
    operation_id = "listBins",
    summary = "List all recycling bins",
    responses(
        (status = 200, description = "List of bins", body = Vec<BinResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_bins(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<BinResponse>>, AppError> {
    auth_user.require_admin()?;

    let bins = recycling_bin::Entity::find()
        .order_by_asc(recycling_bin::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(bins.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Bins",
    operation_id = "getBin",
    summary = "Get a recycling bin by ID",
    params(("id" = i32, Path, description = "Bin ID")),
    responses(
        (status = 200, description = "Bin details", body = BinResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Bin not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_bin(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BinResponse>, AppError> {
    auth_user.require_admin()?;

    let model = find_bin(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Bins",
    operation_id = "createBin",
    summary = "Create a new recycling bin",
    description = "Creates a bin with a freshly generated opaque qr_key. The key is the \
        bin's scannable identity and never changes.",
    request_body = CreateBinRequest,
    responses(
        (status = 201, description = "Bin created", body = BinResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_bin(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBinRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_bin(&payload)?;

    let now = chrono::Utc::now();
    let new_bin = recycling_bin::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
        qr_key: Set(Uuid::new_v4().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_bin.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(BinResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Bins",
    operation_id = "updateBin",
    summary = "Update a recycling bin",
    description = "Updates name and/or location. The qr_key is immutable.",
    params(("id" = i32, Path, description = "Bin ID")),
    request_body = UpdateBinRequest,
    responses(
        (status = 200, description = "Bin updated", body = BinResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Bin not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_bin(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateBinRequest>,
) -> Result<Json<BinResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_bin(&payload)?;

    let existing = find_bin(&state.db, id).await?;
    let mut active: recycling_bin::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(lat) = payload.latitude {
        active.latitude = Set(lat);
    }
    if let Some(lon) = payload.longitude {
        active.longitude = Set(lon);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Bins",
    operation_id = "deleteBin",
    summary = "Delete a recycling bin",
    description = "Permanently deletes a bin. Returns 409 CONFLICT if any session was \
        recorded at it.",
    params(("id" = i32, Path, description = "Bin ID")),
    responses(
        (status = 204, description = "Bin deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Bin not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Bin has sessions (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_bin(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;

    find_bin(&txn, id).await?;

    let session_count = recycling_session::Entity::find()
        .filter(recycling_session::Column::RecyclingBinId.eq(id))
        .count(&txn)
        .await?;
    if session_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete bin with existing sessions".into(),
        ));
    }

    recycling_bin::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
