use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{recyclable_item, recyclable_item_category, transaction};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::item::*;
use crate::state::AppState;

async fn find_item<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<recyclable_item::Model, AppError> {
    recyclable_item::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recyclable item not found".into()))
}

/// Verify a referenced category exists; a dangling reference is a caller error.
async fn check_category_exists<C: ConnectionTrait>(
    db: &C,
    category_id: Option<i32>,
) -> Result<(), AppError> {
    if let Some(id) = category_id {
        recyclable_item_category::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown category_id {id}")))?;
    }
    Ok(())
}

/// Map a unique-constraint violation on insert/update to a barcode conflict.
fn map_barcode_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("An item with this barcode already exists".into())
        }
        _ => AppError::from(err),
    }
}

async fn item_response<C: ConnectionTrait>(
    db: &C,
    item: recyclable_item::Model,
) -> Result<ItemResponse, AppError> {
    let category = match item.category_id {
        Some(category_id) => {
            recyclable_item_category::Entity::find_by_id(category_id)
                .one(db)
                .await?
        }
        None => None,
    };
    Ok(ItemResponse::from_parts(item, category))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Items",
    operation_id = "listItems",
    summary = "List all recyclable items",
    description = "Returns all items with their category embedded and the resolved \
        current_value (manual override, else category value, else platform default).",
    responses(
        (status = 200, description = "List of items", body = Vec<ItemResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_items(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    auth_user.require_admin()?;

    let items = recyclable_item::Entity::find()
        .find_also_related(recyclable_item_category::Entity)
        .order_by_asc(recyclable_item::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(
        items
            .into_iter()
            .map(|(item, category)| ItemResponse::from_parts(item, category))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Items",
    operation_id = "getItem",
    summary = "Get a recyclable item by ID",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item details", body = ItemResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse>, AppError> {
    auth_user.require_admin()?;

    let item = find_item(&state.db, id).await?;
    Ok(Json(item_response(&state.db, item).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Items",
    operation_id = "createItem",
    summary = "Create a new recyclable item",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Barcode already taken (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_item(&payload)?;
    check_category_exists(&state.db, payload.category_id).await?;

    let now = chrono::Utc::now();
    let new_item = recyclable_item::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        barcode: Set(payload.barcode.trim().to_string()),
        manual_value: Set(payload.manual_value),
        category_id: Set(payload.category_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_item
        .insert(&state.db)
        .await
        .map_err(map_barcode_conflict)?;
    let response = item_response(&state.db, model).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Items",
    operation_id = "updateItem",
    summary = "Replace a recyclable item",
    description = "Replaces all editable fields. Passing `manual_value: null` clears the \
        override so the item reverts to its category value (or the platform default). \
        Historical transactions are never touched.",
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Barcode already taken (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_item(&payload)?;

    let txn = state.db.begin().await?;

    check_category_exists(&txn, payload.category_id).await?;
    let existing = find_item(&txn, id).await?;
    let mut active: recyclable_item::ActiveModel = existing.into();

    active.name = Set(payload.name.trim().to_string());
    active.description = Set(payload.description);
    active.barcode = Set(payload.barcode.trim().to_string());
    active.manual_value = Set(payload.manual_value);
    active.category_id = Set(payload.category_id);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await.map_err(map_barcode_conflict)?;
    txn.commit().await?;

    Ok(Json(item_response(&state.db, model).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    operation_id = "deleteItem",
    summary = "Delete a recyclable item",
    description = "Permanently deletes an item. Returns 409 CONFLICT if the item has been \
        scanned: transactions keep their awarded points and must stay attributable.",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Item has transactions (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;

    find_item(&txn, id).await?;

    let tx_count = transaction::Entity::find()
        .filter(transaction::Column::RecyclableItemId.eq(id))
        .count(&txn)
        .await?;
    if tx_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete item with existing transactions".into(),
        ));
    }

    recyclable_item::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
