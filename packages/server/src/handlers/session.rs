use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::{AuditStatus, PointTotals};
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{recyclable_item, recyclable_item_category, recycling_bin, recycling_session, transaction, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::item::ItemResponse;
use crate::models::session::*;
use crate::models::shared::{PageQuery, Pagination};
use crate::state::AppState;

/// Assemble the full detail view for one session: owner, bin, and every
/// transaction with its item (and the item's category, for `current_value`).
async fn build_session_response(
    db: &DatabaseConnection,
    session: recycling_session::Model,
) -> Result<SessionResponse, AppError> {
    let owner = user::Entity::find_by_id(session.user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal("Session owner missing".into()))?;

    let bin = recycling_bin::Entity::find_by_id(session.recycling_bin_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal("Session bin missing".into()))?;

    let txs = transaction::Entity::find()
        .filter(transaction::Column::RecyclingSessionId.eq(session.id))
        .find_also_related(recyclable_item::Entity)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    let category_ids: Vec<i32> = txs
        .iter()
        .filter_map(|(_, item)| item.as_ref().and_then(|i| i.category_id))
        .collect();
    let categories: HashMap<i32, recyclable_item_category::Model> =
        recyclable_item_category::Entity::find()
            .filter(recyclable_item_category::Column::Id.is_in(category_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

    let transactions = txs
        .into_iter()
        .map(|(tx, item)| {
            let item_response = item.map(|i| {
                let category = i.category_id.and_then(|id| categories.get(&id).cloned());
                ItemResponse::from_parts(i, category)
            });
            TransactionResponse::from_parts(tx, item_response)
        })
        .collect();

    Ok(SessionResponse::from_parts(
        session,
        owner,
        bin,
        transactions,
        chrono::Utc::now(),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Sessions",
    operation_id = "listSessions",
    summary = "List recycling sessions",
    description = "Returns a paginated list of sessions, newest first, each with its \
        owner, bin, derived lifecycle status, per-status point totals and transaction count.",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated sessions", body = SessionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_sessions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SessionListResponse>, AppError> {
    auth_user.require_admin()?;

    let (page, per_page) = query.resolve();

    let total = recycling_session::Entity::find()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let sessions = recycling_session::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(recycling_session::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let bin_ids: Vec<i32> = sessions.iter().map(|(s, _)| s.recycling_bin_id).collect();
    let bins: HashMap<i32, recycling_bin::Model> = recycling_bin::Entity::find()
        .filter(recycling_bin::Column::Id.is_in(bin_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    let session_ids: Vec<i32> = sessions.iter().map(|(s, _)| s.id).collect();
    let counts: HashMap<i32, i64> = transaction::Entity::find()
        .select_only()
        .column(transaction::Column::RecyclingSessionId)
        .column_as(transaction::Column::Id.count(), "cnt")
        .filter(transaction::Column::RecyclingSessionId.is_in(session_ids))
        .group_by(transaction::Column::RecyclingSessionId)
        .into_tuple::<(i32, i64)>()
        .all(&state.db)
        .await?
        .into_iter()
        .collect();

    let now = chrono::Utc::now();
    let mut data = Vec::with_capacity(sessions.len());
    for (session, owner) in sessions {
        let owner = owner.ok_or_else(|| AppError::Internal("Session owner missing".into()))?;
        let bin = bins
            .get(&session.recycling_bin_id)
            .cloned()
            .ok_or_else(|| AppError::Internal("Session bin missing".into()))?;
        let tx_count = counts.get(&session.id).copied().unwrap_or(0) as u64;
        data.push(SessionListItem::from_parts(session, owner, bin, tx_count, now));
    }

    Ok(Json(SessionListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Sessions",
    operation_id = "getSession",
    summary = "Get a recycling session by ID",
    description = "Returns the full session, including every transaction with its item \
        and the item's category.",
    params(("id" = i32, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session details", body = SessionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Session not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(session_id = %id))]
pub async fn get_session(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SessionResponse>, AppError> {
    auth_user.require_admin()?;

    let session = recycling_session::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recycling session not found".into()))?;

    let response = build_session_response(&state.db, session).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Sessions",
    operation_id = "overrideSession",
    summary = "Override a flagged session's audit status",
    description = "Resolves a flagged session with a terminal decision. The session's \
        audit status becomes the decision, its still-flagged transactions are \
        reclassified to the decision, and the flagged point total moves into the \
        decision's bucket. Only flagged sessions can be overridden, and only once.",
    params(("id" = i32, Path, description = "Session ID")),
    request_body = OverrideSessionRequest,
    responses(
        (status = 200, description = "Session resolved", body = SessionResponse),
        (status = 400, description = "Decision is not a terminal status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Session not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Session is not flagged (INVALID_TRANSITION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(session_id = %id))]
pub async fn override_session(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<OverrideSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;

    // Row lock serializes concurrent overrides of the same session; the loser
    // reloads a terminal status and gets INVALID_TRANSITION.
    let session = recycling_session::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Recycling session not found".into()))?;

    let next = session.audit_status.apply_override(payload.status)?;
    let now = chrono::Utc::now();

    transaction::Entity::update_many()
        .set(transaction::ActiveModel {
            status: Set(next),
            updated_at: Set(now),
            ..Default::default()
        })
        .filter(transaction::Column::RecyclingSessionId.eq(session.id))
        .filter(transaction::Column::Status.eq(AuditStatus::Flagged))
        .exec(&txn)
        .await?;

    let mut totals = PointTotals {
        accepted: session.accepted_points,
        flagged: session.flagged_points,
        rejected: session.rejected_points,
    };
    totals.resolve_flagged(payload.status);

    let mut active: recycling_session::ActiveModel = session.into();
    active.audit_status = Set(next);
    active.accepted_points = Set(totals.accepted);
    active.flagged_points = Set(totals.flagged);
    active.rejected_points = Set(totals.rejected);
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(
        session_id = updated.id,
        decision = %next,
        by = auth_user.user_id,
        "audit override applied"
    );

    let response = build_session_response(&state.db, updated).await?;
    Ok(Json(response))
}
