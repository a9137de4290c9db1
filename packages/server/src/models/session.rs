use chrono::{DateTime, Utc};
use common::{AuditDecision, AuditStatus, LifecycleStatus};
use serde::{Deserialize, Serialize};

use crate::entity::{recycling_bin, recycling_session, transaction, user};

use super::auth::UserResponse;
use super::bin::BinResponse;
use super::item::ItemResponse;
use super::shared::Pagination;

/// Request body for the manual audit override.
///
/// Deserialization rejects anything but the two terminal decisions, so
/// `{"status": "flagged"}` never reaches the handler.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct OverrideSessionRequest {
    /// Terminal decision for the flagged session.
    #[schema(example = "accepted")]
    pub status: AuditDecision,
}

/// Session summary for the paginated list view.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = 1)]
    pub recycling_bin_id: i32,
    pub session_token: String,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub started_at: DateTime<Utc>,
    #[schema(example = "2025-10-01T15:30:00Z")]
    pub expires_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Derived: `active` iff not ended and not yet expired.
    pub lifecycle_status: LifecycleStatus,
    pub audit_status: AuditStatus,
    #[schema(example = 5)]
    pub accepted_points: i32,
    #[schema(example = 3)]
    pub flagged_points: i32,
    #[schema(example = 2)]
    pub rejected_points: i32,
    pub proof_photo_path: Option<String>,
    pub user: UserResponse,
    pub bin: BinResponse,
    #[schema(example = 3)]
    pub transactions_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionListItem {
    pub fn from_parts(
        session: recycling_session::Model,
        user: user::Model,
        bin: recycling_bin::Model,
        transactions_count: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            recycling_bin_id: session.recycling_bin_id,
            session_token: session.session_token,
            started_at: session.started_at,
            expires_at: session.expires_at,
            ended_at: session.ended_at,
            lifecycle_status: LifecycleStatus::at(session.ended_at, session.expires_at, now),
            audit_status: session.audit_status,
            accepted_points: session.accepted_points,
            flagged_points: session.flagged_points,
            rejected_points: session.rejected_points,
            proof_photo_path: session.proof_photo_path,
            user: user.into(),
            bin: bin.into(),
            transactions_count,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// Paginated list of sessions.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionListResponse {
    pub data: Vec<SessionListItem>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// One scanned-item event, embedded in the session detail view.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TransactionResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub recycling_session_id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = 1)]
    pub recyclable_item_id: i32,
    /// Barcode as scanned at the bin.
    #[schema(example = "8690000000017")]
    pub barcode: String,
    /// Effective item value at scan time; never recomputed.
    #[schema(example = 10)]
    pub points_awarded: i32,
    pub status: AuditStatus,
    pub item: Option<ItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionResponse {
    pub fn from_parts(tx: transaction::Model, item: Option<ItemResponse>) -> Self {
        Self {
            id: tx.id,
            recycling_session_id: tx.recycling_session_id,
            user_id: tx.user_id,
            recyclable_item_id: tx.recyclable_item_id,
            barcode: tx.barcode,
            points_awarded: tx.points_awarded,
            status: tx.status,
            item,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

/// Full session details, including all transactions.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub user_id: i32,
    pub recycling_bin_id: i32,
    pub session_token: String,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Derived: `active` iff not ended and not yet expired.
    pub lifecycle_status: LifecycleStatus,
    pub audit_status: AuditStatus,
    pub accepted_points: i32,
    pub flagged_points: i32,
    pub rejected_points: i32,
    pub proof_photo_path: Option<String>,
    pub user: UserResponse,
    pub bin: BinResponse,
    pub transactions: Vec<TransactionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionResponse {
    pub fn from_parts(
        session: recycling_session::Model,
        user: user::Model,
        bin: recycling_bin::Model,
        transactions: Vec<TransactionResponse>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            recycling_bin_id: session.recycling_bin_id,
            session_token: session.session_token,
            started_at: session.started_at,
            expires_at: session.expires_at,
            ended_at: session.ended_at,
            lifecycle_status: LifecycleStatus::at(session.ended_at, session.expires_at, now),
            audit_status: session.audit_status,
            accepted_points: session.accepted_points,
            flagged_points: session.flagged_points,
            rejected_points: session.rejected_points,
            proof_photo_path: session.proof_photo_path,
            user: user.into(),
            bin: bin.into(),
            transactions,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
