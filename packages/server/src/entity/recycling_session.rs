use common::AuditStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One continuous recycling interaction by one user at one bin.
///
/// The lifecycle state (`active` / `closed`) is not a column: it is derived
/// from `ended_at` and `expires_at` when the session is serialized. The three
/// point columns are kept in lockstep with the session's transactions:
/// their sum always equals the sum of `points_awarded` over all transactions,
/// partitioned by each transaction's status.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recycling_session")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub recycling_bin_id: i32,
    #[sea_orm(belongs_to, from = "recycling_bin_id", to = "id")]
    pub bin: HasOne<super::recycling_bin::Entity>,

    #[sea_orm(unique)]
    pub session_token: String,

    pub started_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
    /// NULL while the session has not been explicitly ended.
    pub ended_at: Option<DateTimeUtc>,

    pub audit_status: AuditStatus,

    pub accepted_points: i32,
    pub flagged_points: i32,
    pub rejected_points: i32,

    pub proof_photo_path: Option<String>,

    #[sea_orm(has_many)]
    pub transactions: HasMany<super::transaction::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
