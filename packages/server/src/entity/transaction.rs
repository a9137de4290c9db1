use common::AuditStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One scanned-item event within a session.
///
/// `points_awarded` is fixed at creation to the item's effective value at
/// scan time; later edits to the item or its category never touch it.
/// Immutable after creation except through the session-level audit override,
/// which reclassifies still-flagged transactions to the admin's decision.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub recycling_session_id: i32,
    #[sea_orm(belongs_to, from = "recycling_session_id", to = "id")]
    pub session: HasOne<super::recycling_session::Entity>,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub recyclable_item_id: i32,
    #[sea_orm(belongs_to, from = "recyclable_item_id", to = "id")]
    pub item: HasOne<super::recyclable_item::Entity>,

    /// Barcode as scanned, kept even if the item's barcode is later edited.
    pub barcode: String,
    pub points_awarded: i32,
    pub status: AuditStatus,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
