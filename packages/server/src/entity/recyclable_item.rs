use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recyclable_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub description: String,
    #[sea_orm(unique)]
    pub barcode: String,

    /// Per-item point value. When set it beats the category value, including
    /// an explicit 0; NULL means "inherit".
    pub manual_value: Option<i32>,

    /// NULL for uncategorized items.
    pub category_id: Option<i32>,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::recyclable_item_category::Entity>,

    #[sea_orm(has_many)]
    pub transactions: HasMany<super::transaction::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
