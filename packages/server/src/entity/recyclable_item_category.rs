use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recyclable_item_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    /// Default point value inherited by items without a manual override.
    /// Edits affect only future transactions; historical transactions keep
    /// their own `points_awarded`.
    pub value: i32,

    #[sea_orm(has_many)]
    pub items: HasMany<super::recyclable_item::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
