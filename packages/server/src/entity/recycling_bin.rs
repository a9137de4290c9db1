use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recycling_bin")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Opaque token end users scan to start a session. Generated at creation,
    /// immutable for the life of the bin.
    #[sea_orm(unique)]
    pub qr_key: String,

    #[sea_orm(has_many)]
    pub sessions: HasMany<super::recycling_session::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
