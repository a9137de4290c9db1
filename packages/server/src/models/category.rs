use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::recyclable_item_category;
use crate::error::AppError;

use super::shared::{validate_name, validate_point_value};

/// Request body for creating a category.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "PET bottles")]
    pub name: String,
    /// Default point value for items of this category.
    #[schema(example = 10)]
    pub value: i32,
}

/// Request body for replacing a category (PUT semantics).
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateCategoryRequest {
    #[schema(example = "PET bottles")]
    pub name: String,
    #[schema(example = 10)]
    pub value: i32,
}

pub fn validate_create_category(payload: &CreateCategoryRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_point_value(payload.value, "value")
}

pub fn validate_update_category(payload: &UpdateCategoryRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_point_value(payload.value, "value")
}

/// Category details.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "PET bottles")]
    pub name: String,
    #[schema(example = 10)]
    pub value: i32,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub updated_at: DateTime<Utc>,
}

impl From<recyclable_item_category::Model> for CategoryResponse {
    fn from(m: recyclable_item_category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            value: m.value,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
