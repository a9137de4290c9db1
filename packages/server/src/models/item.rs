use chrono::{DateTime, Utc};
use common::effective_value;
use serde::{Deserialize, Serialize};

use crate::entity::{recyclable_item, recyclable_item_category};
use crate::error::AppError;

use super::category::CategoryResponse;
use super::shared::{validate_name, validate_point_value};

/// Request body for creating a recyclable item.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateItemRequest {
    #[schema(example = "500ml water bottle")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Clear PET, label removed")]
    pub description: String,
    /// Unique product barcode, as printed.
    #[schema(example = "8690000000017")]
    pub barcode: String,
    /// Category the item inherits its default value from, if any.
    pub category_id: Option<i32>,
    /// Per-item value override. 0 is a valid override; omit or null to inherit.
    pub manual_value: Option<i32>,
}

/// Request body for replacing a recyclable item (PUT semantics).
///
/// `manual_value: null` clears the override, reverting the effective value to
/// the category default (or the platform default when uncategorized).
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub barcode: String,
    pub category_id: Option<i32>,
    pub manual_value: Option<i32>,
}

fn validate_barcode(barcode: &str) -> Result<(), AppError> {
    let barcode = barcode.trim();
    if barcode.is_empty() || barcode.chars().count() > 64 {
        return Err(AppError::Validation(
            "Barcode must be 1-64 characters".into(),
        ));
    }
    if barcode.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "Barcode must not contain whitespace".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_item(payload: &CreateItemRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_barcode(&payload.barcode)?;
    if let Some(v) = payload.manual_value {
        validate_point_value(v, "manual_value")?;
    }
    Ok(())
}

pub fn validate_update_item(payload: &UpdateItemRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_barcode(&payload.barcode)?;
    if let Some(v) = payload.manual_value {
        validate_point_value(v, "manual_value")?;
    }
    Ok(())
}

/// Item details with embedded category and resolved point value.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ItemResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "500ml water bottle")]
    pub name: String,
    pub description: String,
    #[schema(example = "8690000000017")]
    pub barcode: String,
    /// Override value when set; null means the item inherits.
    pub manual_value: Option<i32>,
    pub category_id: Option<i32>,
    pub category: Option<CategoryResponse>,
    /// Effective point value a scan of this item awards right now:
    /// manual override, else category value, else the platform default.
    #[schema(example = 10)]
    pub current_value: i32,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub updated_at: DateTime<Utc>,
}

impl ItemResponse {
    pub fn from_parts(
        item: recyclable_item::Model,
        category: Option<recyclable_item_category::Model>,
    ) -> Self {
        let current_value = effective_value(item.manual_value, category.as_ref().map(|c| c.value));
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            barcode: item.barcode,
            manual_value: item.manual_value,
            category_id: item.category_id,
            category: category.map(CategoryResponse::from),
            current_value,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
