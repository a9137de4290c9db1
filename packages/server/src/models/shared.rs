use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Pagination metadata flattened into list responses, matching the
/// `{ data, current_page, last_page, per_page, total }` shape the dashboard
/// consumes.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub current_page: u64,
    /// Last page number (1-based; at least 1 even when empty).
    #[schema(example = 3)]
    pub last_page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
}

impl Pagination {
    pub fn new(current_page: u64, per_page: u64, total: u64) -> Self {
        Self {
            current_page,
            last_page: total.div_ceil(per_page).max(1),
            per_page,
            total,
        }
    }
}

/// Query parameters shared by paginated list endpoints.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
}

impl PageQuery {
    /// Clamp raw query values to sane bounds.
    pub fn resolve(&self) -> (u64, u64) {
        let page = Ord::max(self.page.unwrap_or(1), 1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        (page, per_page)
    }
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a trimmed name (1-256 Unicode characters).
pub fn validate_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 256 {
        return Err(AppError::Validation("Name must be 1-256 characters".into()));
    }
    Ok(())
}

/// Validate a point value (must be >= 0).
pub fn validate_point_value(value: i32, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!("{field} must be >= 0")));
    }
    Ok(())
}
