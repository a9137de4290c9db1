use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::recycling_bin;
use crate::error::AppError;

use super::shared::validate_name;

/// Request body for creating a recycling bin. The `qr_key` is generated
/// server-side and never accepted from clients.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBinRequest {
    #[schema(example = "Campus north entrance")]
    pub name: String,
    #[schema(example = 41.0082)]
    pub latitude: f64,
    #[schema(example = 28.9784)]
    pub longitude: f64,
}

/// Request body for updating a bin. Identity (`qr_key`) is immutable; only
/// name and location may change.
#[derive(Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateBinRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), AppError> {
    if let Some(lat) = latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        return Err(AppError::Validation(
            "Latitude must be between -90 and 90".into(),
        ));
    }
    if let Some(lon) = longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        return Err(AppError::Validation(
            "Longitude must be between -180 and 180".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_bin(payload: &CreateBinRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_coordinates(Some(payload.latitude), Some(payload.longitude))
}

pub fn validate_update_bin(payload: &UpdateBinRequest) -> Result<(), AppError> {
    if let Some(ref name) = payload.name {
        validate_name(name)?;
    }
    validate_coordinates(payload.latitude, payload.longitude)
}

/// Bin details.
#[derive(Serialize, utoipa::ToSchema)]
pub struct BinResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Campus north entrance")]
    pub name: String,
    #[schema(example = 41.0082)]
    pub latitude: f64,
    #[schema(example = 28.9784)]
    pub longitude: f64,
    /// Opaque token encoded in the bin's QR label.
    pub qr_key: String,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub updated_at: DateTime<Utc>,
}

impl From<recycling_bin::Model> for BinResponse {
    fn from(m: recycling_bin::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            latitude: m.latitude,
            longitude: m.longitude,
            qr_key: m.qr_key,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
