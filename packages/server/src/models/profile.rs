use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{profile, user};
use crate::error::AppError;

use super::auth::UserResponse;
use super::shared::{Pagination, double_option, validate_point_value};

/// Request body for the admin profile update. PATCH semantics: only provided
/// fields change. Covers both profile fields and the owning user account.
#[derive(Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    // Profile fields
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    /// Three-state: omit to keep, null to clear, value to set.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    pub birth_date: Option<NaiveDate>,
    /// Reward balance adjustment target (absolute, not a delta).
    pub points: Option<i32>,

    // User fields
    pub email: Option<String>,
    /// Plaintext; re-hashed before storage.
    pub password: Option<String>,
    /// One of `user`, `admin`.
    pub role: Option<String>,
}

pub fn validate_update_profile(payload: &UpdateProfileRequest) -> Result<(), AppError> {
    if let Some(ref username) = payload.username {
        let username = username.trim();
        if username.is_empty() || username.chars().count() > 32 {
            return Err(AppError::Validation(
                "Username must be 1-32 characters".into(),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::Validation(
                "Username must contain only letters, digits, and underscores".into(),
            ));
        }
    }
    if let Some(points) = payload.points {
        validate_point_value(points, "points")?;
    }
    if let Some(ref email) = payload.email
        && (!email.contains('@') || email.trim().is_empty())
    {
        return Err(AppError::Validation("Email must be a valid address".into()));
    }
    if let Some(ref password) = payload.password
        && (password.len() < 8 || password.len() > 128)
    {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    if let Some(ref role) = payload.role
        && !matches!(role.as_str(), "user" | "admin")
    {
        return Err(AppError::Validation(
            "Role must be one of: user, admin".into(),
        ));
    }
    Ok(())
}

/// Profile details with the owning user embedded.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "Tanaka")]
    pub last_name: String,
    #[schema(example = "alice_t")]
    pub username: String,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Current reward balance.
    #[schema(example = 120)]
    pub points: i32,
    pub user: UserResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn from_parts(profile: profile::Model, user: user::Model) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            username: profile.username,
            bio: profile.bio,
            birth_date: profile.birth_date,
            points: profile.points,
            user: user.into(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Paginated list of profiles.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileListResponse {
    pub data: Vec<ProfileResponse>,
    #[serde(flatten)]
    pub pagination: Pagination,
}
