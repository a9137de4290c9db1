use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::{profile, user};
use crate::utils::hash;

/// Ensure the configured admin account exists.
///
/// Idempotent: if a user with the configured email is already present,
/// nothing changes (including the password).
pub async fn seed_admin(db: &DatabaseConnection, auth: &AuthConfig) -> Result<(), DbErr> {
    let email = auth.admin_email.trim();

    let password = hash::hash_password(&auth.admin_password)
        .map_err(|e| DbErr::Custom(format!("Failed to hash admin password: {e}")))?;

    let now = chrono::Utc::now();
    let admin = user::ActiveModel {
        name: Set("Administrator".to_string()),
        email: Set(email.to_string()),
        password: Set(password),
        role: Set(user::ROLE_ADMIN.to_string()),
        created_at: Set(now),
        ..Default::default()
    };

    let result = user::Entity::insert(admin)
        .on_conflict(
            OnConflict::column(user::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => return Ok(()),
        Ok(_) => {}
        Err(e) => return Err(e),
    }

    let admin = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::Custom("Admin user missing after insert".to_string()))?;

    let admin_profile = profile::ActiveModel {
        user_id: Set(admin.id),
        first_name: Set("Platform".to_string()),
        last_name: Set("Administrator".to_string()),
        username: Set("admin".to_string()),
        bio: Set(None),
        birth_date: Set(None),
        points: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    profile::Entity::insert(admin_profile)
        .on_conflict(
            OnConflict::column(profile::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .or_else(|e| match e {
            DbErr::RecordNotInserted => Ok(0),
            other => Err(other),
        })?;

    info!(email, "Seeded admin account");
    Ok(())
}
