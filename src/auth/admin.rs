use sqlx::{Pool, Sqlite};
use tracing::{info, instrument, warn};

use crate::db;
use crate::error::AppError;
use crate::models::Admin;

/// bcrypt work factor for admin passwords.
pub const PASSWORD_HASH_COST: u32 = 10;

const INVALID_CREDENTIALS: &str = "Invalid Credentials";

#[instrument(skip(pool, password))]
pub async fn signup_admin(
    pool: &Pool<Sqlite>,
    username: &str,
    password: &str,
) -> Result<Admin, AppError> {
    info!("Signing up admin");
    let password_hash = bcrypt::hash(password, PASSWORD_HASH_COST)?;

    db::create_admin(pool, username, &password_hash).await
}

#[instrument(skip(pool, password))]
pub async fn login_admin(
    pool: &Pool<Sqlite>,
    username: &str,
    password: &str,
) -> Result<Admin, AppError> {
    info!("Authenticating admin");
    let Some(admin) = db::get_admin_by_username(pool, username).await? else {
        warn!("No admin with that username");
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    };

    // A malformed stored hash counts as a failed comparison.
    let valid = bcrypt::verify(password, &admin.password_hash).unwrap_or(false);
    if !valid {
        warn!(admin_id = admin.id, "Password mismatch");
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    Ok(admin)
}
