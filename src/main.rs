#[macro_use]
extern crate rocket;

mod admissions;
mod api;
mod auth;
mod db;
mod docs;
mod env;
mod error;
mod mailer;
mod models;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use std::sync::{Arc, Mutex};

use api::{
    api_admit_enrollment, api_confirm_enrollment, api_create_cohort, api_create_enrollment,
    api_create_track, api_delete_cohort, api_delete_enrollment, api_delete_track,
    api_delete_user, api_get_cohort, api_get_cohorts, api_get_enrollment, api_get_enrollments,
    api_get_track, api_get_tracks, api_get_user, api_get_users, api_login, api_me,
    api_register_user, api_reject_enrollment, api_signup, api_update_cohort,
    api_update_enrollment, api_update_track, api_update_user, default_catcher, health,
};
use auth::{TokenService, unauthorized_api};
use docs::{openapi_json, swagger_ui};
use env::{AppConfig, ConfigError, TelemetrySettings, load_environment};
use error::AppError;
use mailer::{LogMailer, Mailer, Notifier, SmtpMailer};
use once_cell::sync::Lazy;
use rocket::{Build, Rocket};
use sqlx::SqlitePool;
use telemetry::{OtelGuard, TelemetryFairing, init_tracing};
use thiserror::Error;
use tracing::info;

pub static TELEMETRY_GUARD: Lazy<Mutex<Option<OtelGuard>>> = Lazy::new(|| Mutex::new(None));

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Anyhow(anyhow::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Error::Anyhow(value)
    }
}

#[rocket::main]
async fn main() -> Result<(), Error> {
    let env_files =
        load_environment().map_err(|e| anyhow::anyhow!("Failed to load environment: {}", e))?;

    let guard = init_tracing(TelemetrySettings::from_env().as_ref());
    if let Ok(mut slot) = TELEMETRY_GUARD.lock() {
        *slot = guard;
    }
    env_files.log();

    let config = AppConfig::from_env()?;

    let pool = SqlitePool::connect(&config.database_url).await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed successfully");

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(settings) => Arc::new(SmtpMailer::new(settings)?),
        None => Arc::new(LogMailer),
    };
    let notifier = Notifier::new(mailer, config.mail_from.clone(), &config.frontend_url);
    let tokens = TokenService::new(&config.secret_key);

    init_rocket(pool, tokens, notifier)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed to launch: {}", e))?;

    Ok(())
}

pub fn init_rocket(pool: SqlitePool, tokens: TokenService, notifier: Notifier) -> Rocket<Build> {
    info!("Starting cohort admissions");

    rocket::build()
        .manage(pool)
        .manage(tokens)
        .manage(notifier)
        .mount(
            "/api/v1",
            routes![
                api_signup,
                api_login,
                api_me,
                api_create_track,
                api_get_tracks,
                api_get_track,
                api_update_track,
                api_delete_track,
                api_create_cohort,
                api_get_cohorts,
                api_get_cohort,
                api_update_cohort,
                api_delete_cohort,
                api_register_user,
                api_get_users,
                api_get_user,
                api_update_user,
                api_delete_user,
                api_create_enrollment,
                api_get_enrollments,
                api_get_enrollment,
                api_update_enrollment,
                api_admit_enrollment,
                api_reject_enrollment,
                api_confirm_enrollment,
                api_delete_enrollment,
                swagger_ui,
                openapi_json,
            ],
        )
        .register("/api/v1", catchers![unauthorized_api])
        .register("/", catchers![default_catcher])
        .mount("/", routes![health])
        .attach(TelemetryFairing)
}
