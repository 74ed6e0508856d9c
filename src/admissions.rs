//! Applicant registration and the enrollment decision workflow.
//!
//! An enrollment starts out pending. An admin either admits it, which opens
//! a confirmation window of [`CONFIRMATION_WINDOW_DAYS`], or rejects it.
//! Both decisions are final. An admitted applicant may confirm their place
//! until the deadline passes.

use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument, warn};

use crate::db;
use crate::error::AppError;
use crate::mailer::Notifier;
use crate::models::{Enrollment, EnrollmentStatus, EnrollmentView, NewUser, UserView};

pub const CONFIRMATION_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub user: UserView,
    pub enrollment: Enrollment,
}

fn enrollment_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Enrollment with id {} was not found", id))
}

/// Creates the applicant and their enrollment in a single transaction, then
/// sends the registration notice.
#[instrument(skip(pool, notifier, new_user), fields(email = %new_user.email))]
pub async fn register(
    pool: &Pool<Sqlite>,
    notifier: &Notifier,
    new_user: &NewUser,
    cohort_id: i64,
) -> Result<Registration, AppError> {
    info!("Registering applicant");
    let mut tx = pool.begin().await?;

    let user = db::create_user(&mut *tx, new_user).await?;
    let enrollment = db::create_enrollment(&mut *tx, user.id, cohort_id).await?;

    tx.commit().await?;

    let user = db::get_user(pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} was not found", user.id)))?;

    notifier.registration_received(&user);

    Ok(Registration { user, enrollment })
}

/// Works out why a decision could not be applied to `id`.
async fn undecidable(pool: &Pool<Sqlite>, id: i64) -> AppError {
    match db::get_enrollment(pool, id).await {
        Ok(Some(view)) => {
            warn!(enrollment_id = id, status = %view.status, "Enrollment already decided");
            AppError::Conflict(format!(
                "Enrollment with id {} has already been {}",
                id, view.status
            ))
        }
        Ok(None) => enrollment_not_found(id),
        Err(err) => err,
    }
}

#[instrument(skip(pool, notifier))]
pub async fn admit(
    pool: &Pool<Sqlite>,
    notifier: &Notifier,
    id: i64,
) -> Result<EnrollmentView, AppError> {
    info!("Admitting applicant");
    let deadline = Utc::now() + Duration::days(CONFIRMATION_WINDOW_DAYS);

    if !db::decide_enrollment(pool, id, true, Some(deadline)).await? {
        return Err(undecidable(pool, id).await);
    }

    let enrollment = db::get_enrollment(pool, id)
        .await?
        .ok_or_else(|| enrollment_not_found(id))?;

    notifier.admission(&enrollment);

    Ok(enrollment)
}

/// Records the rejection as `admitted = false`.
#[instrument(skip(pool, notifier))]
pub async fn reject(
    pool: &Pool<Sqlite>,
    notifier: &Notifier,
    id: i64,
) -> Result<EnrollmentView, AppError> {
    info!("Rejecting applicant");
    if !db::decide_enrollment(pool, id, false, None).await? {
        return Err(undecidable(pool, id).await);
    }

    let enrollment = db::get_enrollment(pool, id)
        .await?
        .ok_or_else(|| enrollment_not_found(id))?;

    notifier.rejection(&enrollment);

    Ok(enrollment)
}

#[instrument(skip(pool))]
pub async fn confirm(pool: &Pool<Sqlite>, id: i64) -> Result<EnrollmentView, AppError> {
    info!("Confirming enrollment");
    let enrollment = db::get_enrollment(pool, id)
        .await?
        .ok_or_else(|| enrollment_not_found(id))?;

    if enrollment.status != EnrollmentStatus::Admitted {
        return Err(AppError::Conflict(format!(
            "Enrollment with id {} cannot be confirmed while {}",
            id, enrollment.status
        )));
    }

    if enrollment.deadline.is_some_and(|deadline| deadline < Utc::now()) {
        return Err(AppError::Conflict(
            "The confirmation deadline has passed".to_string(),
        ));
    }

    if !db::confirm_enrollment(pool, id).await? {
        return Err(undecidable(pool, id).await);
    }

    db::get_enrollment(pool, id)
        .await?
        .ok_or_else(|| enrollment_not_found(id))
}
