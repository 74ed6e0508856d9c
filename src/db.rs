use chrono::{DateTime, Utc};
use sqlx::{Executor, Pool, QueryBuilder, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{
    Admin, Cohort, CohortPatch, DbEnrollmentView, Enrollment, EnrollmentPatch, EnrollmentView,
    NewCohort, NewTrack, NewUser, Track, TrackPatch, User, UserPatch, UserView,
};

const USER_VIEW: &str = "SELECT u.id, u.name, u.location, u.email, u.phone_number, u.track_id,
        t.title AS track, u.created_at, u.updated_at
     FROM users u
     LEFT JOIN tracks t ON t.id = u.track_id";

const ENROLLMENT_VIEW: &str = "SELECT e.id, e.user_id, e.cohort_id,
        u.name AS user_name, u.email AS user_email, t.title AS track_title,
        c.title AS cohort_title, c.start_date AS cohort_start_date,
        c.orientation_date, c.duration,
        e.admitted, e.confirmed, e.deadline, e.created_at, e.updated_at
     FROM enrollments e
     LEFT JOIN users u ON u.id = e.user_id
     LEFT JOIN tracks t ON t.id = u.track_id
     LEFT JOIN cohorts c ON c.id = e.cohort_id";

#[instrument(skip(pool, password_hash))]
pub async fn create_admin(
    pool: &Pool<Sqlite>,
    username: &str,
    password_hash: &str,
) -> Result<Admin, AppError> {
    info!("Creating admin");
    let now = Utc::now();
    let admin = sqlx::query_as::<_, Admin>(
        "INSERT INTO admins (username, password_hash, created_at, updated_at)
         VALUES (?, ?, ?, ?)
         RETURNING id, username, password_hash, created_at, updated_at",
    )
    .bind(username)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(admin)
}

#[instrument(skip(pool))]
pub async fn get_admin(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Admin>, AppError> {
    info!("Fetching admin by ID");
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT id, username, password_hash, created_at, updated_at FROM admins WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

#[instrument(skip(pool))]
pub async fn get_admin_by_username(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<Option<Admin>, AppError> {
    info!("Fetching admin by username");
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT id, username, password_hash, created_at, updated_at
         FROM admins WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

#[instrument(skip(pool))]
pub async fn create_track(pool: &Pool<Sqlite>, new_track: &NewTrack) -> Result<Track, AppError> {
    info!("Creating track");
    let now = Utc::now();
    let track = sqlx::query_as::<_, Track>(
        "INSERT INTO tracks (title, description, created_at, updated_at)
         VALUES (?, ?, ?, ?)
         RETURNING id, title, description, created_at, updated_at",
    )
    .bind(&new_track.title)
    .bind(&new_track.description)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(track)
}

#[instrument(skip(pool))]
pub async fn get_track(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Track>, AppError> {
    info!("Fetching track by ID");
    let track = sqlx::query_as::<_, Track>(
        "SELECT id, title, description, created_at, updated_at FROM tracks WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(track)
}

#[instrument(skip(pool))]
pub async fn get_all_tracks(pool: &Pool<Sqlite>) -> Result<Vec<Track>, AppError> {
    info!("Getting all tracks");
    let tracks = sqlx::query_as::<_, Track>(
        "SELECT id, title, description, created_at, updated_at
         FROM tracks ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(tracks)
}

#[instrument(skip(pool))]
pub async fn update_track(
    pool: &Pool<Sqlite>,
    id: i64,
    patch: &TrackPatch,
) -> Result<u64, AppError> {
    info!("Updating track");
    let mut query = QueryBuilder::<Sqlite>::new("UPDATE tracks SET ");
    let mut fields = query.separated(", ");

    if let Some(title) = &patch.title {
        fields.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(description) = &patch.description {
        fields
            .push("description = ")
            .push_bind_unseparated(description.clone());
    }
    fields.push("updated_at = ").push_bind_unseparated(Utc::now());

    query.push(" WHERE id = ").push_bind(id);
    let result = query.build().execute(pool).await?;

    Ok(result.rows_affected())
}

/// Removes the track along with its applicants and their enrollments.
#[instrument(skip(pool))]
pub async fn delete_track(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting track");
    sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[instrument(skip(executor))]
pub async fn create_user<'e, E>(executor: E, new_user: &NewUser) -> Result<User, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    info!("Creating user");
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, location, email, phone_number, track_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING id, name, location, email, phone_number, track_id, created_at, updated_at",
    )
    .bind(&new_user.name)
    .bind(&new_user.location)
    .bind(&new_user.email)
    .bind(&new_user.phone_number)
    .bind(new_user.track_id)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

#[instrument(skip(pool))]
pub async fn get_user(pool: &Pool<Sqlite>, id: i64) -> Result<Option<UserView>, AppError> {
    info!("Fetching user by ID");
    let sql = format!("{USER_VIEW} WHERE u.id = ?");
    let user = sqlx::query_as::<_, UserView>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

#[instrument(skip(pool))]
pub async fn get_all_users(pool: &Pool<Sqlite>) -> Result<Vec<UserView>, AppError> {
    info!("Getting all users");
    let sql = format!("{USER_VIEW} ORDER BY u.created_at, u.id");
    let users = sqlx::query_as::<_, UserView>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(users)
}

#[instrument(skip(pool))]
pub async fn update_user(
    pool: &Pool<Sqlite>,
    id: i64,
    patch: &UserPatch,
) -> Result<u64, AppError> {
    info!("Updating user");
    let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
    let mut fields = query.separated(", ");

    if let Some(name) = &patch.name {
        fields.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(location) = &patch.location {
        fields.push("location = ").push_bind_unseparated(location.clone());
    }
    if let Some(email) = &patch.email {
        fields.push("email = ").push_bind_unseparated(email.clone());
    }
    if let Some(phone_number) = &patch.phone_number {
        fields
            .push("phone_number = ")
            .push_bind_unseparated(phone_number.clone());
    }
    if let Some(track_id) = patch.track_id {
        fields.push("track_id = ").push_bind_unseparated(track_id);
    }
    fields.push("updated_at = ").push_bind_unseparated(Utc::now());

    query.push(" WHERE id = ").push_bind(id);
    let result = query.build().execute(pool).await?;

    Ok(result.rows_affected())
}

#[instrument(skip(pool))]
pub async fn delete_user(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting user");
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[instrument(skip(pool))]
pub async fn create_cohort(
    pool: &Pool<Sqlite>,
    new_cohort: &NewCohort,
) -> Result<Cohort, AppError> {
    info!("Creating cohort");
    let now = Utc::now();
    let cohort = sqlx::query_as::<_, Cohort>(
        "INSERT INTO cohorts (title, start_date, orientation_date, duration, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING id, title, start_date, orientation_date, duration, created_at, updated_at",
    )
    .bind(&new_cohort.title)
    .bind(new_cohort.start_date)
    .bind(new_cohort.orientation_date)
    .bind(&new_cohort.duration)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(cohort)
}

#[instrument(skip(pool))]
pub async fn get_cohort(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Cohort>, AppError> {
    info!("Fetching cohort by ID");
    let cohort = sqlx::query_as::<_, Cohort>(
        "SELECT id, title, start_date, orientation_date, duration, created_at, updated_at
         FROM cohorts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(cohort)
}

#[instrument(skip(pool))]
pub async fn get_all_cohorts(pool: &Pool<Sqlite>) -> Result<Vec<Cohort>, AppError> {
    info!("Getting all cohorts");
    let cohorts = sqlx::query_as::<_, Cohort>(
        "SELECT id, title, start_date, orientation_date, duration, created_at, updated_at
         FROM cohorts ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(cohorts)
}

#[instrument(skip(pool))]
pub async fn update_cohort(
    pool: &Pool<Sqlite>,
    id: i64,
    patch: &CohortPatch,
) -> Result<u64, AppError> {
    info!("Updating cohort");
    let mut query = QueryBuilder::<Sqlite>::new("UPDATE cohorts SET ");
    let mut fields = query.separated(", ");

    if let Some(title) = &patch.title {
        fields.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(start_date) = patch.start_date {
        fields.push("start_date = ").push_bind_unseparated(start_date);
    }
    if let Some(orientation_date) = patch.orientation_date {
        fields
            .push("orientation_date = ")
            .push_bind_unseparated(orientation_date);
    }
    if let Some(duration) = &patch.duration {
        fields.push("duration = ").push_bind_unseparated(duration.clone());
    }
    fields.push("updated_at = ").push_bind_unseparated(Utc::now());

    query.push(" WHERE id = ").push_bind(id);
    let result = query.build().execute(pool).await?;

    Ok(result.rows_affected())
}

#[instrument(skip(pool))]
pub async fn delete_cohort(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting cohort");
    sqlx::query("DELETE FROM cohorts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[instrument(skip(executor))]
pub async fn create_enrollment<'e, E>(
    executor: E,
    user_id: i64,
    cohort_id: i64,
) -> Result<Enrollment, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    info!("Creating enrollment");
    let now = Utc::now();
    let enrollment = sqlx::query_as::<_, Enrollment>(
        "INSERT INTO enrollments (user_id, cohort_id, created_at, updated_at)
         VALUES (?, ?, ?, ?)
         RETURNING id, user_id, cohort_id, admitted, confirmed, deadline, created_at, updated_at",
    )
    .bind(user_id)
    .bind(cohort_id)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(enrollment)
}

#[instrument(skip(pool))]
pub async fn get_enrollment(
    pool: &Pool<Sqlite>,
    id: i64,
) -> Result<Option<EnrollmentView>, AppError> {
    info!("Fetching enrollment by ID");
    let sql = format!("{ENROLLMENT_VIEW} WHERE e.id = ?");
    let row = sqlx::query_as::<_, DbEnrollmentView>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(EnrollmentView::from))
}

#[instrument(skip(pool))]
pub async fn get_all_enrollments(pool: &Pool<Sqlite>) -> Result<Vec<EnrollmentView>, AppError> {
    info!("Getting all enrollments");
    let sql = format!("{ENROLLMENT_VIEW} ORDER BY e.created_at, e.id");
    let rows = sqlx::query_as::<_, DbEnrollmentView>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(EnrollmentView::from).collect())
}

#[instrument(skip(pool))]
pub async fn update_enrollment(
    pool: &Pool<Sqlite>,
    id: i64,
    patch: &EnrollmentPatch,
) -> Result<u64, AppError> {
    info!("Updating enrollment");
    let mut query = QueryBuilder::<Sqlite>::new("UPDATE enrollments SET ");
    let mut fields = query.separated(", ");

    if let Some(admitted) = patch.admitted {
        fields.push("admitted = ").push_bind_unseparated(admitted);
    }
    if let Some(confirmed) = patch.confirmed {
        fields.push("confirmed = ").push_bind_unseparated(confirmed);
    }
    if let Some(deadline) = patch.deadline {
        fields.push("deadline = ").push_bind_unseparated(deadline);
    }
    fields.push("updated_at = ").push_bind_unseparated(Utc::now());

    query.push(" WHERE id = ").push_bind(id);
    let result = query.build().execute(pool).await?;

    Ok(result.rows_affected())
}

/// Records an admission decision, but only while the enrollment is still
/// pending. Returns `false` when no pending enrollment matched.
#[instrument(skip(pool))]
pub async fn decide_enrollment(
    pool: &Pool<Sqlite>,
    id: i64,
    admitted: bool,
    deadline: Option<DateTime<Utc>>,
) -> Result<bool, AppError> {
    info!("Recording enrollment decision");
    let result = sqlx::query(
        "UPDATE enrollments
         SET admitted = ?, deadline = ?, updated_at = ?
         WHERE id = ? AND admitted IS NULL",
    )
    .bind(admitted)
    .bind(deadline)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[instrument(skip(pool))]
pub async fn confirm_enrollment(pool: &Pool<Sqlite>, id: i64) -> Result<bool, AppError> {
    info!("Confirming enrollment");
    let result = sqlx::query(
        "UPDATE enrollments
         SET confirmed = 1, updated_at = ?
         WHERE id = ? AND admitted = 1 AND (confirmed IS NULL OR confirmed = 0)",
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[instrument(skip(pool))]
pub async fn delete_enrollment(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting enrollment");
    sqlx::query("DELETE FROM enrollments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
