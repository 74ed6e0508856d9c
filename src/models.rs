use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTrack {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default, Clone)]
pub struct TrackPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// An applicant row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub email: String,
    pub phone_number: String,
    pub track_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub location: String,
    pub email: String,
    pub phone_number: String,
    pub track_id: i64,
}

#[derive(Debug, Default, Clone)]
pub struct UserPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub track_id: Option<i64>,
}

/// Applicant joined with the title of their track, for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub email: String,
    pub phone_number: String,
    pub track_id: i64,
    pub track: Option<String>, // left join
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    pub id: i64,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub orientation_date: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCohort {
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub orientation_date: Option<DateTime<Utc>>,
    pub duration: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct CohortPatch {
    pub title: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub orientation_date: Option<DateTime<Utc>>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub cohort_id: i64,
    pub admitted: Option<bool>,
    pub confirmed: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone)]
pub struct EnrollmentPatch {
    pub admitted: Option<bool>,
    pub confirmed: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Admitted,
    Confirmed,
    Rejected,
}

impl EnrollmentStatus {
    pub fn from_flags(admitted: Option<bool>, confirmed: Option<bool>) -> Self {
        match (admitted, confirmed) {
            (None, _) => EnrollmentStatus::Pending,
            (Some(false), _) => EnrollmentStatus::Rejected,
            (Some(true), Some(true)) => EnrollmentStatus::Confirmed,
            (Some(true), _) => EnrollmentStatus::Admitted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Admitted => "admitted",
            EnrollmentStatus::Confirmed => "confirmed",
            EnrollmentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An enrollment with the applicant, track and cohort details it refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    pub id: i64,
    pub user_id: i64,
    pub cohort_id: i64,
    pub user: Option<String>,
    pub user_email: Option<String>,
    pub user_track: Option<String>,
    pub cohort_title: Option<String>,
    pub cohort_start_date: Option<DateTime<Utc>>,
    pub orientation_date: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub admitted: Option<bool>,
    pub confirmed: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbEnrollmentView {
    pub id: i64,
    pub user_id: i64,
    pub cohort_id: i64,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub track_title: Option<String>,
    pub cohort_title: Option<String>,
    pub cohort_start_date: Option<DateTime<Utc>>,
    pub orientation_date: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub admitted: Option<bool>,
    pub confirmed: Option<bool>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbEnrollmentView> for EnrollmentView {
    fn from(row: DbEnrollmentView) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            cohort_id: row.cohort_id,
            user: row.user_name,
            user_email: row.user_email,
            user_track: row.track_title,
            cohort_title: row.cohort_title,
            cohort_start_date: row.cohort_start_date,
            orientation_date: row.orientation_date,
            duration: row.duration,
            admitted: row.admitted,
            confirmed: row.confirmed,
            deadline: row.deadline,
            status: EnrollmentStatus::from_flags(row.admitted, row.confirmed),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
