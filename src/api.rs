use chrono::{DateTime, Utc};
use rocket::State;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::json;
use sqlx::{Pool, Sqlite};
use utoipa::ToSchema;
use validator::Validate;

use crate::admissions;
use crate::auth::{AuthenticatedAdmin, TokenService, login_admin, signup_admin};
use crate::db;
use crate::error::AppError;
use crate::mailer::Notifier;
use crate::models::{
    CohortPatch, EnrollmentPatch, NewCohort, NewTrack, NewUser, TrackPatch, UserPatch,
};
use crate::validation::{ApiResponse, Envelope, JsonValidateExt, PHONE_NUMBER, respond};

fn not_found(entity: &str) -> AppError {
    AppError::NotFound(format!("{} was not found!", entity))
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    #[validate(length(min = 3, message = "Please provide a username"))]
    username: String,
    #[validate(length(min = 6, message = "Please provide a valid password"))]
    password: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Admin created", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 409, description = "Username taken", body = Envelope)
    )
)]
#[post("/auth/signup", data = "<signup>")]
pub async fn api_signup(
    signup: Json<CredentialsRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let validated = signup.validate_custom()?;

    let admin = signup_admin(db, &validated.username, &validated.password).await?;

    Ok(respond(
        Status::Created,
        "Admin created successfully",
        json!({ "admin": admin }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Admin and bearer token", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 401, description = "Invalid credentials", body = Envelope)
    )
)]
#[post("/auth/login", data = "<login>")]
pub async fn api_login(
    login: Json<CredentialsRequest>,
    db: &State<Pool<Sqlite>>,
    tokens: &State<TokenService>,
) -> Result<ApiResponse, AppError> {
    let validated = login.validate_custom()?;

    let admin = login_admin(db, &validated.username, &validated.password).await?;
    let token = tokens.issue(&admin)?;

    Ok(respond(
        Status::Ok,
        "Logged in successfully!",
        json!({ "admin": admin, "token": token }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current admin", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[get("/auth/me")]
pub async fn api_me(
    admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    // The token may outlive the account it was issued for.
    let admin = db::get_admin(db, admin.0.id)
        .await?
        .ok_or_else(|| AppError::Authentication("Unauthenticated request!".to_string()))?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the admin!",
        json!({ "admin": admin }),
    ))
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateTrackRequest {
    #[validate(length(min = 1, message = "Please provide a title"))]
    title: String,
    #[validate(length(min = 1, message = "Please provide a description"))]
    description: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct UpdateTrackRequest {
    #[validate(length(min = 1, message = "Please provide a title"))]
    title: Option<String>,
    #[validate(length(min = 1, message = "Please provide a description"))]
    description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/tracks",
    tag = "tracks",
    request_body = CreateTrackRequest,
    responses(
        (status = 201, description = "Track created", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[post("/tracks", data = "<track>")]
pub async fn api_create_track(
    track: Json<CreateTrackRequest>,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let validated = track.validate_custom()?;

    let track = db::create_track(
        db,
        &NewTrack {
            title: validated.title,
            description: validated.description,
        },
    )
    .await?;

    Ok(respond(
        Status::Created,
        "Successfully created the track!",
        json!({ "track": track }),
    ))
}

// Public so the registration form can list tracks.
#[utoipa::path(
    get,
    path = "/api/v1/tracks",
    tag = "tracks",
    responses(
        (status = 200, description = "All tracks", body = Envelope)
    )
)]
#[get("/tracks")]
pub async fn api_get_tracks(db: &State<Pool<Sqlite>>) -> Result<ApiResponse, AppError> {
    let tracks = db::get_all_tracks(db).await?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the tracks!",
        json!({ "tracks": tracks }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/tracks/{id}",
    tag = "tracks",
    params(("id" = i64, Path, description = "Track id")),
    responses(
        (status = 200, description = "Track", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "Track not found", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[get("/tracks/<id>")]
pub async fn api_get_track(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let track = db::get_track(db, id)
        .await?
        .ok_or_else(|| not_found("Track"))?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the track!",
        json!({ "track": track }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/tracks/{id}",
    tag = "tracks",
    params(("id" = i64, Path, description = "Track id")),
    request_body = UpdateTrackRequest,
    responses(
        (status = 200, description = "Updated track", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "Track not found", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[put("/tracks/<id>", data = "<update>")]
pub async fn api_update_track(
    id: i64,
    update: Json<UpdateTrackRequest>,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let validated = update.validate_custom()?;
    let patch = TrackPatch {
        title: validated.title,
        description: validated.description,
    };

    if db::update_track(db, id, &patch).await? == 0 {
        return Err(not_found("Track"));
    }

    let track = db::get_track(db, id)
        .await?
        .ok_or_else(|| not_found("Track"))?;

    Ok(respond(
        Status::Ok,
        "Successfully updated the track!",
        json!({ "track": track }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tracks/{id}",
    tag = "tracks",
    params(("id" = i64, Path, description = "Track id")),
    responses(
        (status = 200, description = "Track deleted", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/tracks/<id>")]
pub async fn api_delete_track(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    db::delete_track(db, id).await?;

    Ok(respond(
        Status::Ok,
        "Successfully deleted the track!",
        json!({}),
    ))
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCohortRequest {
    #[validate(length(min = 1, message = "Please provide a title"))]
    title: String,
    start_date: DateTime<Utc>,
    orientation_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Please provide a valid duration"))]
    duration: Option<String>,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCohortRequest {
    #[validate(length(min = 1, message = "Please provide a title"))]
    title: Option<String>,
    start_date: Option<DateTime<Utc>>,
    orientation_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Please provide a valid duration"))]
    duration: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/cohorts",
    tag = "cohorts",
    request_body = CreateCohortRequest,
    responses(
        (status = 201, description = "Cohort created", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[post("/cohorts", data = "<cohort>")]
pub async fn api_create_cohort(
    cohort: Json<CreateCohortRequest>,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let validated = cohort.validate_custom()?;

    let cohort = db::create_cohort(
        db,
        &NewCohort {
            title: validated.title,
            start_date: validated.start_date,
            orientation_date: validated.orientation_date,
            duration: validated.duration,
        },
    )
    .await?;

    Ok(respond(
        Status::Created,
        "Successfully created the cohort!",
        json!({ "cohort": cohort }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/cohorts",
    tag = "cohorts",
    responses(
        (status = 200, description = "All cohorts", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[get("/cohorts")]
pub async fn api_get_cohorts(
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let cohorts = db::get_all_cohorts(db).await?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the cohorts!",
        json!({ "cohorts": cohorts }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/cohorts/{id}",
    tag = "cohorts",
    params(("id" = i64, Path, description = "Cohort id")),
    responses(
        (status = 200, description = "Cohort", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "Cohort not found", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[get("/cohorts/<id>")]
pub async fn api_get_cohort(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let cohort = db::get_cohort(db, id)
        .await?
        .ok_or_else(|| not_found("Cohort"))?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the cohort!",
        json!({ "cohort": cohort }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/cohorts/{id}",
    tag = "cohorts",
    params(("id" = i64, Path, description = "Cohort id")),
    request_body = UpdateCohortRequest,
    responses(
        (status = 200, description = "Updated cohort", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "Cohort not found", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[put("/cohorts/<id>", data = "<update>")]
pub async fn api_update_cohort(
    id: i64,
    update: Json<UpdateCohortRequest>,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let validated = update.validate_custom()?;
    let patch = CohortPatch {
        title: validated.title,
        start_date: validated.start_date,
        orientation_date: validated.orientation_date,
        duration: validated.duration,
    };

    if db::update_cohort(db, id, &patch).await? == 0 {
        return Err(not_found("Cohort"));
    }

    let cohort = db::get_cohort(db, id)
        .await?
        .ok_or_else(|| not_found("Cohort"))?;

    Ok(respond(
        Status::Ok,
        "Successfully updated the cohort!",
        json!({ "cohort": cohort }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cohorts/{id}",
    tag = "cohorts",
    params(("id" = i64, Path, description = "Cohort id")),
    responses(
        (status = 200, description = "Cohort deleted", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/cohorts/<id>")]
pub async fn api_delete_cohort(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    db::delete_cohort(db, id).await?;

    Ok(respond(
        Status::Ok,
        "Successfully deleted the cohort!",
        json!({}),
    ))
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistrationRequest {
    #[validate(length(min = 1, message = "Please provide a name"))]
    name: String,
    #[validate(length(min = 1, message = "Please provide a location"))]
    location: String,
    #[validate(email(message = "Please provide a valid email"))]
    email: String,
    #[validate(regex(path = *PHONE_NUMBER, message = "Please provide a valid phone number"))]
    phone_number: String,
    #[validate(range(min = 1, message = "Please provide a track"))]
    track_id: i64,
    #[validate(range(min = 1, message = "Please provide a cohort"))]
    cohort_id: i64,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Please provide a name"))]
    name: Option<String>,
    #[validate(length(min = 1, message = "Please provide a location"))]
    location: Option<String>,
    #[validate(email(message = "Please provide a valid email"))]
    email: Option<String>,
    #[validate(regex(path = *PHONE_NUMBER, message = "Please provide a valid phone number"))]
    phone_number: Option<String>,
    #[validate(range(min = 1, message = "Please provide a track"))]
    track_id: Option<i64>,
}

// Applicants register themselves, so this route takes no admin guard.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = UserRegistrationRequest,
    responses(
        (status = 201, description = "Applicant and pending enrollment", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 409, description = "Email or phone number taken", body = Envelope)
    )
)]
#[post("/users", data = "<registration>")]
pub async fn api_register_user(
    registration: Json<UserRegistrationRequest>,
    db: &State<Pool<Sqlite>>,
    notifier: &State<Notifier>,
) -> Result<ApiResponse, AppError> {
    let validated = registration.validate_custom()?;

    let new_user = NewUser {
        name: validated.name,
        location: validated.location,
        email: validated.email,
        phone_number: validated.phone_number,
        track_id: validated.track_id,
    };

    let registration = admissions::register(db, notifier, &new_user, validated.cohort_id).await?;

    Ok(respond(
        Status::Created,
        "Successfully registered the applicant!",
        json!(registration),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "All applicants", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[get("/users")]
pub async fn api_get_users(
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let users = db::get_all_users(db).await?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the users!",
        json!({ "users": users }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Applicant", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "User not found", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[get("/users/<id>")]
pub async fn api_get_user(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let user = db::get_user(db, id)
        .await?
        .ok_or_else(|| not_found("User"))?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the user!",
        json!({ "user": user }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated applicant", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "User not found", body = Envelope),
        (status = 409, description = "Email or phone number taken", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[put("/users/<id>", data = "<update>")]
pub async fn api_update_user(
    id: i64,
    update: Json<UpdateUserRequest>,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let validated = update.validate_custom()?;
    let patch = UserPatch {
        name: validated.name,
        location: validated.location,
        email: validated.email,
        phone_number: validated.phone_number,
        track_id: validated.track_id,
    };

    if db::update_user(db, id, &patch).await? == 0 {
        return Err(not_found("User"));
    }

    let user = db::get_user(db, id)
        .await?
        .ok_or_else(|| not_found("User"))?;

    Ok(respond(
        Status::Ok,
        "Successfully updated the user!",
        json!({ "user": user }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Applicant deleted", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/users/<id>")]
pub async fn api_delete_user(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    db::delete_user(db, id).await?;

    Ok(respond(
        Status::Ok,
        "Successfully deleted the user!",
        json!({}),
    ))
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentRequest {
    #[validate(range(min = 1, message = "Please provide a user"))]
    user_id: i64,
    #[validate(range(min = 1, message = "Please provide a cohort"))]
    cohort_id: i64,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct UpdateEnrollmentRequest {
    admitted: Option<bool>,
    confirmed: Option<bool>,
    deadline: Option<DateTime<Utc>>,
}

#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    tag = "enrollments",
    request_body = CreateEnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment created", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 409, description = "Already enrolled", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[post("/enrollments", data = "<enrollment>")]
pub async fn api_create_enrollment(
    enrollment: Json<CreateEnrollmentRequest>,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let validated = enrollment.validate_custom()?;

    let enrollment =
        db::create_enrollment(db.inner(), validated.user_id, validated.cohort_id).await?;

    Ok(respond(
        Status::Created,
        "Successfully created the enrollment!",
        json!({ "enrollment": enrollment }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments",
    tag = "enrollments",
    responses(
        (status = 200, description = "All enrollments", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[get("/enrollments")]
pub async fn api_get_enrollments(
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let enrollments = db::get_all_enrollments(db).await?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the enrollments!",
        json!({ "enrollments": enrollments }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/{id}",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "Enrollment not found", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[get("/enrollments/<id>")]
pub async fn api_get_enrollment(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let enrollment = db::get_enrollment(db, id)
        .await?
        .ok_or_else(|| not_found("Enrollment"))?;

    Ok(respond(
        Status::Ok,
        "Successfully retrieved the enrollment!",
        json!({ "enrollment": enrollment }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/enrollments/{id}",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Enrollment id")),
    request_body = UpdateEnrollmentRequest,
    responses(
        (status = 200, description = "Updated enrollment", body = Envelope),
        (status = 400, description = "Invalid data", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "Enrollment not found", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[put("/enrollments/<id>", data = "<update>")]
pub async fn api_update_enrollment(
    id: i64,
    update: Json<UpdateEnrollmentRequest>,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let validated = update.validate_custom()?;
    let patch = EnrollmentPatch {
        admitted: validated.admitted,
        confirmed: validated.confirmed,
        deadline: validated.deadline,
    };

    if db::update_enrollment(db, id, &patch).await? == 0 {
        return Err(not_found("Enrollment"));
    }

    let enrollment = db::get_enrollment(db, id)
        .await?
        .ok_or_else(|| not_found("Enrollment"))?;

    Ok(respond(
        Status::Ok,
        "Successfully updated the enrollment!",
        json!({ "enrollment": enrollment }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/enrollments/admit/{id}",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Admitted, admission email sent", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "Enrollment not found", body = Envelope),
        (status = 409, description = "Already decided", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[put("/enrollments/admit/<id>")]
pub async fn api_admit_enrollment(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
    notifier: &State<Notifier>,
) -> Result<ApiResponse, AppError> {
    let enrollment = admissions::admit(db, notifier, id).await?;

    Ok(respond(
        Status::Ok,
        "Successfully admitted to the cohort!",
        json!({ "enrollment": enrollment }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/enrollments/reject/{id}",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Rejected, rejection email sent", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope),
        (status = 404, description = "Enrollment not found", body = Envelope),
        (status = 409, description = "Already decided", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[put("/enrollments/reject/<id>")]
pub async fn api_reject_enrollment(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
    notifier: &State<Notifier>,
) -> Result<ApiResponse, AppError> {
    let enrollment = admissions::reject(db, notifier, id).await?;

    Ok(respond(
        Status::Ok,
        "Successfully rejected the applicant!",
        json!({ "enrollment": enrollment }),
    ))
}

// Target of the link in the admission email.
#[utoipa::path(
    put,
    path = "/api/v1/enrollments/confirm/{id}",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Place confirmed", body = Envelope),
        (status = 404, description = "Enrollment not found", body = Envelope),
        (status = 409, description = "Not admitted or deadline passed", body = Envelope)
    )
)]
#[put("/enrollments/confirm/<id>")]
pub async fn api_confirm_enrollment(
    id: i64,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    let enrollment = admissions::confirm(db, id).await?;

    Ok(respond(
        Status::Ok,
        "Successfully confirmed the enrollment!",
        json!({ "enrollment": enrollment }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{id}",
    tag = "enrollments",
    params(("id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment deleted", body = Envelope),
        (status = 401, description = "Missing or invalid token", body = Envelope)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/enrollments/<id>")]
pub async fn api_delete_enrollment(
    id: i64,
    _admin: AuthenticatedAdmin,
    db: &State<Pool<Sqlite>>,
) -> Result<ApiResponse, AppError> {
    db::delete_enrollment(db, id).await?;

    Ok(respond(
        Status::Ok,
        "Successfully deleted the enrollment!",
        json!({}),
    ))
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &rocket::Request) -> ApiResponse {
    let message = match status.code {
        400 | 422 => "Invalid data",
        404 => "Resource not found",
        500 => "Internal server error",
        _ => status.reason().unwrap_or("An error occurred"),
    };

    respond(status, message, json!({}))
}
