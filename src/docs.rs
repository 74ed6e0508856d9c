use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api;

pub const BEARER_SCHEME: &str = "bearer_auth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Enrollment API",
        version = "1.0.0",
        description = "Registration, review and confirmation of bootcamp applicants"
    ),
    paths(
        api::api_signup,
        api::api_login,
        api::api_me,
        api::api_create_track,
        api::api_get_tracks,
        api::api_get_track,
        api::api_update_track,
        api::api_delete_track,
        api::api_create_cohort,
        api::api_get_cohorts,
        api::api_get_cohort,
        api::api_update_cohort,
        api::api_delete_cohort,
        api::api_register_user,
        api::api_get_users,
        api::api_get_user,
        api::api_update_user,
        api::api_delete_user,
        api::api_create_enrollment,
        api::api_get_enrollments,
        api::api_get_enrollment,
        api::api_update_enrollment,
        api::api_admit_enrollment,
        api::api_reject_enrollment,
        api::api_confirm_enrollment,
        api::api_delete_enrollment,
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Admin accounts and tokens"),
        (name = "tracks", description = "Learning tracks"),
        (name = "cohorts", description = "Cohort schedule"),
        (name = "users", description = "Applicants"),
        (name = "enrollments", description = "Admission decisions")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[get("/docs/openapi.json")]
pub fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// Swagger UI is pulled from a CDN and pointed at the route above.
#[get("/docs")]
pub fn swagger_ui() -> RawHtml<&'static str> {
    RawHtml(include_str!("../static/docs.html"))
}
