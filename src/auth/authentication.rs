use rocket::Request;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde_json::json;

use crate::error::AppError;
use crate::validation::Envelope;

use super::{TokenService, TokenSubject};

/// Request guard for routes only admins may call.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub TokenSubject);

pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedAdmin {
    type Error = AppError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_span = tracing::info_span!("admin_auth_guard");
        let _guard = auth_span.enter();

        let Some(header) = request.headers().get_one("Authorization") else {
            tracing::warn!("Missing Authorization header");
            return Outcome::Error((
                Status::Unauthorized,
                AppError::Authentication("Unauthenticated request!".to_string()),
            ));
        };

        let Some(token) = bearer_token(header) else {
            tracing::warn!("Malformed Authorization header");
            return Outcome::Error((
                Status::Unauthorized,
                AppError::Authentication("Unauthenticated request!".to_string()),
            ));
        };

        let tokens = match request.rocket().state::<TokenService>() {
            Some(tokens) => tokens,
            _ => {
                tracing::error!("Token service not found in managed state");
                return Outcome::Error((
                    Status::InternalServerError,
                    AppError::Internal("Token service unavailable".to_string()),
                ));
            }
        };

        match tokens.verify(token) {
            Ok(subject) => {
                tracing::info!(admin_id = subject.id, username = %subject.username, "Admin authenticated via bearer token");
                Outcome::Success(AuthenticatedAdmin(subject))
            }
            Err(err) => Outcome::Error((Status::Unauthorized, err)),
        }
    }
}

#[catch(401)]
pub fn unauthorized_api(_req: &Request) -> Custom<Json<Envelope>> {
    tracing::warn!("Unauthorized access attempt");
    Custom(
        Status::Unauthorized,
        Json(Envelope::new(
            Status::Unauthorized,
            "Unauthenticated request!",
            json!({}),
        )),
    )
}
