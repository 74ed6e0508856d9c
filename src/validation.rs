use once_cell::sync::Lazy;
use regex::Regex;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Digits with an optional leading `+`, 7 to 15 digits long.
pub static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone number pattern is valid"));

/// Every JSON response, success or failure, uses this shape.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Envelope {
    pub status: u16,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: Value,
}

impl Envelope {
    pub fn new(status: Status, message: impl Into<String>, data: Value) -> Self {
        Self {
            status: status.code,
            message: message.into(),
            data,
        }
    }
}

pub type ApiResponse = Custom<Json<Envelope>>;

pub fn respond(status: Status, message: &str, data: Value) -> ApiResponse {
    Custom(status, Json(Envelope::new(status, message, data)))
}

impl From<ValidationErrors> for AppError {
    #[instrument]
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages = fields
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| {
                    error
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();

        AppError::Validation(messages)
    }
}

pub trait JsonValidateExt<T> {
    fn validate_custom(self) -> Result<T, AppError>;
}

impl<T: Validate> JsonValidateExt<T> for Json<T> {
    fn validate_custom(self) -> Result<T, AppError> {
        let inner = self.into_inner();
        inner.validate()?;
        Ok(inner)
    }
}
