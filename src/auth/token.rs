use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::models::Admin;

pub const TOKEN_LIFETIME_DAYS: i64 = 2;

/// Identity embedded in every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSubject {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenSubject,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::days(TOKEN_LIFETIME_DAYS),
        }
    }

    #[instrument(skip(self, admin), fields(admin_id = admin.id))]
    pub fn issue(&self, admin: &Admin) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user: TokenSubject {
                id: admin.id,
                username: admin.username.clone(),
            },
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<TokenSubject, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims.user)
    }
}
