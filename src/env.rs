use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_MAIL_FROM: &str = "no-reply@localhost";
pub const DEFAULT_MAIL_PORT: u16 = 465;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySettings {
    pub otlp_endpoint: String,
    pub api_key: Option<String>,
}

impl TelemetrySettings {
    /// Read on its own so tracing can be installed before the rest of the
    /// config is validated.
    pub fn from_env() -> Option<Self> {
        optional("OTLP_ENDPOINT").map(|otlp_endpoint| Self {
            otlp_endpoint,
            api_key: optional("OTLP_API_KEY"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub secret_key: String,
    pub frontend_url: String,
    pub mail_from: String,
    pub mail: Option<MailSettings>,
}

fn optional(key: &str) -> Option<String> {
    dotenvy::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mail = match optional("MAIL_HOST") {
            Some(host) => {
                let port = match optional("MAIL_PORT") {
                    Some(port) => port.parse().map_err(|e| ConfigError::Invalid {
                        key: "MAIL_PORT",
                        message: format!("{}", e),
                    })?,
                    None => DEFAULT_MAIL_PORT,
                };

                Some(MailSettings {
                    host,
                    port,
                    user: optional("MAIL_USER"),
                    password: optional("MAIL_PASSWORD"),
                })
            }
            None => {
                warn!("MAIL_HOST not set, notifications will only be logged");
                None
            }
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            secret_key: required("SECRET_KEY")?,
            frontend_url: optional("FRONTEND_URL")
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            mail_from: optional("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            mail,
        })
    }
}

/// Outcome of loading the env files. Kept so it can be logged once tracing
/// is up, since the files themselves may set `RUST_LOG`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnvFiles {
    pub loaded: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

impl EnvFiles {
    pub fn log(&self) {
        for path in &self.skipped {
            warn!("Environment file {} not found, skipping", path);
        }
        for path in &self.loaded {
            info!("Loaded environment from: {}", path);
        }
    }
}

pub fn load_environment() -> Result<EnvFiles, dotenvy::Error> {
    let is_production =
        dotenvy::var("ROCKET_PROFILE").unwrap_or("development".to_string()) == "production";

    if is_production {
        load_env_files(&["config/common.env", "config/prod.env", ".secrets.env"])
    } else {
        load_env_files(&["config/common.env", "config/dev.env", ".secrets.env"])
    }
}

/// Loads each file that exists, later files overriding earlier ones.
pub fn load_env_files(paths: &[&'static str]) -> Result<EnvFiles, dotenvy::Error> {
    let mut files = EnvFiles::default();

    for &path in paths {
        if !Path::new(path).exists() {
            files.skipped.push(path);
            continue;
        }

        dotenvy::from_filename_override(path)?;
        files.loaded.push(path);
    }

    Ok(files)
}
