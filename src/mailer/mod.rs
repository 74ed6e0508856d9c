pub mod smtp;
pub mod templates;

pub use smtp::*;
pub use templates::*;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::models::{EnrollmentView, UserView};

pub const REVIEW_PERIOD: &str = "two weeks";
pub const NEXT_COHORT_PLACEHOLDER: &str = "to be announced";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailTemplate {
    Registration,
    Admission,
    Rejection,
}

impl EmailTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailTemplate::Registration => "registration",
            EmailTemplate::Admission => "admission",
            EmailTemplate::Rejection => "rejection",
        }
    }
}

impl fmt::Display for EmailTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values substituted into a template. Unset fields are left out of the
/// template context and render as "-".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailData {
    pub applicant_name: String,
    pub track: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cohort_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub template: EmailTemplate,
    pub data: EmailData,
}

impl OutboundEmail {
    pub fn html(&self) -> Result<String, AppError> {
        render(self.template, &self.data)
    }
}

/// Hands emails off for delivery. Implementations must not block the caller
/// on delivery and must swallow (log) delivery failures.
pub trait Mailer: Send + Sync {
    fn dispatch(&self, email: OutboundEmail);
}

pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|| NEXT_COHORT_PLACEHOLDER.to_string())
}

pub fn format_deadline(deadline: Option<DateTime<Utc>>) -> String {
    deadline
        .map(|d| d.format("%A, %B %-d, %Y at %H:%M UTC").to_string())
        .unwrap_or_else(|| NEXT_COHORT_PLACEHOLDER.to_string())
}

/// Builds the applicant notifications and passes them to the mailer.
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    frontend_url: String,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, frontend_url: &str) -> Self {
        Self {
            mailer,
            from: from.into(),
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn confirmation_link(&self, enrollment_id: i64) -> String {
        format!("{}/enrollments/confirm/{}", self.frontend_url, enrollment_id)
    }

    fn send(&self, to: &str, subject: &str, template: EmailTemplate, data: EmailData) {
        info!(to = %to, template = %template, "Dispatching notification");
        self.mailer.dispatch(OutboundEmail {
            from: self.from.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            template,
            data,
        });
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub fn registration_received(&self, user: &UserView) {
        let data = EmailData {
            applicant_name: user.name.clone(),
            track: user.track.clone().unwrap_or_default(),
            review_period: Some(REVIEW_PERIOD.to_string()),
            ..Default::default()
        };

        self.send(
            &user.email,
            "Application Received",
            EmailTemplate::Registration,
            data,
        );
    }

    #[instrument(skip(self, enrollment), fields(enrollment_id = enrollment.id))]
    pub fn admission(&self, enrollment: &EnrollmentView) {
        let Some(to) = enrollment.user_email.as_deref() else {
            warn!("Enrollment has no applicant email, skipping admission notice");
            return;
        };

        let data = EmailData {
            applicant_name: enrollment.user.clone().unwrap_or_default(),
            track: enrollment.user_track.clone().unwrap_or_default(),
            start_date: Some(format_date(enrollment.cohort_start_date)),
            orientation_date: Some(format_date(enrollment.orientation_date)),
            duration: enrollment.duration.clone(),
            enrollment_deadline: Some(format_deadline(enrollment.deadline)),
            confirmation_link: Some(self.confirmation_link(enrollment.id)),
            ..Default::default()
        };

        self.send(
            to,
            "Congratulations! You have been admitted",
            EmailTemplate::Admission,
            data,
        );
    }

    #[instrument(skip(self, enrollment), fields(enrollment_id = enrollment.id))]
    pub fn rejection(&self, enrollment: &EnrollmentView) {
        let Some(to) = enrollment.user_email.as_deref() else {
            warn!("Enrollment has no applicant email, skipping rejection notice");
            return;
        };

        let data = EmailData {
            applicant_name: enrollment.user.clone().unwrap_or_default(),
            track: enrollment.user_track.clone().unwrap_or_default(),
            next_cohort_date: Some(NEXT_COHORT_PLACEHOLDER.to_string()),
            ..Default::default()
        };

        self.send(
            to,
            "Update on your application",
            EmailTemplate::Rejection,
            data,
        );
    }
}
