use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{Instrument, info, info_span, warn};

use crate::env::MailSettings;
use crate::error::AppError;

use super::{Mailer, OutboundEmail};

pub fn build_message(email: &OutboundEmail) -> Result<Message, AppError> {
    let message = Message::builder()
        .from(email.from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(email.html()?)?;

    Ok(message)
}

/// Sends over SMTP with implicit TLS. Each email is sent on its own task so
/// the request that triggered it never waits on the mail server.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, AppError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
            .port(settings.port);

        if let (Some(user), Some(password)) = (&settings.user, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    async fn deliver(&self, email: OutboundEmail) -> Result<(), AppError> {
        let message = build_message(&email)?;
        let response = self.transport.send(message).await?;
        info!(
            to = %email.to,
            template = %email.template,
            code = %response.code(),
            "Email sent"
        );
        Ok(())
    }
}

impl Mailer for SmtpMailer {
    fn dispatch(&self, email: OutboundEmail) {
        let mailer = self.clone();
        let span = info_span!("email_delivery", to = %email.to, template = %email.template);

        tokio::spawn(
            async move {
                if let Err(err) = mailer.deliver(email).await {
                    err.log_and_record("Email delivery");
                }
            }
            .instrument(span),
        );
    }
}

/// Used when no mail host is configured: the email is logged and dropped.
#[derive(Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn dispatch(&self, email: OutboundEmail) {
        warn!(
            to = %email.to,
            subject = %email.subject,
            template = %email.template,
            "Mail transport not configured, email not sent"
        );
    }
}
