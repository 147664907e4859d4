//! Best-effort confirmation mailer.
//!
//! Sends the signup confirmation over SMTP. Without credentials the mailer
//! is a logged no-op; a send failure is logged and never surfaced to the
//! client, whose response has already been decided.

use askama::Template;
use chrono::{Datelike, Utc};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use crate::config::SmtpSettings;

/// HTML body of the confirmation email.
#[derive(Template)]
#[template(path = "confirmation_email.html")]
struct ConfirmationEmail {
    year: i32,
}

struct Transport {
    smtp: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

/// SMTP mailer, disabled when no credentials are configured.
pub struct Mailer {
    transport: Option<Transport>,
}

impl Mailer {
    /// Build a mailer from optional SMTP settings.
    pub fn from_settings(settings: Option<&SmtpSettings>) -> anyhow::Result<Self> {
        let Some(settings) = settings else {
            return Ok(Self { transport: None });
        };

        let smtp = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid EMAIL_FROM address: {e}"))?;

        Ok(Self {
            transport: Some(Transport { smtp, from }),
        })
    }

    /// A mailer that silently drops everything (tests, missing creds).
    pub fn disabled() -> Self {
        Self { transport: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Probe the SMTP relay once, logging the outcome (startup report).
    pub async fn verify(&self) {
        match &self.transport {
            None => {
                warn!(
                    "Email service not configured; confirmations will not be sent. \
                     Set EMAIL_USER and EMAIL_PASS to enable."
                );
            }
            Some(transport) => match transport.smtp.test_connection().await {
                Ok(true) => info!("Email service ready"),
                Ok(false) => warn!("Email relay refused the connection test"),
                Err(err) => warn!("Email relay unreachable: {}", err),
            },
        }
    }

    /// Send the signup confirmation to `email`.
    ///
    /// Callers on the request path spawn this and only log the result.
    pub async fn send_confirmation(&self, email: &str) -> anyhow::Result<()> {
        let Some(transport) = &self.transport else {
            info!("Mailer disabled; skipping confirmation for {}", email);
            return Ok(());
        };

        let html = ConfirmationEmail {
            year: Utc::now().year(),
        }
        .render()?;

        let message = Message::builder()
            .from(transport.from.clone())
            .to(email
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid recipient address: {e}"))?)
            .subject("Welcome to GitBoost – Confirmation ✓")
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        transport.smtp.send(message).await?;
        info!("Confirmation email sent to {}", email);
        Ok(())
    }
}
