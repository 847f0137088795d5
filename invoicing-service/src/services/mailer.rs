//! Outbound invoice email.
//!
//! The engine supplies the rendered bodies and PDF bytes; this module only
//! handles transport. Messages are multipart/alternative (text + HTML)
//! with the PDF attached.

use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use service_core::error::AppError;
use tokio::sync::Mutex;

/// A fully rendered invoice email, ready for transport.
#[derive(Debug, Clone)]
pub struct InvoiceEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub pdf_filename: String,
    pub pdf_bytes: Vec<u8>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: InvoiceEmail) -> Result<(), AppError>;
}

pub struct SmtpMailer {
    config: SmtpConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self, AppError> {
        if !config.enabled {
            return Ok(Self {
                config,
                transport: None,
            });
        }

        let creds = Credentials::new(config.user.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
            })?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            config,
            transport: Some(transport),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: InvoiceEmail) -> Result<(), AppError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| AppError::EmailError("SMTP is not enabled".to_string()))?;

        let from_mailbox: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_email)
                .parse()
                .map_err(|e| AppError::EmailError(format!("Invalid from address: {}", e)))?;
        let to_mailbox: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::EmailError(format!("Invalid recipient: {}", e)))?;

        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| AppError::EmailError(format!("Invalid content type: {}", e)))?;
        let attachment =
            Attachment::new(email.pdf_filename).body(email.pdf_bytes, pdf_type);

        let message = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email.subject)
            .multipart(
                MultiPart::mixed()
                    .multipart(MultiPart::alternative_plain_html(
                        email.text_body,
                        email.html_body,
                    ))
                    .singlepart(attachment),
            )
            .map_err(|e| AppError::EmailError(format!("Failed to build message: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::EmailError(format!("SMTP send failed: {}", e)))?;

        tracing::info!(to = %email.to, "Invoice email sent");
        Ok(())
    }
}

/// Captures sent emails instead of delivering them. Used by tests.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<InvoiceEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: InvoiceEmail) -> Result<(), AppError> {
        self.sent.lock().await.push(email);
        Ok(())
    }
}
