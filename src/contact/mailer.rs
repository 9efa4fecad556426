//! Outbound mail: provider configuration and the `Mailer` implementations.
//!
//! SMTP goes through lettre; the Resend HTTP API goes through reqwest. The
//! `log` backend only records what would have been sent, for local runs.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use super::templates::OutboundEmail;
use crate::error::{ConfigError, MailError};

pub const DEFAULT_FROM: &str = "Triton West Africa <onboarding@resend.dev>";
pub const DEFAULT_OPERATOR_INBOX: &str = "all.ntic225@gmail.com";
pub const DEFAULT_RESEND_URL: &str = "https://api.resend.com";

// ── Configuration ───────────────────────────────────────────────────

#[derive(Debug)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug)]
pub struct ResendSettings {
    pub api_url: String,
    pub api_key: SecretString,
}

/// Which provider delivers mail.
#[derive(Debug)]
pub enum MailBackend {
    Smtp(SmtpSettings),
    Resend(ResendSettings),
    /// Log and drop.
    Log,
}

/// Mail configuration, built from environment variables.
#[derive(Debug)]
pub struct MailConfig {
    pub from: String,
    pub operator_inbox: String,
    pub backend: MailBackend,
}

impl MailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup.
    ///
    /// `MAIL_BACKEND` picks the provider explicitly; when unset, Resend wins if
    /// `RESEND_API_KEY` is present, then SMTP if `SMTP_HOST` is, else `log`.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let from = get("MAIL_FROM").unwrap_or_else(|| DEFAULT_FROM.to_string());
        let operator_inbox =
            get("MAIL_OPERATOR_INBOX").unwrap_or_else(|| DEFAULT_OPERATOR_INBOX.to_string());

        let requested = get("MAIL_BACKEND").map(|b| b.trim().to_lowercase());
        let kind = match requested.as_deref() {
            Some(kind) => kind.to_string(),
            None if get("RESEND_API_KEY").is_some() => "resend".to_string(),
            None if get("SMTP_HOST").is_some() => "smtp".to_string(),
            None => "log".to_string(),
        };

        let backend = match kind.as_str() {
            "resend" => {
                let api_key = get("RESEND_API_KEY")
                    .ok_or_else(|| ConfigError::MissingEnvVar("RESEND_API_KEY".into()))?;
                MailBackend::Resend(ResendSettings {
                    api_url: get("RESEND_API_URL")
                        .unwrap_or_else(|| DEFAULT_RESEND_URL.to_string()),
                    api_key: SecretString::from(api_key),
                })
            }
            "smtp" => {
                let host = get("SMTP_HOST")
                    .ok_or_else(|| ConfigError::MissingEnvVar("SMTP_HOST".into()))?;
                let port = match get("SMTP_PORT") {
                    Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                        key: "SMTP_PORT".into(),
                        message: format!("not a port number: {raw}"),
                    })?,
                    None => 587,
                };
                MailBackend::Smtp(SmtpSettings {
                    host,
                    port,
                    username: get("SMTP_USERNAME").unwrap_or_default(),
                    password: SecretString::from(get("SMTP_PASSWORD").unwrap_or_default()),
                })
            }
            "log" => MailBackend::Log,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "MAIL_BACKEND".into(),
                    message: format!("unknown backend {other:?}, expected smtp, resend or log"),
                });
            }
        };

        Ok(Self {
            from,
            operator_inbox,
            backend,
        })
    }
}

// ── Mailer trait ────────────────────────────────────────────────────

/// Something that can deliver an [`OutboundEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

/// Build the mailer for a configured backend.
pub fn create_mailer(backend: MailBackend) -> Arc<dyn Mailer> {
    match backend {
        MailBackend::Smtp(settings) => Arc::new(SmtpMailer::new(settings)),
        MailBackend::Resend(settings) => Arc::new(ResendMailer::new(settings)),
        MailBackend::Log => Arc::new(LogMailer),
    }
}

// ── SMTP ────────────────────────────────────────────────────────────

/// SMTP relay via lettre. Sends run on the blocking pool.
pub struct SmtpMailer {
    settings: Arc<SmtpSettings>,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let message = build_message(email)?;
        let settings = Arc::clone(&self.settings);

        tokio::task::spawn_blocking(move || {
            let creds = Credentials::new(
                settings.username.clone(),
                settings.password.expose_secret().to_string(),
            );
            let transport = SmtpTransport::relay(&settings.host)
                .map_err(|e| MailError::SendFailed {
                    provider: "smtp".into(),
                    reason: format!("SMTP relay error: {e}"),
                })?
                .port(settings.port)
                .credentials(creds)
                .build();

            transport
                .send(&message)
                .map(|_| ())
                .map_err(|e| MailError::SendFailed {
                    provider: "smtp".into(),
                    reason: format!("SMTP send failed: {e}"),
                })
        })
        .await
        .map_err(|e| MailError::SendFailed {
            provider: "smtp".into(),
            reason: format!("send task failed: {e}"),
        })??;

        info!(to = %email.to, "Email sent via SMTP");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e| MailError::InvalidAddress {
        address: address.to_string(),
        reason: format!("{e}"),
    })
}

/// Turn an [`OutboundEmail`] into an HTML lettre message.
pub fn build_message(email: &OutboundEmail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);

    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    builder
        .body(email.html.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

// ── Resend ──────────────────────────────────────────────────────────

/// Resend HTTP API.
pub struct ResendMailer {
    settings: ResendSettings,
    client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(settings: ResendSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }
}

/// JSON body for Resend's `POST /emails`.
pub fn resend_payload(email: &OutboundEmail) -> serde_json::Value {
    let mut body = serde_json::json!({
        "from": email.from,
        "to": [email.to],
        "subject": email.subject,
        "html": email.html,
    });
    if let Some(reply_to) = &email.reply_to {
        body["reply_to"] = serde_json::Value::String(reply_to.clone());
    }
    body
}

#[async_trait]
impl Mailer for ResendMailer {
    fn name(&self) -> &str {
        "resend"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let url = format!("{}/emails", self.settings.api_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.settings.api_key.expose_secret())
            .json(&resend_payload(email))
            .send()
            .await
            .map_err(|e| MailError::SendFailed {
                provider: "resend".into(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MailError::Rejected {
                provider: "resend".into(),
                status: status.as_u16(),
            });
        }

        info!(to = %email.to, "Email sent via Resend");
        Ok(())
    }
}

// ── Log ─────────────────────────────────────────────────────────────

/// Logs instead of sending.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            bytes = email.html.len(),
            "Mail backend is 'log'; email not delivered"
        );
        Ok(())
    }
}
