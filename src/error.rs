//! Error types for triton-web.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Advisory shown to a client that exceeded the submission cap.
pub const RATE_LIMITED_MESSAGE: &str = "Trop de demandes. Veuillez réessayer dans une heure.";

/// Generic message for every other contact failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Une erreur s'est produite lors de l'envoi du message";

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse knowledge file {path}: {reason}")]
    Knowledge { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mail provider errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Provider {provider} request failed: {reason}")]
    SendFailed { provider: String, reason: String },

    #[error("Provider {provider} rejected the message with status {status}")]
    Rejected { provider: String, status: u16 },
}

/// Failures of the contact submission endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("Rate limited client {client}")]
    RateLimited { client: String },

    #[error("Malformed submission: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Mail dispatch failed: {0}")]
    Mail(#[from] MailError),
}

impl ContactError {
    /// Short tag used in server logs in place of the full error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::Malformed(_) => "malformed_input",
            Self::Mail(_) => "mail_provider",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Malformed(_) | Self::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::RateLimited { .. } => RATE_LIMITED_MESSAGE,
            Self::Malformed(_) | Self::Mail(_) => GENERIC_FAILURE_MESSAGE,
        };
        (
            self.status(),
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    }
}

/// Result type alias for triton-web.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_maps_to_429() {
        let err = ContactError::RateLimited {
            client: "1.2.3.4".into(),
        };
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.kind(), "rate_limited");
    }

    #[test]
    fn malformed_and_mail_map_to_500() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let malformed = ContactError::from(parse);
        assert_eq!(malformed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(malformed.kind(), "malformed_input");

        let mail = ContactError::from(MailError::Rejected {
            provider: "resend".into(),
            status: 422,
        });
        assert_eq!(mail.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(mail.kind(), "mail_provider");
    }
}
