//! `POST /api/contact`: rate-limit, parse, then send both emails.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{error, info};

use super::limiter::RateLimiter;
use super::mailer::Mailer;
use super::templates::{ContactSubmission, operator_notification, submitter_confirmation};
use crate::error::ContactError;

/// Contact handler state.
#[derive(Clone)]
pub struct ContactState {
    pub limiter: Arc<RateLimiter>,
    pub mailer: Arc<dyn Mailer>,
    /// Sender mailbox for both emails.
    pub from: String,
    pub operator_inbox: String,
}

/// Build the contact router.
pub fn contact_routes(state: ContactState) -> Router {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .with_state(state)
}

/// Identify the caller by its forwarded address, falling back to `unknown`.
pub fn client_id(headers: &HeaderMap) -> String {
    ["x-forwarded-for", "x-real-ip"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

async fn submit_contact(
    State(state): State<ContactState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let client = client_id(&headers);

    match process(&state, &client, &body).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response(),
        Err(err) => {
            if let ContactError::RateLimited { .. } = err {
                info!(client = %client, "Rate limit exceeded for contact form");
            } else {
                error!(
                    error_kind = err.kind(),
                    timestamp = %chrono::Utc::now().to_rfc3339(),
                    "Contact submission failed"
                );
            }
            err.into_response()
        }
    }
}

async fn process(state: &ContactState, client: &str, body: &[u8]) -> Result<(), ContactError> {
    if !state.limiter.check(client).is_admitted() {
        return Err(ContactError::RateLimited {
            client: client.to_string(),
        });
    }

    let submission: ContactSubmission = serde_json::from_slice(body)?;
    info!(client = %client, "Contact form submission received");

    let notification = operator_notification(&submission, &state.from, &state.operator_inbox);
    state.mailer.send(&notification).await?;

    let confirmation = submitter_confirmation(&submission, &state.from);
    state.mailer.send(&confirmation).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn client_id_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_id(&headers), "10.0.0.1");
    }

    #[test]
    fn client_id_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("  "));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_id(&headers), "10.0.0.2");
    }

    #[test]
    fn client_id_unknown_without_headers() {
        assert_eq!(client_id(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn client_id_keeps_forwarded_chain_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_id(&headers), "203.0.113.9, 10.0.0.1");
    }
}
