//! Integration tests for the chat REST endpoints.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use triton_web::chat::IntentMatcher;
use triton_web::chat::knowledge::{DEFAULT_FALLBACK, DEFAULT_GREETING, DELIVERY_RESPONSE};
use triton_web::contact::mailer::LogMailer;
use triton_web::contact::{ContactState, RateLimitConfig, RateLimiter};
use triton_web::server;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start the app on a random port, return its base URL.
async fn start_server() -> String {
    let contact = ContactState {
        limiter: Arc::new(RateLimiter::with_system_clock(RateLimitConfig::default())),
        mailer: Arc::new(LogMailer),
        from: "Triton West Africa <onboarding@resend.dev>".into(),
        operator_inbox: "ops@triton.test".into(),
    };
    let app = server::app(IntentMatcher::default(), contact);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

async fn post(base: &str, path: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn session_opens_with_greeting_and_suggestions() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let body: Value = reqwest::get(format!("{base}/api/chat/session"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["greeting"]["origin"], "bot");
        assert_eq!(body["greeting"]["text"], DEFAULT_GREETING);
        assert_eq!(
            body["suggestions"],
            json!(["Voir nos services", "Demander un devis", "Informations contact", "FAQ"])
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn delivery_question_gets_delivery_reply() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let (status, body) = post(
            &base,
            "/api/chat",
            json!({ "message": "Quels sont vos délais de livraison ?" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["reply"]["origin"], "bot");
        assert_eq!(body["reply"]["text"], DELIVERY_RESPONSE);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unknown_question_gets_fallback() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let (status, body) = post(&base, "/api/chat", json!({ "message": "asdkjhasd" })).await;
        assert_eq!(status, 200);
        assert_eq!(body["reply"]["text"], DEFAULT_FALLBACK);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn blank_message_is_rejected() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let (status, body) = post(&base, "/api/chat", json!({ "message": "   " })).await;
        assert_eq!(status, 400);
        assert!(body["error"].is_string());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn suggestion_sends_its_prompt() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;

        let (status, body) = post(
            &base,
            "/api/chat/suggestions",
            json!({ "label": "Informations contact" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["prompt"], "Comment vous contacter ?");
        assert!(
            body["reply"]["text"]
                .as_str()
                .unwrap()
                .contains("(+225) 27 21 35 96 72")
        );

        let (status, _) = post(&base, "/api/chat/suggestions", json!({ "label": "FAQ" })).await;
        assert_eq!(status, 404);

        let (status, _) = post(&base, "/api/chat/suggestions", json!({ "label": "Nope" })).await;
        assert_eq!(status, 404);
    })
    .await
    .expect("test timed out");
}
