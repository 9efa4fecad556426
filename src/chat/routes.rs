//! REST endpoints for the chat widget.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::debug;

use super::conversation::{ChatMessage, Conversation, Suggestion};
use super::matcher::IntentMatcher;

/// Chat handler state.
#[derive(Clone)]
pub struct ChatState {
    pub matcher: IntentMatcher,
}

/// Build the chat router.
pub fn chat_routes(matcher: IntentMatcher) -> Router {
    let state = ChatState { matcher };

    Router::new()
        .route("/api/chat", post(send_message))
        .route("/api/chat/session", get(open_session))
        .route("/api/chat/suggestions", post(choose_suggestion))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SendRequest {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionRequest {
    label: String,
}

async fn open_session(State(state): State<ChatState>) -> impl IntoResponse {
    let conv = Conversation::open(state.matcher);
    let labels: Vec<&str> = conv.suggestions().iter().map(|s| s.label()).collect();
    Json(serde_json::json!({
        "greeting": conv.messages()[0],
        "suggestions": labels,
    }))
}

async fn send_message(
    State(state): State<ChatState>,
    Json(body): Json<SendRequest>,
) -> impl IntoResponse {
    let text = body.message.trim();
    if text.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "message is empty" })),
        );
    }

    let reply = ChatMessage::bot(state.matcher.respond(text));
    debug!(reply_id = %reply.id, "Chat reply generated");
    (StatusCode::OK, Json(serde_json::json!({ "reply": reply })))
}

async fn choose_suggestion(
    State(state): State<ChatState>,
    Json(body): Json<SuggestionRequest>,
) -> impl IntoResponse {
    let Some(prompt) = Suggestion::from_label(&body.label).and_then(Suggestion::prompt) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "unknown suggestion" })),
        );
    };

    let reply = ChatMessage::bot(state.matcher.respond(prompt));
    (
        StatusCode::OK,
        Json(serde_json::json!({ "prompt": prompt, "reply": reply })),
    )
}
