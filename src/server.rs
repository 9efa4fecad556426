//! HTTP app assembly: chat + contact routes, health check, CORS.

use axum::{
    Json, Router,
    http::{HeaderName, Method},
    response::IntoResponse,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::chat::{IntentMatcher, chat_routes};
use crate::contact::{ContactState, contact_routes};

/// Headers a browser may send cross-origin to the API.
pub const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];

/// Open CORS policy: any origin, the headers above. `OPTIONS` requests are
/// answered here with an empty body.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

/// Build the full application router.
pub fn app(matcher: IntentMatcher, contact: ContactState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(chat_routes(matcher))
        .merge(contact_routes(contact))
        .layer(ServiceBuilder::new().layer(cors_layer()))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "triton-web"
    }))
}
