//! HTTP layer: `GET /chat_stream/{message}` streaming a chat run as Server-Sent Events.
//!
//! The router is built by [`app`] from an [`AppState`] holding the shared
//! [`ChatRunner`]; `main.rs` wires it to the environment config and a listener.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use searchgraph::{publish_chat, ChatRunner};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info_span};

/// SSE lines buffered between the run and a slow client before the run waits.
const SSE_BUFFER: usize = 64;

/// Shared state for all routes.
pub struct AppState {
    pub runner: Arc<ChatRunner>,
}

/// Query of `/chat_stream/{message}`.
#[derive(Debug, Deserialize)]
pub struct ChatStreamQuery {
    /// Thread to resume; a new thread is created when absent.
    pub checkpoint_id: Option<String>,
}

/// Builds the router with CORS (any origin, method and header) and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/chat_stream/:message", get(chat_stream))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                info_span!("request", method = %req.method(), uri = %req.uri())
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn chat_stream(
    State(state): State<Arc<AppState>>,
    Path(message): Path<String>,
    Query(query): Query<ChatStreamQuery>,
) -> Result<Response, ServerError> {
    if query.checkpoint_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        return Err(ServerError::BadRequest(
            "checkpoint_id must not be empty".into(),
        ));
    }
    debug!(checkpoint_id = ?query.checkpoint_id, "chat stream");

    let (tx, rx) = mpsc::channel::<String>(SSE_BUFFER);
    let runner = Arc::clone(&state.runner);
    let checkpoint_id = query.checkpoint_id;
    tokio::spawn(async move {
        publish_chat(&runner, &message, checkpoint_id, tx).await;
    });

    let stream = ReceiverStream::new(rx).map(|s| Ok::<_, std::io::Error>(Bytes::from(s)));
    let mut res = Response::new(Body::from_stream(stream));
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    res.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(res)
}

async fn not_found(req: Request<Body>) -> ServerError {
    ServerError::NotFound(req.uri().path().to_string())
}

/// Request errors, returned as `{"error":{"message":…}}` with the matching status.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (
            status,
            Json(serde_json::json!({ "error": { "message": self.to_string() } })),
        )
            .into_response()
    }
}
