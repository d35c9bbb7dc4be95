// HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::session::is_valid_session_id;
use super::ChatServer;
use crate::router::{ChatError, MessageRouter};

/// Header carrying the conversation id on requests and responses
pub const SESSION_HEADER: &str = "x-session-id";

/// Create the main application router
pub fn create_router(server: Arc<ChatServer>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/chat", post(handle_chat))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .with_state(server)
}

/// Request body for POST /chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body for POST /chat
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Handle POST /chat - Main chat endpoint
///
/// Once a session is resolved the response carries its `X-Session-Id`, on
/// errors too. Requests rejected before that echo the client's id when it is
/// valid and never create or lock a session.
async fn handle_chat(
    State(server): State<Arc<ChatServer>>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let requested_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);
    let echoed_id = requested_id.filter(|id| is_valid_session_id(id));

    let message = match payload {
        Ok(Json(request)) => request.message.unwrap_or_default(),
        Err(e) => {
            let response = AppError::InvalidBody(e.body_text()).into_response();
            return with_session_header(response, echoed_id);
        }
    };

    if let Err(e) = MessageRouter::validate(&message) {
        return with_session_header(AppError::from(e).into_response(), echoed_id);
    }

    let mut session = server.session_manager().acquire(requested_id).await;

    tracing::info!(session_id = %session.id, "Handling chat message");

    let result = server
        .message_router()
        .handle_chat(&mut session.conversation, &message)
        .await;

    session.touch();

    let response = match result {
        Ok(response) => Json(ChatResponse { response }).into_response(),
        Err(e) => AppError::from(e).into_response(),
    };
    with_session_header(response, Some(session.id.as_str()))
}

fn with_session_header(mut response: Response, session_id: Option<&str>) -> Response {
    if let Some(value) = session_id.and_then(|id| HeaderValue::from_str(id).ok()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// Handle GET / - API overview
async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to Oakbot API!",
        "endpoints": {
            "/chat": "POST - Send a message to the chatbot",
            "/health": "GET - Check API health",
            "/sessions/:id": "GET - Inspect a conversation, DELETE - Forget it"
        }
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub ai_available: bool,
    pub active_sessions: usize,
    pub uptime_seconds: u64,
}

/// Handle GET /health - Health check endpoint
pub async fn health_check(State(server): State<Arc<ChatServer>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        message: "Oakbot backend is running!".to_string(),
        ai_available: server.message_router().delegate_status().is_ready(),
        active_sessions: server.session_manager().active_count(),
        uptime_seconds: server.uptime().as_secs(),
    })
}

/// Session information
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub created_at: String,
    pub last_activity: String,
    pub message_count: usize,
}

/// Handle GET /sessions/:id - Retrieve session state
async fn get_session(
    State(server): State<Arc<ChatServer>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfo>, AppError> {
    let session = server
        .session_manager()
        .get(&session_id)
        .ok_or(AppError::SessionNotFound)?;
    let session = session.lock().await;

    Ok(Json(SessionInfo {
        id: session.id.clone(),
        created_at: session.created_at.to_rfc3339(),
        last_activity: session.last_activity.to_rfc3339(),
        message_count: session.conversation.message_count(),
    }))
}

/// Handle DELETE /sessions/:id - Delete session
async fn delete_session(
    State(server): State<Arc<ChatServer>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if server.session_manager().delete(&session_id) {
        tracing::info!(session_id = %session_id, "Deleted session");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound)
    }
}

/// Error body: `{"error": ..., "details": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application errors with HTTP status mapping
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Invalid request body")]
    InvalidBody(String),

    #[error("Session not found")]
    SessionNotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::Chat(ChatError::Validation(_)) => (StatusCode::BAD_REQUEST, None),
            AppError::Chat(e @ ChatError::Internal(_)) => {
                tracing::error!(error = ?e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.details())
            }
            AppError::InvalidBody(reason) => (StatusCode::BAD_REQUEST, Some(reason.clone())),
            AppError::SessionNotFound => (StatusCode::NOT_FOUND, None),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
