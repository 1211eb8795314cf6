use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::user::AuthSession;
use crate::repositories::{
    EventChatMessageRepository,
    event_chat_message::{EventChatMessageChanges, NewEventChatMessage},
};
use crate::router::AppState;
use crate::routes::{
    failure, mutation_failure, no_data, not_found, read_failure, success, unauthorized,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatListQuery {
    pub event_id: Option<Uuid>,
}

/// The author is always the session user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub event_id: Uuid,
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/event-chat-message",
            get(list_messages).post(create_message),
        )
        .route(
            "/api/event-chat-message/{id}",
            get(get_message).put(update_message).delete(delete_message),
        )
}

pub async fn list_messages(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Query(query): Query<ChatListQuery>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let Some(event_id) = query.event_id else {
        return failure(StatusCode::BAD_REQUEST, "eventId is required");
    };
    let repo = EventChatMessageRepository::new(state.db.clone());
    match repo.list_for_event(event_id).await {
        Ok(messages) => success(messages),
        Err(e) => read_failure(e),
    }
}

pub async fn get_message(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventChatMessageRepository::new(state.db.clone());
    match repo.get_by_id(id).await {
        Ok(Some(message)) => success(message),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

pub async fn create_message(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(payload): Json<ChatMessagePayload>,
) -> impl IntoResponse {
    let Some(current) = auth_session.user else {
        return unauthorized();
    };
    if payload.message.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "message must not be empty");
    }
    let repo = EventChatMessageRepository::new(state.db.clone());
    let input = NewEventChatMessage {
        user_id: current.id,
        event_id: payload.event_id,
        message: payload.message,
    };
    match repo.create(input).await {
        Ok(message) => success(message),
        Err(e) => mutation_failure(e),
    }
}

pub async fn update_message(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(changes): Json<EventChatMessageChanges>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    if matches!(&changes.message, Some(m) if m.trim().is_empty()) {
        return failure(StatusCode::BAD_REQUEST, "message must not be empty");
    }
    let repo = EventChatMessageRepository::new(state.db.clone());
    match repo.update(id, changes).await {
        Ok(message) => success(message),
        Err(e) => mutation_failure(e),
    }
}

pub async fn delete_message(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventChatMessageRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(()) => no_data(),
        Err(e) => mutation_failure(e),
    }
}
