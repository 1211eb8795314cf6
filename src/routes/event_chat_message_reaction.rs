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
    EventChatMessageReactionRepository, event_chat_message_reaction::NewReaction,
};
use crate::router::AppState;
use crate::routes::{failure, mutation_failure, no_data, read_failure, success, unauthorized};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionListQuery {
    pub message_id: Option<Uuid>,
}

/// The reacting user is always the session user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionPayload {
    pub message_id: Uuid,
    pub reaction: String,
}

// Reactions are added and removed, never edited.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/event-chat-message-reaction",
            get(list_reactions).post(create_reaction),
        )
        .route(
            "/api/event-chat-message-reaction/{id}",
            axum::routing::delete(delete_reaction),
        )
}

pub async fn list_reactions(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Query(query): Query<ReactionListQuery>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventChatMessageReactionRepository::new(state.db.clone());
    let reactions = match query.message_id {
        Some(message_id) => repo.list_for_message(message_id).await,
        None => repo.get_all().await,
    };
    match reactions {
        Ok(reactions) => success(reactions),
        Err(e) => read_failure(e),
    }
}

pub async fn create_reaction(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(payload): Json<ReactionPayload>,
) -> impl IntoResponse {
    let Some(current) = auth_session.user else {
        return unauthorized();
    };
    if payload.reaction.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "reaction must not be empty");
    }
    let repo = EventChatMessageReactionRepository::new(state.db.clone());
    let input = NewReaction {
        message_id: payload.message_id,
        user_id: current.id,
        reaction: payload.reaction,
    };
    match repo.create(input).await {
        Ok(reaction) => success(reaction),
        Err(e) => mutation_failure(e),
    }
}

pub async fn delete_reaction(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventChatMessageReactionRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(()) => no_data(),
        Err(e) => mutation_failure(e),
    }
}
