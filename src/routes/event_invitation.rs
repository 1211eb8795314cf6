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
    EventInvitationRepository,
    event_invitation::{EventInvitationChanges, InvitationFilter, NewEventInvitation},
};
use crate::router::AppState;
use crate::routes::{
    failure, mutation_failure, no_data, not_found, read_failure, success, unauthorized,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationListQuery {
    /// `sent` or `received`, relative to the signed-in user.
    #[serde(rename = "type")]
    pub direction: Option<String>,
    pub event_id: Option<Uuid>,
}

/// What callers may send when creating an invitation; the sender is always
/// the session user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationPayload {
    pub recipient_id: Uuid,
    pub event_id: Uuid,
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/event-invitation",
            get(list_invitations).post(create_invitation),
        )
        .route(
            "/api/event-invitation/{id}",
            get(get_invitation)
                .put(update_invitation)
                .delete(delete_invitation),
        )
}

pub async fn list_invitations(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Query(query): Query<InvitationListQuery>,
) -> impl IntoResponse {
    let Some(current) = auth_session.user else {
        return unauthorized();
    };

    let mut filter = InvitationFilter {
        event_id: query.event_id,
        ..Default::default()
    };
    match query.direction.as_deref() {
        Some("sent") => filter.sender_id = Some(current.id),
        Some("received") => filter.recipient_id = Some(current.id),
        Some(other) => {
            return failure(
                StatusCode::BAD_REQUEST,
                format!("unknown invitation filter type: {other}"),
            );
        }
        None => {}
    }

    let repo = EventInvitationRepository::new(state.db.clone());
    match repo.list_filtered(filter).await {
        Ok(invitations) => success(invitations),
        Err(e) => read_failure(e),
    }
}

pub async fn get_invitation(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventInvitationRepository::new(state.db.clone());
    match repo.get_by_id(id).await {
        Ok(Some(invitation)) => success(invitation),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

pub async fn create_invitation(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(payload): Json<InvitationPayload>,
) -> impl IntoResponse {
    let Some(current) = auth_session.user else {
        return unauthorized();
    };
    let repo = EventInvitationRepository::new(state.db.clone());
    let input = NewEventInvitation {
        sender_id: current.id,
        recipient_id: payload.recipient_id,
        event_id: payload.event_id,
        message: payload.message,
    };
    match repo.create(input).await {
        Ok(invitation) => success(invitation),
        Err(e) => mutation_failure(e),
    }
}

pub async fn update_invitation(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(changes): Json<EventInvitationChanges>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventInvitationRepository::new(state.db.clone());
    match repo.update(id, changes).await {
        Ok(invitation) => success(invitation),
        Err(e) => mutation_failure(e),
    }
}

pub async fn delete_invitation(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventInvitationRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(()) => no_data(),
        Err(e) => mutation_failure(e),
    }
}
