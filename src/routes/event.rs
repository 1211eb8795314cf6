use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::user::AuthSession;
use crate::repositories::{
    EventRepository,
    event::{EventChanges, NewEvent},
};
use crate::router::AppState;
use crate::routes::{mutation_failure, no_data, not_found, read_failure, success, unauthorized};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub include_past: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/event", get(list_events).post(create_event))
        .route(
            "/api/event/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

pub async fn list_events(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Query(query): Query<EventListQuery>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventRepository::new(state.db.clone());
    match repo.list(query.include_past.unwrap_or(false)).await {
        Ok(events) => success(events),
        Err(e) => read_failure(e),
    }
}

pub async fn get_event(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventRepository::new(state.db.clone());
    match repo.get_by_id(id).await {
        Ok(Some(event)) => success(event),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

pub async fn create_event(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<NewEvent>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventRepository::new(state.db.clone());
    match repo.create(input).await {
        Ok(event) => success(event),
        Err(e) => mutation_failure(e),
    }
}

pub async fn update_event(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(changes): Json<EventChanges>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventRepository::new(state.db.clone());
    match repo.update(id, changes).await {
        Ok(event) => success(event),
        Err(e) => mutation_failure(e),
    }
}

pub async fn delete_event(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(()) => no_data(),
        Err(e) => mutation_failure(e),
    }
}
