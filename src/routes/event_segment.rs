use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::user::AuthSession;
use crate::repositories::{
    EventSegmentRepository,
    event_segment::{EventSegmentChanges, NewEventSegment},
};
use crate::router::AppState;
use crate::routes::{
    failure, mutation_failure, no_data, not_found, read_failure, success, unauthorized,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentListQuery {
    pub event_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/event-segment", get(list_segments).post(create_segment))
        .route(
            "/api/event-segment/{id}",
            get(get_segment).put(update_segment).delete(delete_segment),
        )
}

pub async fn list_segments(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Query(query): Query<SegmentListQuery>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventSegmentRepository::new(state.db.clone());
    let segments = match query.event_id {
        Some(event_id) => repo.list_for_event(event_id).await,
        None => repo.get_all().await,
    };
    match segments {
        Ok(segments) => success(segments),
        Err(e) => read_failure(e),
    }
}

pub async fn get_segment(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventSegmentRepository::new(state.db.clone());
    match repo.get_by_id(id).await {
        Ok(Some(segment)) => success(segment),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

pub async fn create_segment(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<NewEventSegment>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    if input.name.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "segment name is required");
    }
    let repo = EventSegmentRepository::new(state.db.clone());
    match repo.create(input).await {
        Ok(segment) => success(segment),
        Err(e) => mutation_failure(e),
    }
}

pub async fn update_segment(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(changes): Json<EventSegmentChanges>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventSegmentRepository::new(state.db.clone());
    match repo.update(id, changes).await {
        Ok(segment) => success(segment),
        Err(e) => mutation_failure(e),
    }
}

pub async fn delete_segment(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventSegmentRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(()) => no_data(),
        Err(e) => mutation_failure(e),
    }
}
