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
    EventAttendeeRepository,
    event_attendee::{EventAttendeeChanges, NewEventAttendee},
};
use crate::router::AppState;
use crate::routes::{mutation_failure, no_data, not_found, read_failure, success, unauthorized};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeListQuery {
    pub segment_id: Option<Uuid>,
}

// The same handlers answer under both path families the frontend uses.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/event-attendee",
            get(list_attendees).post(create_attendee),
        )
        .route(
            "/api/event-attendee/{id}",
            get(get_attendee).put(update_attendee).delete(delete_attendee),
        )
        .route(
            "/api/event-segment-attendee",
            get(list_attendees).post(create_attendee),
        )
        .route(
            "/api/event-segment-attendee/{id}",
            get(get_attendee).put(update_attendee).delete(delete_attendee),
        )
}

pub async fn list_attendees(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Query(query): Query<AttendeeListQuery>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventAttendeeRepository::new(state.db.clone());
    let attendees = match query.segment_id {
        Some(segment_id) => repo.list_for_segment(segment_id).await,
        None => repo.get_all().await,
    };
    match attendees {
        Ok(attendees) => success(attendees),
        Err(e) => read_failure(e),
    }
}

pub async fn get_attendee(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventAttendeeRepository::new(state.db.clone());
    match repo.get_by_id(id).await {
        Ok(Some(attendee)) => success(attendee),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

pub async fn create_attendee(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<NewEventAttendee>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventAttendeeRepository::new(state.db.clone());
    match repo.create(input).await {
        Ok(attendee) => success(attendee),
        Err(e) => mutation_failure(e),
    }
}

pub async fn update_attendee(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(changes): Json<EventAttendeeChanges>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventAttendeeRepository::new(state.db.clone());
    match repo.update(id, changes).await {
        Ok(attendee) => success(attendee),
        Err(e) => mutation_failure(e),
    }
}

pub async fn delete_attendee(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventAttendeeRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(()) => no_data(),
        Err(e) => mutation_failure(e),
    }
}
