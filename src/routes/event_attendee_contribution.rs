use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::auth::user::AuthSession;
use crate::repositories::{
    EventAttendeeContributionRepository,
    event_attendee_contribution::{ContributionChanges, NewContribution},
};
use crate::router::AppState;
use crate::routes::{
    failure, mutation_failure, no_data, not_found, read_failure, success, unauthorized,
};

// The same handlers answer under both path families the frontend uses.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/event-attendee-contribution",
            get(list_contributions).post(create_contribution),
        )
        .route(
            "/api/event-attendee-contribution/{id}",
            get(get_contribution)
                .put(update_contribution)
                .delete(delete_contribution),
        )
        .route(
            "/api/event-segment-attendee-contribution",
            get(list_contributions).post(create_contribution),
        )
        .route(
            "/api/event-segment-attendee-contribution/{id}",
            get(get_contribution)
                .put(update_contribution)
                .delete(delete_contribution),
        )
}

pub async fn list_contributions(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventAttendeeContributionRepository::new(state.db.clone());
    match repo.get_all().await {
        Ok(contributions) => success(contributions),
        Err(e) => read_failure(e),
    }
}

pub async fn get_contribution(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventAttendeeContributionRepository::new(state.db.clone());
    match repo.get_by_id(id).await {
        Ok(Some(contribution)) => success(contribution),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

pub async fn create_contribution(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(input): Json<NewContribution>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    if input.quantity < 1 {
        return failure(StatusCode::BAD_REQUEST, "quantity must be at least 1");
    }
    let repo = EventAttendeeContributionRepository::new(state.db.clone());
    match repo.create(input).await {
        Ok(contribution) => success(contribution),
        Err(e) => mutation_failure(e),
    }
}

pub async fn update_contribution(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(changes): Json<ContributionChanges>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    if matches!(changes.quantity, Some(q) if q < 1) {
        return failure(StatusCode::BAD_REQUEST, "quantity must be at least 1");
    }
    let repo = EventAttendeeContributionRepository::new(state.db.clone());
    match repo.update(id, changes).await {
        Ok(contribution) => success(contribution),
        Err(e) => mutation_failure(e),
    }
}

pub async fn delete_contribution(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = EventAttendeeContributionRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(()) => no_data(),
        Err(e) => mutation_failure(e),
    }
}
