use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::auth::user::AuthSession;
use crate::repositories::{UserRepository, user::UserChanges};
use crate::router::AppState;
use crate::routes::{
    failure, mutation_failure, not_found, read_failure, success, unauthorized,
};
use crate::sms;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/user/me", get(me))
        .route("/api/user/{id}", get(get_user).put(update_user))
}

pub async fn me(State(state): State<AppState>, auth_session: AuthSession) -> impl IntoResponse {
    let Some(current) = auth_session.user else {
        return unauthorized();
    };
    let repo = UserRepository::new(state.db.clone());
    match repo.get_by_id(current.id).await {
        Ok(Some(user)) => success(user),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

pub async fn get_user(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = UserRepository::new(state.db.clone());
    match repo.get_by_id(id).await {
        Ok(Some(user)) => success(user),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

/// Users may only edit their own record; account flags stay server-owned.
pub async fn update_user(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(mut changes): Json<UserChanges>,
) -> impl IntoResponse {
    let Some(current) = auth_session.user else {
        return unauthorized();
    };
    if current.id != id {
        return failure(StatusCode::FORBIDDEN, "you can only edit your own profile");
    }
    if let Some(phone_number) = &changes.phone_number {
        if let Err(e) = sms::validate_recipient(phone_number) {
            return failure(StatusCode::BAD_REQUEST, e.to_string());
        }
    }
    changes.verified = None;
    changes.locked = None;
    changes.last_login = None;

    let repo = UserRepository::new(state.db.clone());
    match repo.update(id, changes).await {
        Ok(user) => success(user),
        Err(e) => mutation_failure(e),
    }
}
