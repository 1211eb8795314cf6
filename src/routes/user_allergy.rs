use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::user::AuthSession;
use crate::repositories::{
    UserAllergyRepository,
    user_allergy::{NewUserAllergy, UserAllergyChanges},
};
use crate::router::AppState;
use crate::routes::{
    failure, mutation_failure, no_data, not_found, read_failure, success, unauthorized,
};

/// The allergy always belongs to the session user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyPayload {
    pub allergy: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/user-allergy", get(list_allergies).post(create_allergy))
        .route(
            "/api/user-allergy/{id}",
            get(get_allergy).put(update_allergy).delete(delete_allergy),
        )
}

pub async fn list_allergies(
    State(state): State<AppState>,
    auth_session: AuthSession,
) -> impl IntoResponse {
    let Some(current) = auth_session.user else {
        return unauthorized();
    };
    let repo = UserAllergyRepository::new(state.db.clone());
    match repo.list_for_user(current.id).await {
        Ok(allergies) => success(allergies),
        Err(e) => read_failure(e),
    }
}

pub async fn get_allergy(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = UserAllergyRepository::new(state.db.clone());
    match repo.get_by_id(id).await {
        Ok(Some(allergy)) => success(allergy),
        Ok(None) => not_found(),
        Err(e) => read_failure(e),
    }
}

pub async fn create_allergy(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Json(payload): Json<AllergyPayload>,
) -> impl IntoResponse {
    let Some(current) = auth_session.user else {
        return unauthorized();
    };
    if payload.allergy.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "allergy must not be empty");
    }
    let repo = UserAllergyRepository::new(state.db.clone());
    let input = NewUserAllergy {
        user_id: current.id,
        allergy: payload.allergy,
    };
    match repo.create(input).await {
        Ok(allergy) => success(allergy),
        Err(e) => mutation_failure(e),
    }
}

pub async fn update_allergy(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
    Json(changes): Json<UserAllergyChanges>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    if matches!(&changes.allergy, Some(a) if a.trim().is_empty()) {
        return failure(StatusCode::BAD_REQUEST, "allergy must not be empty");
    }
    let repo = UserAllergyRepository::new(state.db.clone());
    match repo.update(id, changes).await {
        Ok(allergy) => success(allergy),
        Err(e) => mutation_failure(e),
    }
}

pub async fn delete_allergy(
    State(state): State<AppState>,
    auth_session: AuthSession,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if auth_session.user.is_none() {
        return unauthorized();
    }
    let repo = UserAllergyRepository::new(state.db.clone());
    match repo.delete(id).await {
        Ok(()) => no_data(),
        Err(e) => mutation_failure(e),
    }
}
