//! REST surface. Every handler answers with the `{success, data | error}`
//! envelope and requires a session unless it lives under `/api/account`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::repositories::MutationError;

pub mod event;
pub mod event_attendee;
pub mod event_attendee_contribution;
pub mod event_chat_message;
pub mod event_chat_message_reaction;
pub mod event_invitation;
pub mod event_segment;
pub mod user;
pub mod user_allergy;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn success<T: Serialize>(data: T) -> Response {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
    .into_response()
}

/// Success with nothing to report (deletes, logouts).
pub fn no_data() -> Response {
    Json(ApiResponse::<()> {
        success: true,
        data: None,
        error: None,
    })
    .into_response()
}

pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
        .into_response()
}

pub fn unauthorized() -> Response {
    failure(StatusCode::UNAUTHORIZED, "not signed in")
}

pub fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "record not found")
}

pub fn mutation_failure(err: MutationError) -> Response {
    match err {
        MutationError::NotFound => failure(StatusCode::NOT_FOUND, "record not found"),
        MutationError::Conflict(msg) => failure(StatusCode::CONFLICT, msg),
        MutationError::Db(e) => {
            tracing::error!("database error: {e}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "persistence failure")
        }
    }
}

pub fn read_failure(err: sea_orm::DbErr) -> Response {
    tracing::error!("database error: {err}");
    failure(StatusCode::INTERNAL_SERVER_ERROR, "persistence failure")
}

#[cfg(test)]
mod tests {
    use super::ApiResponse;

    #[test]
    fn envelope_shape_matches_the_wire_contract() {
        let ok = serde_json::to_value(ApiResponse {
            success: true,
            data: Some(7),
            error: None,
        })
        .unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 7}));

        let err = serde_json::to_value(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some("nope".into()),
        })
        .unwrap();
        assert_eq!(err, serde_json::json!({"success": false, "error": "nope"}));
    }
}
