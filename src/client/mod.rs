//! Typed client for the UpSign REST API.
//!
//! Every method funnels through [`UpSignClient::send`], which stamps a
//! cache-busting query parameter on the URL, carries the session cookie via
//! the cookie store, and unwraps the `{success, data | error}` envelope.
//! Payloads deserialize into the same typed structs the server serializes,
//! so date-time fields come back as `chrono` values by declaration rather
//! than by sniffing strings.

use chrono::Utc;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::router::SignupPayload;
use crate::entities::{event_chat_message_reaction, user, user_allergy};
use crate::repositories::event::{EventChanges, EventView, NewEvent};
use crate::repositories::event_attendee::{
    EventAttendeeChanges, EventAttendeeView, NewEventAttendee,
};
use crate::repositories::event_attendee_contribution::{
    ContributionChanges, ContributionView, NewContribution,
};
use crate::repositories::event_chat_message::{EventChatMessageChanges, EventChatMessageView};
use crate::repositories::event_invitation::{EventInvitationChanges, EventInvitationView};
use crate::repositories::event_segment::{EventSegmentChanges, EventSegmentView, NewEventSegment};
use crate::repositories::user::{UserChanges, UserView};
use crate::repositories::user_allergy::UserAllergyChanges;
use crate::routes::event_chat_message::ChatMessagePayload;
use crate::routes::event_chat_message_reaction::ReactionPayload;
use crate::routes::event_invitation::InvitationPayload;
use crate::routes::user_allergy::AllergyPayload;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server said no: either `success: false` or a non-OK status.
    #[error("{0}")]
    Api(String),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

fn unwrap_envelope(status: StatusCode, envelope: Envelope) -> Result<Value, ClientError> {
    if !envelope.success || !status.is_success() {
        return Err(ClientError::Api(
            envelope.error.unwrap_or_else(|| status.to_string()),
        ));
    }
    Ok(envelope.data)
}

pub struct UpSignClient {
    base_url: String,
    http: Client,
}

impl UpSignClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// The single request primitive. Returns the envelope's `data` (null for
    /// an HTTP 204).
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .query(&[("_", Utc::now().timestamp_millis().to_string())]);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        let envelope: Envelope = match response.json().await {
            Ok(envelope) => envelope,
            // No envelope to speak of; fall back to the status line.
            Err(_) if !status.is_success() => return Err(ClientError::Api(status.to_string())),
            Err(e) => return Err(ClientError::Transport(e)),
        };
        unwrap_envelope(status, envelope)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let data = self.send(method, path, query, body).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), ClientError> {
        self.send(method, path, &[], body).await.map(|_| ())
    }

    // Account

    pub async fn send_login_code(&self, phone_number: &str) -> Result<(), ClientError> {
        self.request_unit(
            Method::POST,
            "/api/account/login",
            Some(serde_json::json!({ "phoneNumber": phone_number })),
        )
        .await
    }

    pub async fn verify_login_code(
        &self,
        phone_number: &str,
        otp: &str,
    ) -> Result<user::Model, ClientError> {
        self.request(
            Method::POST,
            "/api/account/login/otp/verify",
            &[],
            Some(serde_json::json!({ "phoneNumber": phone_number, "otp": otp })),
        )
        .await
    }

    pub async fn sign_up(&self, payload: &SignupPayload) -> Result<UserView, ClientError> {
        self.request(
            Method::POST,
            "/api/account/signup",
            &[],
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    pub async fn log_out(&self) -> Result<(), ClientError> {
        self.request_unit(Method::POST, "/api/account/logout", None).await
    }

    // Events

    pub async fn events(&self, include_past: bool) -> Result<Vec<EventView>, ClientError> {
        let mut query = Vec::new();
        if include_past {
            query.push(("includePast", "true".to_string()));
        }
        self.request(Method::GET, "/api/event", &query, None).await
    }

    pub async fn event(&self, id: Uuid) -> Result<EventView, ClientError> {
        self.request(Method::GET, &format!("/api/event/{id}"), &[], None).await
    }

    pub async fn create_event(&self, input: &NewEvent) -> Result<EventView, ClientError> {
        self.request(
            Method::POST,
            "/api/event",
            &[],
            Some(serde_json::to_value(input)?),
        )
        .await
    }

    pub async fn update_event(
        &self,
        id: Uuid,
        changes: &EventChanges,
    ) -> Result<EventView, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/event/{id}"),
            &[],
            Some(serde_json::to_value(changes)?),
        )
        .await
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<(), ClientError> {
        self.request_unit(Method::DELETE, &format!("/api/event/{id}"), None).await
    }

    // Segments

    pub async fn segments(
        &self,
        event_id: Option<Uuid>,
    ) -> Result<Vec<EventSegmentView>, ClientError> {
        let mut query = Vec::new();
        if let Some(event_id) = event_id {
            query.push(("eventId", event_id.to_string()));
        }
        self.request(Method::GET, "/api/event-segment", &query, None).await
    }

    pub async fn segment(&self, id: Uuid) -> Result<EventSegmentView, ClientError> {
        self.request(Method::GET, &format!("/api/event-segment/{id}"), &[], None)
            .await
    }

    pub async fn create_segment(
        &self,
        input: &NewEventSegment,
    ) -> Result<EventSegmentView, ClientError> {
        self.request(
            Method::POST,
            "/api/event-segment",
            &[],
            Some(serde_json::to_value(input)?),
        )
        .await
    }

    pub async fn update_segment(
        &self,
        id: Uuid,
        changes: &EventSegmentChanges,
    ) -> Result<EventSegmentView, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/event-segment/{id}"),
            &[],
            Some(serde_json::to_value(changes)?),
        )
        .await
    }

    pub async fn delete_segment(&self, id: Uuid) -> Result<(), ClientError> {
        self.request_unit(Method::DELETE, &format!("/api/event-segment/{id}"), None)
            .await
    }

    // Attendees

    pub async fn attendees(
        &self,
        segment_id: Option<Uuid>,
    ) -> Result<Vec<EventAttendeeView>, ClientError> {
        let mut query = Vec::new();
        if let Some(segment_id) = segment_id {
            query.push(("segmentId", segment_id.to_string()));
        }
        self.request(Method::GET, "/api/event-attendee", &query, None).await
    }

    pub async fn attendee(&self, id: Uuid) -> Result<EventAttendeeView, ClientError> {
        self.request(Method::GET, &format!("/api/event-attendee/{id}"), &[], None)
            .await
    }

    pub async fn create_attendee(
        &self,
        input: &NewEventAttendee,
    ) -> Result<EventAttendeeView, ClientError> {
        self.request(
            Method::POST,
            "/api/event-attendee",
            &[],
            Some(serde_json::to_value(input)?),
        )
        .await
    }

    pub async fn update_attendee(
        &self,
        id: Uuid,
        changes: &EventAttendeeChanges,
    ) -> Result<EventAttendeeView, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/event-attendee/{id}"),
            &[],
            Some(serde_json::to_value(changes)?),
        )
        .await
    }

    pub async fn delete_attendee(&self, id: Uuid) -> Result<(), ClientError> {
        self.request_unit(Method::DELETE, &format!("/api/event-attendee/{id}"), None)
            .await
    }

    // Contributions

    pub async fn contributions(&self) -> Result<Vec<ContributionView>, ClientError> {
        self.request(Method::GET, "/api/event-attendee-contribution", &[], None)
            .await
    }

    pub async fn contribution(&self, id: Uuid) -> Result<ContributionView, ClientError> {
        self.request(
            Method::GET,
            &format!("/api/event-attendee-contribution/{id}"),
            &[],
            None,
        )
        .await
    }

    pub async fn create_contribution(
        &self,
        input: &NewContribution,
    ) -> Result<ContributionView, ClientError> {
        self.request(
            Method::POST,
            "/api/event-attendee-contribution",
            &[],
            Some(serde_json::to_value(input)?),
        )
        .await
    }

    pub async fn update_contribution(
        &self,
        id: Uuid,
        changes: &ContributionChanges,
    ) -> Result<ContributionView, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/event-attendee-contribution/{id}"),
            &[],
            Some(serde_json::to_value(changes)?),
        )
        .await
    }

    pub async fn delete_contribution(&self, id: Uuid) -> Result<(), ClientError> {
        self.request_unit(
            Method::DELETE,
            &format!("/api/event-attendee-contribution/{id}"),
            None,
        )
        .await
    }

    // Invitations

    pub async fn invitations(
        &self,
        direction: Option<&str>,
        event_id: Option<Uuid>,
    ) -> Result<Vec<EventInvitationView>, ClientError> {
        let mut query = Vec::new();
        if let Some(direction) = direction {
            query.push(("type", direction.to_string()));
        }
        if let Some(event_id) = event_id {
            query.push(("eventId", event_id.to_string()));
        }
        self.request(Method::GET, "/api/event-invitation", &query, None).await
    }

    pub async fn create_invitation(
        &self,
        payload: &InvitationPayload,
    ) -> Result<EventInvitationView, ClientError> {
        self.request(
            Method::POST,
            "/api/event-invitation",
            &[],
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    pub async fn update_invitation(
        &self,
        id: Uuid,
        changes: &EventInvitationChanges,
    ) -> Result<EventInvitationView, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/event-invitation/{id}"),
            &[],
            Some(serde_json::to_value(changes)?),
        )
        .await
    }

    pub async fn delete_invitation(&self, id: Uuid) -> Result<(), ClientError> {
        self.request_unit(Method::DELETE, &format!("/api/event-invitation/{id}"), None)
            .await
    }

    // Chat

    pub async fn chat_messages(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<EventChatMessageView>, ClientError> {
        self.request(
            Method::GET,
            "/api/event-chat-message",
            &[("eventId", event_id.to_string())],
            None,
        )
        .await
    }

    pub async fn post_chat_message(
        &self,
        payload: &ChatMessagePayload,
    ) -> Result<EventChatMessageView, ClientError> {
        self.request(
            Method::POST,
            "/api/event-chat-message",
            &[],
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    pub async fn update_chat_message(
        &self,
        id: Uuid,
        changes: &EventChatMessageChanges,
    ) -> Result<EventChatMessageView, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/event-chat-message/{id}"),
            &[],
            Some(serde_json::to_value(changes)?),
        )
        .await
    }

    pub async fn reactions(
        &self,
        message_id: Uuid,
    ) -> Result<Vec<event_chat_message_reaction::Model>, ClientError> {
        self.request(
            Method::GET,
            "/api/event-chat-message-reaction",
            &[("messageId", message_id.to_string())],
            None,
        )
        .await
    }

    pub async fn add_reaction(
        &self,
        payload: &ReactionPayload,
    ) -> Result<event_chat_message_reaction::Model, ClientError> {
        self.request(
            Method::POST,
            "/api/event-chat-message-reaction",
            &[],
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    pub async fn remove_reaction(&self, id: Uuid) -> Result<(), ClientError> {
        self.request_unit(
            Method::DELETE,
            &format!("/api/event-chat-message-reaction/{id}"),
            None,
        )
        .await
    }

    // Users and allergies

    pub async fn me(&self) -> Result<UserView, ClientError> {
        self.request(Method::GET, "/api/user/me", &[], None).await
    }

    pub async fn user(&self, id: Uuid) -> Result<UserView, ClientError> {
        self.request(Method::GET, &format!("/api/user/{id}"), &[], None).await
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> Result<UserView, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/user/{id}"),
            &[],
            Some(serde_json::to_value(changes)?),
        )
        .await
    }

    pub async fn allergies(&self) -> Result<Vec<user_allergy::Model>, ClientError> {
        self.request(Method::GET, "/api/user-allergy", &[], None).await
    }

    pub async fn add_allergy(
        &self,
        payload: &AllergyPayload,
    ) -> Result<user_allergy::Model, ClientError> {
        self.request(
            Method::POST,
            "/api/user-allergy",
            &[],
            Some(serde_json::to_value(payload)?),
        )
        .await
    }

    pub async fn update_allergy(
        &self,
        id: Uuid,
        changes: &UserAllergyChanges,
    ) -> Result<user_allergy::Model, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/user-allergy/{id}"),
            &[],
            Some(serde_json::to_value(changes)?),
        )
        .await
    }

    pub async fn remove_allergy(&self, id: Uuid) -> Result<(), ClientError> {
        self.request_unit(Method::DELETE, &format!("/api/user-allergy/{id}"), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::event;

    #[test]
    fn envelope_data_comes_through_on_success() {
        let envelope = Envelope {
            success: true,
            data: serde_json::json!({"name": "x"}),
            error: None,
        };
        let data = unwrap_envelope(StatusCode::OK, envelope).unwrap();
        assert_eq!(data, serde_json::json!({"name": "x"}));
    }

    #[test]
    fn failed_envelope_surfaces_the_server_error_text() {
        let envelope = Envelope {
            success: false,
            data: Value::Null,
            error: Some("no account for that phone number".into()),
        };
        let err = unwrap_envelope(StatusCode::OK, envelope).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api(msg) if msg == "no account for that phone number"
        ));
    }

    #[test]
    fn non_ok_status_without_error_text_falls_back_to_the_status() {
        let envelope = Envelope {
            success: true,
            data: Value::Null,
            error: None,
        };
        let err = unwrap_envelope(StatusCode::BAD_GATEWAY, envelope).unwrap_err();
        assert!(matches!(err, ClientError::Api(msg) if msg.contains("502")));
    }

    // Date-times are parsed because the field's declared type says so; a
    // string field that merely looks like a timestamp stays a string.
    #[test]
    fn declared_date_fields_deserialize_and_lookalike_strings_do_not() {
        let id = Uuid::new_v4();
        let host_id = Uuid::new_v4();
        let payload = serde_json::json!({
            "id": id,
            "name": "2025-06-01T18:00:00",
            "date": "2025-06-01T18:00:00",
            "location": "Community hall",
            "description": "Bring a dish",
            "icon": "pumpkin",
            "hostId": host_id,
            "createdAt": "2025-05-01T09:30:00",
            "updatedAt": "2025-05-01T09:30:00",
        });

        let model: event::Model = serde_json::from_value(payload).unwrap();
        assert_eq!(
            model.date,
            chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap()
        );
        // The name survives verbatim even though it matches the shape.
        assert_eq!(model.name, "2025-06-01T18:00:00");
    }

    #[test]
    fn views_flatten_back_out_of_the_wire_shape() {
        let user_id = Uuid::new_v4();
        let payload = serde_json::json!({
            "id": user_id,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "dateOfBirth": "1990-12-10",
            "phoneNumber": "+15555551212",
            "verified": true,
            "locked": false,
            "lastLogin": null,
            "createdAt": "2025-05-01T09:30:00",
            "updatedAt": "2025-05-01T09:30:00",
            "allergies": [{
                "id": Uuid::new_v4(),
                "userId": user_id,
                "allergy": "peanuts",
                "createdAt": "2025-05-01T09:30:00",
                "updatedAt": "2025-05-01T09:30:00",
            }],
        });

        let view: UserView = serde_json::from_value(payload).unwrap();
        assert_eq!(view.user.first_name, "Ada");
        assert_eq!(view.allergies.len(), 1);
        assert_eq!(view.allergies[0].allergy, "peanuts");
    }
}
