//! Data access, one repository per entity.
//!
//! Every repository exposes the same surface: `get_by_id` (not-found is
//! `Ok(None)`), `get_all`, `create`, `update`, `delete`. Reads eager-load a
//! fixed set of direct relations declared by the repository's view struct;
//! nothing is loaded transitively. Create/update inputs carry scalar and
//! foreign-key fields only, so relation payloads cannot leak into writes.
//!
//! Mutations report failures through [`MutationError`]. Callers that only
//! care about "did it work" collapse the result with `.ok()` / `.is_ok()`.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub mod event;
pub mod event_attendee;
pub mod event_attendee_contribution;
pub mod event_chat_message;
pub mod event_chat_message_reaction;
pub mod event_invitation;
pub mod event_segment;
pub mod user;
pub mod user_allergy;
pub mod user_otp;

pub use event::EventRepository;
pub use event_attendee::EventAttendeeRepository;
pub use event_attendee_contribution::EventAttendeeContributionRepository;
pub use event_chat_message::EventChatMessageRepository;
pub use event_chat_message_reaction::EventChatMessageReactionRepository;
pub use event_invitation::EventInvitationRepository;
pub use event_segment::EventSegmentRepository;
pub use user::UserRepository;
pub use user_allergy::UserAllergyRepository;
pub use user_otp::UserOtpRepository;

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("record not found")]
    NotFound,

    #[error("constraint violated: {0}")]
    Conflict(String),

    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for MutationError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => MutationError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => MutationError::Conflict(msg),
            _ => match err {
                DbErr::RecordNotFound(_) => MutationError::NotFound,
                other => MutationError::Db(other),
            },
        }
    }
}

/// Timestamp used for `created_at`/`updated_at` columns.
pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{EventAttendeeContributionRepository, EventAttendeeRepository};
    use crate::entities::{event_attendee, event_attendee_contribution, event_segment, user};

    fn stamp() -> chrono::NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn a_user(id: Uuid) -> user::Model {
        user::Model {
            id,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            phone_number: "+15555551212".into(),
            verified: true,
            locked: false,
            last_login: None,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    // The projection of each repository is one level deep: a contribution
    // exposes its attendee model, and the segment (and from it the event id)
    // is only reachable through the attendee repository's own projection.
    #[tokio::test]
    async fn contribution_reaches_event_one_layer_at_a_time() {
        let event_id = Uuid::new_v4();
        let user = a_user(Uuid::new_v4());
        let segment = event_segment::Model {
            id: Uuid::new_v4(),
            name: "Main course".into(),
            event_id,
            created_at: stamp(),
            updated_at: stamp(),
        };
        let attendee = event_attendee::Model {
            id: Uuid::new_v4(),
            user_id: user.id,
            segment_id: segment.id,
            created_at: stamp(),
            updated_at: stamp(),
        };
        let contribution = event_attendee_contribution::Model {
            id: Uuid::new_v4(),
            item: "Lasagna".into(),
            description: "vegetarian".into(),
            quantity: 3,
            attendee_id: attendee.id,
            created_at: stamp(),
            updated_at: stamp(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // contribution get_by_id: the row, then its attendee
            .append_query_results([vec![contribution.clone()]])
            .append_query_results([vec![attendee.clone()]])
            // attendee get_by_id: the row, then user, segment, contributions
            .append_query_results([vec![attendee.clone()]])
            .append_query_results([vec![user.clone()]])
            .append_query_results([vec![segment.clone()]])
            .append_query_results([vec![contribution.clone()]])
            .into_connection();

        let contributions = EventAttendeeContributionRepository::new(db.clone());
        let view = contributions
            .get_by_id(contribution.id)
            .await
            .unwrap()
            .expect("contribution exists");
        assert_eq!(view.contribution.quantity, 3);
        let included_attendee = view.attendee.expect("attendee is part of the projection");
        assert_eq!(included_attendee.id, attendee.id);

        let attendees = EventAttendeeRepository::new(db);
        let view = attendees
            .get_by_id(included_attendee.id)
            .await
            .unwrap()
            .expect("attendee exists");
        let included_segment = view.segment.expect("segment is part of the projection");
        assert_eq!(included_segment.event_id, event_id);
    }
}
