use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{
    event_attendee, event_attendee_contribution, event_segment, prelude::*, user,
};

/// Attendee record plus its declared projection: the signed-up user, the
/// segment joined, and the attendee's contributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendeeView {
    #[serde(flatten)]
    pub attendee: event_attendee::Model,
    pub user: Option<user::Model>,
    pub segment: Option<event_segment::Model>,
    pub contributions: Vec<event_attendee_contribution::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventAttendee {
    pub user_id: Uuid,
    pub segment_id: Uuid,
}

/// Moving an attendee between segments re-checks the one-signup-per-segment
/// rule at the store, surfacing as a conflict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventAttendeeChanges {
    pub segment_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct EventAttendeeRepository {
    db: DatabaseConnection,
}

impl EventAttendeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<EventAttendeeView>, DbErr> {
        let Some(model) = EventAttendee::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn get_all(&self) -> Result<Vec<EventAttendeeView>, DbErr> {
        let attendees = EventAttendee::find().all(&self.db).await?;
        self.hydrate_many(attendees).await
    }

    pub async fn list_for_segment(
        &self,
        segment_id: Uuid,
    ) -> Result<Vec<EventAttendeeView>, DbErr> {
        let attendees = EventAttendee::find()
            .filter(event_attendee::Column::SegmentId.eq(segment_id))
            .all(&self.db)
            .await?;
        self.hydrate_many(attendees).await
    }

    pub async fn create(
        &self,
        input: NewEventAttendee,
    ) -> Result<EventAttendeeView, MutationError> {
        let model = event_attendee::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            segment_id: Set(input.segment_id),
            created_at: Set(now()),
            updated_at: Set(now()),
        }
        .insert(&self.db)
        .await?;
        Ok(self.hydrate(model).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: EventAttendeeChanges,
    ) -> Result<EventAttendeeView, MutationError> {
        let Some(existing) = EventAttendee::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.segment_id {
            model.segment_id = Set(v);
        }
        model.updated_at = Set(now());
        let updated = model.update(&self.db).await?;
        Ok(self.hydrate(updated).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = EventAttendee::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }

    async fn hydrate(&self, model: event_attendee::Model) -> Result<EventAttendeeView, DbErr> {
        let user = User::find_by_id(model.user_id).one(&self.db).await?;
        let segment = EventSegment::find_by_id(model.segment_id).one(&self.db).await?;
        let contributions = model
            .find_related(EventAttendeeContribution)
            .all(&self.db)
            .await?;
        Ok(EventAttendeeView {
            attendee: model,
            user,
            segment,
            contributions,
        })
    }

    async fn hydrate_many(
        &self,
        attendees: Vec<event_attendee::Model>,
    ) -> Result<Vec<EventAttendeeView>, DbErr> {
        let user_ids: Vec<Uuid> = attendees.iter().map(|a| a.user_id).collect();
        let users = User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?;

        let segment_ids: Vec<Uuid> = attendees.iter().map(|a| a.segment_id).collect();
        let segments = EventSegment::find()
            .filter(event_segment::Column::Id.is_in(segment_ids))
            .all(&self.db)
            .await?;

        let attendee_ids: Vec<Uuid> = attendees.iter().map(|a| a.id).collect();
        let contributions = EventAttendeeContribution::find()
            .filter(event_attendee_contribution::Column::AttendeeId.is_in(attendee_ids))
            .all(&self.db)
            .await?;

        Ok(attendees
            .into_iter()
            .map(|attendee| {
                let user = users.iter().find(|u| u.id == attendee.user_id).cloned();
                let segment = segments
                    .iter()
                    .find(|s| s.id == attendee.segment_id)
                    .cloned();
                let contributions = contributions
                    .iter()
                    .filter(|c| c.attendee_id == attendee.id)
                    .cloned()
                    .collect();
                EventAttendeeView {
                    attendee,
                    user,
                    segment,
                    contributions,
                }
            })
            .collect())
    }
}
