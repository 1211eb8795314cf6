use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{event_attendee, event_segment, prelude::*};

/// Segment record plus its declared projection: the attendee rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSegmentView {
    #[serde(flatten)]
    pub segment: event_segment::Model,
    pub attendees: Vec<event_attendee::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventSegment {
    pub name: String,
    pub event_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSegmentChanges {
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventSegmentRepository {
    db: DatabaseConnection,
}

impl EventSegmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<EventSegmentView>, DbErr> {
        let Some(model) = EventSegment::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn get_all(&self) -> Result<Vec<EventSegmentView>, DbErr> {
        let rows = EventSegment::find()
            .find_with_related(EventAttendee)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(segment, attendees)| EventSegmentView { segment, attendees })
            .collect())
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<EventSegmentView>, DbErr> {
        let rows = EventSegment::find()
            .filter(event_segment::Column::EventId.eq(event_id))
            .find_with_related(EventAttendee)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(segment, attendees)| EventSegmentView { segment, attendees })
            .collect())
    }

    pub async fn create(&self, input: NewEventSegment) -> Result<EventSegmentView, MutationError> {
        let model = event_segment::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            event_id: Set(input.event_id),
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
        changes: EventSegmentChanges,
    ) -> Result<EventSegmentView, MutationError> {
        let Some(existing) = EventSegment::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.name {
            model.name = Set(v);
        }
        model.updated_at = Set(now());
        let updated = model.update(&self.db).await?;
        Ok(self.hydrate(updated).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = EventSegment::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }

    async fn hydrate(&self, model: event_segment::Model) -> Result<EventSegmentView, DbErr> {
        let attendees = model.find_related(EventAttendee).all(&self.db).await?;
        Ok(EventSegmentView {
            segment: model,
            attendees,
        })
    }
}
