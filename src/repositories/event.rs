use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{event, event_segment, prelude::*, user};

/// Event record plus its declared projection: the hosting user and the
/// event's segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: event::Model,
    pub host: Option<user::Model>,
    pub segments: Vec<event_segment::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub description: String,
    pub icon: String,
    pub host_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventChanges {
    pub name: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub host_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct EventRepository {
    db: DatabaseConnection,
}

impl EventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<EventView>, DbErr> {
        let Some(model) = Event::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn get_all(&self) -> Result<Vec<EventView>, DbErr> {
        self.list(true).await
    }

    /// Upcoming events by default; `include_past` returns everything.
    pub async fn list(&self, include_past: bool) -> Result<Vec<EventView>, DbErr> {
        let mut query = Event::find();
        if !include_past {
            query = query.filter(event::Column::Date.gte(now()));
        }
        let events = query.all(&self.db).await?;
        self.hydrate_many(events).await
    }

    pub async fn create(&self, input: NewEvent) -> Result<EventView, MutationError> {
        let model = event::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            date: Set(input.date),
            location: Set(input.location),
            description: Set(input.description),
            icon: Set(input.icon),
            host_id: Set(input.host_id),
            created_at: Set(now()),
            updated_at: Set(now()),
        }
        .insert(&self.db)
        .await?;
        Ok(self.hydrate(model).await?)
    }

    pub async fn update(&self, id: Uuid, changes: EventChanges) -> Result<EventView, MutationError> {
        let Some(existing) = Event::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.name {
            model.name = Set(v);
        }
        if let Some(v) = changes.date {
            model.date = Set(v);
        }
        if let Some(v) = changes.location {
            model.location = Set(v);
        }
        if let Some(v) = changes.description {
            model.description = Set(v);
        }
        if let Some(v) = changes.icon {
            model.icon = Set(v);
        }
        if let Some(v) = changes.host_id {
            model.host_id = Set(v);
        }
        model.updated_at = Set(now());
        let updated = model.update(&self.db).await?;
        Ok(self.hydrate(updated).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = Event::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }

    async fn hydrate(&self, model: event::Model) -> Result<EventView, DbErr> {
        let host = User::find_by_id(model.host_id).one(&self.db).await?;
        let segments = model.find_related(EventSegment).all(&self.db).await?;
        Ok(EventView {
            event: model,
            host,
            segments,
        })
    }

    async fn hydrate_many(&self, events: Vec<event::Model>) -> Result<Vec<EventView>, DbErr> {
        let host_ids: Vec<Uuid> = events.iter().map(|e| e.host_id).collect();
        let hosts = User::find()
            .filter(user::Column::Id.is_in(host_ids))
            .all(&self.db)
            .await?;

        let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let segments = EventSegment::find()
            .filter(event_segment::Column::EventId.is_in(event_ids))
            .all(&self.db)
            .await?;

        Ok(events
            .into_iter()
            .map(|event| {
                let host = hosts.iter().find(|u| u.id == event.host_id).cloned();
                let segments = segments
                    .iter()
                    .filter(|s| s.event_id == event.id)
                    .cloned()
                    .collect();
                EventView {
                    event,
                    host,
                    segments,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::*;

    fn stamp() -> chrono::NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn a_host(id: Uuid) -> user::Model {
        user::Model {
            id,
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1985, 12, 9).unwrap(),
            phone_number: "+15555550000".into(),
            verified: true,
            locked: false,
            last_login: None,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    fn an_event(host_id: Uuid) -> event::Model {
        event::Model {
            id: Uuid::new_v4(),
            name: "Harvest dinner".into(),
            date: stamp(),
            location: "Community hall".into(),
            description: "Bring a dish".into(),
            icon: "pumpkin".into(),
            host_id,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    #[tokio::test]
    async fn get_by_id_includes_host_and_segments() {
        let host = a_host(Uuid::new_v4());
        let event = an_event(host.id);
        let segment = event_segment::Model {
            id: Uuid::new_v4(),
            name: "Dessert".into(),
            event_id: event.id,
            created_at: stamp(),
            updated_at: stamp(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![event.clone()]])
            .append_query_results([vec![host.clone()]])
            .append_query_results([vec![segment.clone()]])
            .into_connection();

        let view = EventRepository::new(db)
            .get_by_id(event.id)
            .await
            .unwrap()
            .expect("event exists");
        assert_eq!(view.event.name, "Harvest dinner");
        assert_eq!(view.host.unwrap().id, host.id);
        assert_eq!(view.segments, vec![segment]);
    }

    #[tokio::test]
    async fn get_by_id_miss_is_none_not_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<event::Model>::new()])
            .into_connection();

        let found = EventRepository::new(db).get_by_id(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn update_missing_event_reports_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<event::Model>::new()])
            .into_connection();

        let err = EventRepository::new(db)
            .update(Uuid::new_v4(), EventChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::NotFound));
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = EventRepository::new(db);
        let id = Uuid::new_v4();
        assert!(repo.delete(id).await.is_ok());
        // Collapsed through the boolean shim, the repeat delete is `false`.
        assert!(repo.delete(id).await.is_err());
    }
}
