use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{event_attendee, event_attendee_contribution, prelude::*};

/// Contribution record plus its declared projection: the owning attendee.
/// The attendee's own relations are not pulled in here; callers go through
/// the attendee repository for those.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionView {
    #[serde(flatten)]
    pub contribution: event_attendee_contribution::Model,
    pub attendee: Option<event_attendee::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub item: String,
    pub description: String,
    pub quantity: i32,
    pub attendee_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContributionChanges {
    pub item: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct EventAttendeeContributionRepository {
    db: DatabaseConnection,
}

impl EventAttendeeContributionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<ContributionView>, DbErr> {
        let Some(model) = EventAttendeeContribution::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn get_all(&self) -> Result<Vec<ContributionView>, DbErr> {
        let contributions = EventAttendeeContribution::find().all(&self.db).await?;
        let attendee_ids: Vec<Uuid> = contributions.iter().map(|c| c.attendee_id).collect();
        let attendees = EventAttendee::find()
            .filter(event_attendee::Column::Id.is_in(attendee_ids))
            .all(&self.db)
            .await?;
        Ok(contributions
            .into_iter()
            .map(|contribution| {
                let attendee = attendees
                    .iter()
                    .find(|a| a.id == contribution.attendee_id)
                    .cloned();
                ContributionView {
                    contribution,
                    attendee,
                }
            })
            .collect())
    }

    pub async fn create(&self, input: NewContribution) -> Result<ContributionView, MutationError> {
        let model = event_attendee_contribution::ActiveModel {
            id: Set(Uuid::new_v4()),
            item: Set(input.item),
            description: Set(input.description),
            quantity: Set(input.quantity),
            attendee_id: Set(input.attendee_id),
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
        changes: ContributionChanges,
    ) -> Result<ContributionView, MutationError> {
        let Some(existing) = EventAttendeeContribution::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.item {
            model.item = Set(v);
        }
        if let Some(v) = changes.description {
            model.description = Set(v);
        }
        if let Some(v) = changes.quantity {
            model.quantity = Set(v);
        }
        model.updated_at = Set(now());
        let updated = model.update(&self.db).await?;
        Ok(self.hydrate(updated).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = EventAttendeeContribution::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }

    async fn hydrate(
        &self,
        model: event_attendee_contribution::Model,
    ) -> Result<ContributionView, DbErr> {
        let attendee = EventAttendee::find_by_id(model.attendee_id).one(&self.db).await?;
        Ok(ContributionView {
            contribution: model,
            attendee,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::*;

    fn stamp() -> chrono::NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn an_attendee() -> event_attendee::Model {
        event_attendee::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            segment_id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    fn a_contribution(attendee_id: Uuid) -> event_attendee_contribution::Model {
        event_attendee_contribution::Model {
            id: Uuid::new_v4(),
            item: "Bread rolls".into(),
            description: "a dozen".into(),
            quantity: 12,
            attendee_id,
            created_at: stamp(),
            updated_at: stamp(),
        }
    }

    #[tokio::test]
    async fn get_by_id_includes_the_owning_attendee() {
        let attendee = an_attendee();
        let contribution = a_contribution(attendee.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![contribution.clone()]])
            .append_query_results([vec![attendee.clone()]])
            .into_connection();

        let view = EventAttendeeContributionRepository::new(db)
            .get_by_id(contribution.id)
            .await
            .unwrap()
            .expect("contribution exists");
        assert_eq!(view.contribution, contribution);
        assert_eq!(view.attendee, Some(attendee));
    }

    #[tokio::test]
    async fn create_writes_scalars_and_rereads_the_projection() {
        let attendee = an_attendee();
        let stored = a_contribution(attendee.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // insert returning, then the projection re-read
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![attendee.clone()]])
            .into_connection();

        let view = EventAttendeeContributionRepository::new(db)
            .create(NewContribution {
                item: "Bread rolls".into(),
                description: "a dozen".into(),
                quantity: 12,
                attendee_id: attendee.id,
            })
            .await
            .unwrap();
        assert_eq!(view.contribution.item, "Bread rolls");
        assert_eq!(view.contribution.quantity, 12);
        assert_eq!(view.attendee.unwrap().id, attendee.id);
    }

    #[tokio::test]
    async fn update_missing_contribution_collapses_to_none_at_the_shim() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<event_attendee_contribution::Model>::new()])
            .into_connection();

        let outcome = EventAttendeeContributionRepository::new(db)
            .update(Uuid::new_v4(), ContributionChanges::default())
            .await;
        assert!(matches!(&outcome, Err(MutationError::NotFound)));
        assert!(outcome.ok().is_none());
    }
}
