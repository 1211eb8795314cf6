use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{
    event, event_invitation, event_invitation::RsvpStatus, prelude::*, user,
};

/// Invitation record plus its declared projection: both users and the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInvitationView {
    #[serde(flatten)]
    pub invitation: event_invitation::Model,
    pub sender: Option<user::Model>,
    pub recipient: Option<user::Model>,
    pub event: Option<event::Model>,
}

/// New invitations always start out pending and unviewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventInvitation {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub event_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventInvitationChanges {
    pub message: Option<String>,
    pub viewed: Option<bool>,
    pub rsvp_status: Option<RsvpStatus>,
}

/// List-query filters matching the REST surface (`type=sent|received`,
/// `eventId=`). Unset fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct InvitationFilter {
    pub sender_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct EventInvitationRepository {
    db: DatabaseConnection,
}

impl EventInvitationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<EventInvitationView>, DbErr> {
        let Some(model) = EventInvitation::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn get_all(&self) -> Result<Vec<EventInvitationView>, DbErr> {
        self.list_filtered(InvitationFilter::default()).await
    }

    pub async fn list_filtered(
        &self,
        filter: InvitationFilter,
    ) -> Result<Vec<EventInvitationView>, DbErr> {
        let mut query = EventInvitation::find();
        if let Some(sender_id) = filter.sender_id {
            query = query.filter(event_invitation::Column::SenderId.eq(sender_id));
        }
        if let Some(recipient_id) = filter.recipient_id {
            query = query.filter(event_invitation::Column::RecipientId.eq(recipient_id));
        }
        if let Some(event_id) = filter.event_id {
            query = query.filter(event_invitation::Column::EventId.eq(event_id));
        }
        let invitations = query.all(&self.db).await?;
        self.hydrate_many(invitations).await
    }

    pub async fn create(
        &self,
        input: NewEventInvitation,
    ) -> Result<EventInvitationView, MutationError> {
        let model = event_invitation::ActiveModel {
            id: Set(Uuid::new_v4()),
            sender_id: Set(input.sender_id),
            recipient_id: Set(input.recipient_id),
            event_id: Set(input.event_id),
            message: Set(input.message),
            viewed: Set(false),
            rsvp_status: Set(RsvpStatus::Pending),
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
        changes: EventInvitationChanges,
    ) -> Result<EventInvitationView, MutationError> {
        let Some(existing) = EventInvitation::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.message {
            model.message = Set(v);
        }
        if let Some(v) = changes.viewed {
            model.viewed = Set(v);
        }
        if let Some(v) = changes.rsvp_status {
            model.rsvp_status = Set(v);
        }
        model.updated_at = Set(now());
        let updated = model.update(&self.db).await?;
        Ok(self.hydrate(updated).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = EventInvitation::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }

    async fn hydrate(
        &self,
        model: event_invitation::Model,
    ) -> Result<EventInvitationView, DbErr> {
        let sender = User::find_by_id(model.sender_id).one(&self.db).await?;
        let recipient = User::find_by_id(model.recipient_id).one(&self.db).await?;
        let event = Event::find_by_id(model.event_id).one(&self.db).await?;
        Ok(EventInvitationView {
            invitation: model,
            sender,
            recipient,
            event,
        })
    }

    async fn hydrate_many(
        &self,
        invitations: Vec<event_invitation::Model>,
    ) -> Result<Vec<EventInvitationView>, DbErr> {
        let mut user_ids: Vec<Uuid> = Vec::new();
        for inv in &invitations {
            user_ids.push(inv.sender_id);
            user_ids.push(inv.recipient_id);
        }
        let users = User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?;

        let event_ids: Vec<Uuid> = invitations.iter().map(|i| i.event_id).collect();
        let events = Event::find()
            .filter(event::Column::Id.is_in(event_ids))
            .all(&self.db)
            .await?;

        Ok(invitations
            .into_iter()
            .map(|invitation| {
                let sender = users.iter().find(|u| u.id == invitation.sender_id).cloned();
                let recipient = users
                    .iter()
                    .find(|u| u.id == invitation.recipient_id)
                    .cloned();
                let event = events.iter().find(|e| e.id == invitation.event_id).cloned();
                EventInvitationView {
                    invitation,
                    sender,
                    recipient,
                    event,
                }
            })
            .collect())
    }
}
