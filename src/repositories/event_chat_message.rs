use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{
    event_chat_message, event_chat_message_reaction, prelude::*, user,
};

/// Chat message plus its declared projection: the author and the reactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChatMessageView {
    #[serde(flatten)]
    pub message: event_chat_message::Model,
    pub user: Option<user::Model>,
    pub reactions: Vec<event_chat_message_reaction::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventChatMessage {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventChatMessageChanges {
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventChatMessageRepository {
    db: DatabaseConnection,
}

impl EventChatMessageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<EventChatMessageView>, DbErr> {
        let Some(model) = EventChatMessage::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn get_all(&self) -> Result<Vec<EventChatMessageView>, DbErr> {
        let messages = EventChatMessage::find().all(&self.db).await?;
        self.hydrate_many(messages).await
    }

    pub async fn list_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<EventChatMessageView>, DbErr> {
        let messages = EventChatMessage::find()
            .filter(event_chat_message::Column::EventId.eq(event_id))
            .all(&self.db)
            .await?;
        self.hydrate_many(messages).await
    }

    pub async fn create(
        &self,
        input: NewEventChatMessage,
    ) -> Result<EventChatMessageView, MutationError> {
        let model = event_chat_message::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            event_id: Set(input.event_id),
            message: Set(input.message),
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
        changes: EventChatMessageChanges,
    ) -> Result<EventChatMessageView, MutationError> {
        let Some(existing) = EventChatMessage::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.message {
            model.message = Set(v);
        }
        model.updated_at = Set(now());
        let updated = model.update(&self.db).await?;
        Ok(self.hydrate(updated).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = EventChatMessage::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }

    async fn hydrate(
        &self,
        model: event_chat_message::Model,
    ) -> Result<EventChatMessageView, DbErr> {
        let user = User::find_by_id(model.user_id).one(&self.db).await?;
        let reactions = model
            .find_related(EventChatMessageReaction)
            .all(&self.db)
            .await?;
        Ok(EventChatMessageView {
            message: model,
            user,
            reactions,
        })
    }

    async fn hydrate_many(
        &self,
        messages: Vec<event_chat_message::Model>,
    ) -> Result<Vec<EventChatMessageView>, DbErr> {
        let user_ids: Vec<Uuid> = messages.iter().map(|m| m.user_id).collect();
        let users = User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?;

        let message_ids: Vec<Uuid> = messages.iter().map(|m| m.id).collect();
        let reactions = EventChatMessageReaction::find()
            .filter(event_chat_message_reaction::Column::MessageId.is_in(message_ids))
            .all(&self.db)
            .await?;

        Ok(messages
            .into_iter()
            .map(|message| {
                let user = users.iter().find(|u| u.id == message.user_id).cloned();
                let reactions = reactions
                    .iter()
                    .filter(|r| r.message_id == message.id)
                    .cloned()
                    .collect();
                EventChatMessageView {
                    message,
                    user,
                    reactions,
                }
            })
            .collect())
    }
}
