use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{event_chat_message_reaction, prelude::*};

// Reads return the bare row; nothing is eager-loaded for reactions.
// Duplicates of (message, user, reaction) are allowed.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReaction {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub reaction: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReactionChanges {
    pub reaction: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventChatMessageReactionRepository {
    db: DatabaseConnection,
}

impl EventChatMessageReactionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<event_chat_message_reaction::Model>, DbErr> {
        EventChatMessageReaction::find_by_id(id).one(&self.db).await
    }

    pub async fn get_all(&self) -> Result<Vec<event_chat_message_reaction::Model>, DbErr> {
        EventChatMessageReaction::find().all(&self.db).await
    }

    pub async fn list_for_message(
        &self,
        message_id: Uuid,
    ) -> Result<Vec<event_chat_message_reaction::Model>, DbErr> {
        EventChatMessageReaction::find()
            .filter(event_chat_message_reaction::Column::MessageId.eq(message_id))
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        input: NewReaction,
    ) -> Result<event_chat_message_reaction::Model, MutationError> {
        let model = event_chat_message_reaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            message_id: Set(input.message_id),
            user_id: Set(input.user_id),
            reaction: Set(input.reaction),
            created_at: Set(now()),
            updated_at: Set(now()),
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: ReactionChanges,
    ) -> Result<event_chat_message_reaction::Model, MutationError> {
        let Some(existing) = EventChatMessageReaction::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.reaction {
            model.reaction = Set(v);
        }
        model.updated_at = Set(now());
        Ok(model.update(&self.db).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = EventChatMessageReaction::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }
}
