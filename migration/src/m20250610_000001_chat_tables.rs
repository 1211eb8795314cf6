use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = table_auto(EventChatMessage::Table)
            .col(pk_uuid(EventChatMessage::Id))
            .col(uuid(EventChatMessage::UserId))
            .col(uuid(EventChatMessage::EventId))
            .col(string(EventChatMessage::Message))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_chat_message_user")
                    .from(EventChatMessage::Table, EventChatMessage::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_chat_message_event")
                    .from(EventChatMessage::Table, EventChatMessage::EventId)
                    .to(Event::Table, Event::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .check(Expr::col(EventChatMessage::Message).ne(""))
            .to_owned();
        manager.create_table(table).await?;

        // No uniqueness across (message, user, reaction); the same user may
        // react with the same emoji more than once.
        let table = table_auto(EventChatMessageReaction::Table)
            .col(pk_uuid(EventChatMessageReaction::Id))
            .col(uuid(EventChatMessageReaction::MessageId))
            .col(uuid(EventChatMessageReaction::UserId))
            .col(string(EventChatMessageReaction::Reaction))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_chat_reaction_message")
                    .from(
                        EventChatMessageReaction::Table,
                        EventChatMessageReaction::MessageId,
                    )
                    .to(EventChatMessage::Table, EventChatMessage::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_chat_reaction_user")
                    .from(
                        EventChatMessageReaction::Table,
                        EventChatMessageReaction::UserId,
                    )
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chat_message_event")
                    .table(EventChatMessage::Table)
                    .col(EventChatMessage::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chat_reaction_message")
                    .table(EventChatMessageReaction::Table)
                    .col(EventChatMessageReaction::MessageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(EventChatMessageReaction::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EventChatMessage::Table).to_owned())
            .await?;

        Ok(())
    }
}
