use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Event Table
        //
        // Host deletion is restricted on purpose: an event must not lose its
        // host silently, so deleting a hosting user fails at the store.
        let table = table_auto(Event::Table)
            .col(pk_uuid(Event::Id))
            .col(string(Event::Name))
            .col(timestamp(Event::Date))
            .col(string(Event::Location))
            .col(string(Event::Description))
            .col(string(Event::Icon))
            .col(uuid(Event::HostId))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_host")
                    .from(Event::Table, Event::HostId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            )
            .to_owned();
        manager.create_table(table).await?;

        // Create EventSegment Table
        let table = table_auto(EventSegment::Table)
            .col(pk_uuid(EventSegment::Id))
            .col(string(EventSegment::Name))
            .col(uuid(EventSegment::EventId))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_segment_event")
                    .from(EventSegment::Table, EventSegment::EventId)
                    .to(Event::Table, Event::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .check(Expr::col(EventSegment::Name).ne(""))
            .to_owned();
        manager.create_table(table).await?;

        // Create EventAttendee Table
        let table = table_auto(EventAttendee::Table)
            .col(pk_uuid(EventAttendee::Id))
            .col(uuid(EventAttendee::UserId))
            .col(uuid(EventAttendee::SegmentId))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_attendee_user")
                    .from(EventAttendee::Table, EventAttendee::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_attendee_segment")
                    .from(EventAttendee::Table, EventAttendee::SegmentId)
                    .to(EventSegment::Table, EventSegment::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        // A user attends a segment at most once.
        manager
            .create_index(
                Index::create()
                    .name("idx_event_attendee_user_segment")
                    .table(EventAttendee::Table)
                    .col(EventAttendee::UserId)
                    .col(EventAttendee::SegmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create EventAttendeeContribution Table
        let table = table_auto(EventAttendeeContribution::Table)
            .col(pk_uuid(EventAttendeeContribution::Id))
            .col(string(EventAttendeeContribution::Item))
            .col(string(EventAttendeeContribution::Description))
            .col(integer(EventAttendeeContribution::Quantity))
            .col(uuid(EventAttendeeContribution::AttendeeId))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_contribution_attendee")
                    .from(
                        EventAttendeeContribution::Table,
                        EventAttendeeContribution::AttendeeId,
                    )
                    .to(EventAttendee::Table, EventAttendee::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .check(Expr::col(EventAttendeeContribution::Quantity).gte(1))
            .to_owned();
        manager.create_table(table).await?;

        // Create EventInvitation Table
        let table = table_auto(EventInvitation::Table)
            .col(pk_uuid(EventInvitation::Id))
            .col(uuid(EventInvitation::SenderId))
            .col(uuid(EventInvitation::RecipientId))
            .col(uuid(EventInvitation::EventId))
            .col(string(EventInvitation::Message))
            .col(boolean(EventInvitation::Viewed).default(false))
            .col(string_len(EventInvitation::RsvpStatus, 16).default("pending"))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_invitation_sender")
                    .from(EventInvitation::Table, EventInvitation::SenderId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_invitation_recipient")
                    .from(EventInvitation::Table, EventInvitation::RecipientId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_invitation_event")
                    .from(EventInvitation::Table, EventInvitation::EventId)
                    .to(Event::Table, Event::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        // Create indices for common lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_event_segment_event")
                    .table(EventSegment::Table)
                    .col(EventSegment::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_attendee_segment")
                    .table(EventAttendee::Table)
                    .col(EventAttendee::SegmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contribution_attendee")
                    .table(EventAttendeeContribution::Table)
                    .col(EventAttendeeContribution::AttendeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_invitation_recipient")
                    .table(EventInvitation::Table)
                    .col(EventInvitation::RecipientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_invitation_event")
                    .table(EventInvitation::Table)
                    .col(EventInvitation::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop all tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(EventInvitation::Table).to_owned())
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .table(EventAttendeeContribution::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EventAttendee::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EventSegment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;

        Ok(())
    }
}
