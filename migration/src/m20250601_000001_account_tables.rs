use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create User Table
        let table = table_auto(User::Table)
            .col(pk_uuid(User::Id))
            .col(string(User::FirstName))
            .col(string(User::LastName))
            .col(string_uniq(User::Email))
            .col(date(User::DateOfBirth))
            .col(string_uniq(User::PhoneNumber))
            .col(boolean(User::Verified).default(false))
            .col(boolean(User::Locked).default(false))
            .col(timestamp_null(User::LastLogin))
            .to_owned();
        manager.create_table(table).await?;

        // Create UserAllergy Table
        let table = table_auto(UserAllergy::Table)
            .col(pk_uuid(UserAllergy::Id))
            .col(uuid(UserAllergy::UserId))
            .col(string(UserAllergy::Allergy))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_user_allergy_user")
                    .from(UserAllergy::Table, UserAllergy::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .check(Expr::col(UserAllergy::Allergy).ne(""))
            .to_owned();
        manager.create_table(table).await?;

        // Create UserOtp Table
        let table = table_auto(UserOtp::Table)
            .col(pk_uuid(UserOtp::Id))
            .col(uuid(UserOtp::UserId))
            .col(string_len(UserOtp::Otp, 6))
            .col(timestamp(UserOtp::Expiry))
            .col(boolean(UserOtp::Consumed).default(false))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_user_otp_user")
                    .from(UserOtp::Table, UserOtp::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_allergy_user")
                    .table(UserAllergy::Table)
                    .col(UserAllergy::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_otp_user")
                    .table(UserOtp::Table)
                    .col(UserOtp::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserOtp::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserAllergy::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}
