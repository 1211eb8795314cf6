use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{prelude::*, user_otp};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserOtp {
    pub user_id: Uuid,
    pub otp: String,
    pub expiry: NaiveDateTime,
}

/// `consumed` only ever moves false -> true; there is no way back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserOtpChanges {
    pub consumed: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct UserOtpRepository {
    db: DatabaseConnection,
}

impl UserOtpRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<user_otp::Model>, DbErr> {
        UserOtp::find_by_id(id).one(&self.db).await
    }

    pub async fn get_all(&self) -> Result<Vec<user_otp::Model>, DbErr> {
        UserOtp::find().all(&self.db).await
    }

    /// The newest unconsumed code for a user, whether or not it has expired;
    /// expiry is the caller's check.
    pub async fn latest_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<user_otp::Model>, DbErr> {
        UserOtp::find()
            .filter(user_otp::Column::UserId.eq(user_id))
            .filter(user_otp::Column::Consumed.eq(false))
            .order_by_desc(user_otp::Column::CreatedAt)
            .one(&self.db)
            .await
    }

    pub async fn create(&self, input: NewUserOtp) -> Result<user_otp::Model, MutationError> {
        let model = user_otp::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            otp: Set(input.otp),
            expiry: Set(input.expiry),
            consumed: Set(false),
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
        changes: UserOtpChanges,
    ) -> Result<user_otp::Model, MutationError> {
        let Some(existing) = UserOtp::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(true) = changes.consumed {
            model.consumed = Set(true);
        }
        model.updated_at = Set(now());
        Ok(model.update(&self.db).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = UserOtp::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }
}
