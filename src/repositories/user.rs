use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{prelude::*, user, user_allergy};

/// User record plus its declared projection: the allergy rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    pub user: user::Model,
    pub allergies: Vec<user_allergy::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub verified: Option<bool>,
    pub locked: Option<bool>,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<UserView>, DbErr> {
        let Some(model) = User::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(self.hydrate(model).await?))
    }

    pub async fn get_all(&self) -> Result<Vec<UserView>, DbErr> {
        let rows = User::find()
            .find_with_related(UserAllergy)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(user, allergies)| UserView { user, allergies })
            .collect())
    }

    pub async fn find_by_phone(&self, phone_number: &str) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::PhoneNumber.eq(phone_number))
            .one(&self.db)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    pub async fn create(&self, input: NewUser) -> Result<UserView, MutationError> {
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            date_of_birth: Set(input.date_of_birth),
            phone_number: Set(input.phone_number),
            verified: Set(false),
            locked: Set(false),
            last_login: Set(None),
            created_at: Set(now()),
            updated_at: Set(now()),
        }
        .insert(&self.db)
        .await?;
        Ok(self.hydrate(model).await?)
    }

    pub async fn update(&self, id: Uuid, changes: UserChanges) -> Result<UserView, MutationError> {
        let Some(existing) = User::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.first_name {
            model.first_name = Set(v);
        }
        if let Some(v) = changes.last_name {
            model.last_name = Set(v);
        }
        if let Some(v) = changes.email {
            model.email = Set(v);
        }
        if let Some(v) = changes.date_of_birth {
            model.date_of_birth = Set(v);
        }
        if let Some(v) = changes.phone_number {
            model.phone_number = Set(v);
        }
        if let Some(v) = changes.verified {
            model.verified = Set(v);
        }
        if let Some(v) = changes.locked {
            model.locked = Set(v);
        }
        if let Some(v) = changes.last_login {
            model.last_login = Set(Some(v));
        }
        model.updated_at = Set(now());
        let updated = model.update(&self.db).await?;
        Ok(self.hydrate(updated).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = User::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }

    async fn hydrate(&self, model: user::Model) -> Result<UserView, DbErr> {
        let allergies = model.find_related(UserAllergy).all(&self.db).await?;
        Ok(UserView {
            user: model,
            allergies,
        })
    }
}
