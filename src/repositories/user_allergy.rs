use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MutationError, now};
use crate::entities::{prelude::*, user_allergy};

// No relations in the projection; reads return the bare row.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserAllergy {
    pub user_id: Uuid,
    pub allergy: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserAllergyChanges {
    pub allergy: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserAllergyRepository {
    db: DatabaseConnection,
}

impl UserAllergyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<user_allergy::Model>, DbErr> {
        UserAllergy::find_by_id(id).one(&self.db).await
    }

    pub async fn get_all(&self) -> Result<Vec<user_allergy::Model>, DbErr> {
        UserAllergy::find().all(&self.db).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<user_allergy::Model>, DbErr> {
        UserAllergy::find()
            .filter(user_allergy::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
    }

    pub async fn create(&self, input: NewUserAllergy) -> Result<user_allergy::Model, MutationError> {
        let model = user_allergy::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            allergy: Set(input.allergy),
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
        changes: UserAllergyChanges,
    ) -> Result<user_allergy::Model, MutationError> {
        let Some(existing) = UserAllergy::find_by_id(id).one(&self.db).await? else {
            return Err(MutationError::NotFound);
        };
        let mut model = existing.into_active_model();
        if let Some(v) = changes.allergy {
            model.allergy = Set(v);
        }
        model.updated_at = Set(now());
        Ok(model.update(&self.db).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), MutationError> {
        let res = UserAllergy::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(MutationError::NotFound);
        }
        Ok(())
    }
}
