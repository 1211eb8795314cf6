use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub date_of_birth: Date,
    #[sea_orm(unique)]
    pub phone_number: String,
    pub verified: bool,
    pub locked: bool,
    pub last_login: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_allergy::Entity")]
    Allergies,
    #[sea_orm(has_many = "super::user_otp::Entity")]
    Otps,
    #[sea_orm(has_many = "super::event_attendee::Entity")]
    Attendances,
    #[sea_orm(has_many = "super::event::Entity")]
    HostedEvents,
}

impl Related<super::user_allergy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allergies.def()
    }
}

impl Related<super::user_otp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Otps.def()
    }
}

impl Related<super::event_attendee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HostedEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
