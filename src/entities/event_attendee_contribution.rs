use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An item an attendee commits to bringing, with a quantity (always >= 1,
/// enforced by a table check).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_attendee_contribution")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item: String,
    pub description: String,
    pub quantity: i32,
    pub attendee_id: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event_attendee::Entity",
        from = "Column::AttendeeId",
        to = "super::event_attendee::Column::Id"
    )]
    Attendee,
}

impl Related<super::event_attendee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
