use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::trip::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trip_id: Uuid,
    pub name: String,
    pub phone: String,
    pub number_of_people: i32,
    pub address: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    /// JSON array of additional-service ids selected by the joiner
    pub service_ids: Json,
    pub discount_code: Option<String>,
    pub notes: String,
    pub status: PaymentStatus,
    /// Computed once at join time; catalog price changes do not reprice it.
    pub amount_due: i64,
    pub proof_url: Option<String>,
    pub confirmed_by: Option<Uuid>,
    pub confirmed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
