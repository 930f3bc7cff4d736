use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::itinerary::ItineraryType;

/// Per-participant payment state. The trip-level `status` column tracks the
/// creator, who is treated as an implicit participant; the aggregate
/// ("overall") status is derived at read time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending_payment")]
    PendingPayment,
    #[sea_orm(string_value = "payment_confirmed")]
    PaymentConfirmed,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl PaymentStatus {
    /// Whether this participant's money is in hand (confirmed now or on a
    /// trip that already ran).
    pub fn is_paid(self) -> bool {
        matches!(self, PaymentStatus::PaymentConfirmed | PaymentStatus::Completed)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub itinerary_id: Uuid,
    // Itinerary snapshot taken at creation time; never re-derived from the
    // live catalog even if the itinerary is later edited.
    pub itinerary_name: String,
    pub itinerary_type: ItineraryType,
    pub creator_id: Uuid,
    pub date: Date,
    pub departure_time: String,
    pub number_of_people: i32,
    pub pickup_address: Option<String>,
    pub dropoff_address: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub notes: String,
    pub district: Option<String>,
    /// JSON array of additional-service ids selected by the creator
    pub service_ids: Json,
    pub discount_code: Option<String>,
    pub status: PaymentStatus,
    pub total_price: i64,
    pub proof_url: Option<String>,
    pub confirmed_by: Option<Uuid>,
    pub confirmed_at: Option<DateTimeWithTimeZone>,
    pub handover_note: String,
    pub is_deleted: bool,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::itinerary::Entity",
        from = "Column::ItineraryId",
        to = "super::itinerary::Column::Id"
    )]
    Itinerary,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorId",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::participant::Entity")]
    Participants,
}

impl Related<super::itinerary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Itinerary.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
