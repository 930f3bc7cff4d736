use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250301_000001_create_users::User;
use super::m20250301_000002_create_itineraries::{Itinerary, ItineraryType};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create payment status enum (shared by trips and participants)
        manager
            .create_type(
                Type::create()
                    .as_enum(PaymentStatus::Enum)
                    .values([
                        PaymentStatus::PendingPayment,
                        PaymentStatus::PaymentConfirmed,
                        PaymentStatus::Completed,
                        PaymentStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trip::Table)
                    .if_not_exists()
                    .col(uuid(Trip::Id).primary_key())
                    .col(uuid(Trip::ItineraryId).not_null())
                    // Snapshot of the itinerary at creation time
                    .col(string_len(Trip::ItineraryName, 200).not_null())
                    .col(
                        ColumnDef::new(Trip::ItineraryType)
                            .custom(ItineraryType::Enum)
                            .not_null(),
                    )
                    .col(uuid(Trip::CreatorId).not_null())
                    .col(date(Trip::Date).not_null())
                    .col(string_len(Trip::DepartureTime, 10).not_null())
                    .col(integer(Trip::NumberOfPeople).not_null())
                    .col(string_null(Trip::PickupAddress))
                    .col(string_null(Trip::DropoffAddress))
                    .col(string_len(Trip::ContactName, 100).not_null())
                    .col(string_len(Trip::ContactPhone, 30).not_null())
                    .col(text(Trip::Notes).not_null())
                    .col(string_len_null(Trip::District, 100))
                    .col(json_binary(Trip::ServiceIds).not_null())
                    .col(string_len_null(Trip::DiscountCode, 50))
                    .col(
                        ColumnDef::new(Trip::Status)
                            .custom(PaymentStatus::Enum)
                            .not_null(),
                    )
                    .col(big_integer(Trip::TotalPrice).not_null())
                    .col(string_null(Trip::ProofUrl))
                    .col(uuid_null(Trip::ConfirmedBy))
                    .col(timestamp_with_time_zone_null(Trip::ConfirmedAt))
                    .col(text(Trip::HandoverNote).not_null())
                    .col(boolean(Trip::IsDeleted).not_null().default(false))
                    .col(uuid_null(Trip::DeletedBy))
                    .col(timestamp_with_time_zone_null(Trip::DeletedAt))
                    .col(
                        timestamp_with_time_zone(Trip::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_itinerary")
                            .from(Trip::Table, Trip::ItineraryId)
                            .to(Itinerary::Table, Itinerary::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_creator")
                            .from(Trip::Table, Trip::CreatorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trip::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(PaymentStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Trip {
    Table,
    Id,
    ItineraryId,
    ItineraryName,
    ItineraryType,
    CreatorId,
    Date,
    DepartureTime,
    NumberOfPeople,
    PickupAddress,
    DropoffAddress,
    ContactName,
    ContactPhone,
    Notes,
    District,
    ServiceIds,
    DiscountCode,
    Status,
    TotalPrice,
    ProofUrl,
    ConfirmedBy,
    ConfirmedAt,
    HandoverNote,
    IsDeleted,
    DeletedBy,
    DeletedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum PaymentStatus {
    #[sea_orm(iden = "payment_status")]
    Enum,
    #[sea_orm(iden = "pending_payment")]
    PendingPayment,
    #[sea_orm(iden = "payment_confirmed")]
    PaymentConfirmed,
    #[sea_orm(iden = "completed")]
    Completed,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}
