use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000006_create_trips::{PaymentStatus, Trip};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Participant::Table)
                    .if_not_exists()
                    .col(uuid(Participant::Id).primary_key())
                    .col(uuid(Participant::TripId).not_null())
                    .col(string_len(Participant::Name, 100).not_null())
                    .col(string_len(Participant::Phone, 30).not_null())
                    .col(integer(Participant::NumberOfPeople).not_null())
                    .col(string(Participant::Address).not_null())
                    .col(integer_null(Participant::Age))
                    .col(string_len_null(Participant::Gender, 20))
                    .col(json_binary(Participant::ServiceIds).not_null())
                    .col(string_len_null(Participant::DiscountCode, 50))
                    .col(text(Participant::Notes).not_null())
                    .col(
                        ColumnDef::new(Participant::Status)
                            .custom(PaymentStatus::Enum)
                            .not_null(),
                    )
                    .col(big_integer(Participant::AmountDue).not_null())
                    .col(string_null(Participant::ProofUrl))
                    .col(uuid_null(Participant::ConfirmedBy))
                    .col(timestamp_with_time_zone_null(Participant::ConfirmedAt))
                    .col(
                        timestamp_with_time_zone(Participant::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participant_trip")
                            .from(Participant::Table, Participant::TripId)
                            .to(Trip::Table, Trip::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Participant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Participant {
    Table,
    Id,
    TripId,
    Name,
    Phone,
    NumberOfPeople,
    Address,
    Age,
    Gender,
    ServiceIds,
    DiscountCode,
    Notes,
    Status,
    AmountDue,
    ProofUrl,
    ConfirmedBy,
    ConfirmedAt,
    CreatedAt,
}
