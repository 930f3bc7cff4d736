use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdditionalService::Table)
                    .if_not_exists()
                    .col(uuid(AdditionalService::Id).primary_key())
                    .col(string_len(AdditionalService::Name, 200).not_null())
                    .col(big_integer(AdditionalService::Price).not_null())
                    // JSON array of itinerary type strings this service applies to
                    .col(json_binary(AdditionalService::AppliesTo).not_null())
                    .col(
                        timestamp_with_time_zone(AdditionalService::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdditionalService::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AdditionalService {
    Table,
    Id,
    Name,
    Price,
    AppliesTo,
    CreatedAt,
}
