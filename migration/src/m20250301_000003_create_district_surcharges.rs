use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DistrictSurcharge::Table)
                    .if_not_exists()
                    .col(uuid(DistrictSurcharge::Id).primary_key())
                    .col(
                        string_len(DistrictSurcharge::District, 100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(big_integer(DistrictSurcharge::Amount).not_null())
                    .col(
                        timestamp_with_time_zone(DistrictSurcharge::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DistrictSurcharge::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DistrictSurcharge {
    Table,
    Id,
    District,
    Amount,
    CreatedAt,
}
