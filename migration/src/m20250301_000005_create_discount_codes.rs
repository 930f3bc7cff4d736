use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create discount type enum
        manager
            .create_type(
                Type::create()
                    .as_enum(DiscountType::Enum)
                    .values([DiscountType::Fixed, DiscountType::Percentage])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiscountCode::Table)
                    .if_not_exists()
                    .col(uuid(DiscountCode::Id).primary_key())
                    // Stored uppercase, matched case-insensitively
                    .col(string_len(DiscountCode::Code, 50).not_null().unique_key())
                    .col(
                        ColumnDef::new(DiscountCode::DiscountType)
                            .custom(DiscountType::Enum)
                            .not_null(),
                    )
                    .col(big_integer(DiscountCode::Value).not_null())
                    .col(boolean(DiscountCode::IsActive).not_null().default(true))
                    .col(integer_null(DiscountCode::UsageLimit))
                    .col(integer(DiscountCode::UsedCount).not_null().default(0))
                    .col(timestamp_with_time_zone_null(DiscountCode::ExpiresAt))
                    .col(
                        timestamp_with_time_zone(DiscountCode::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiscountCode::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(DiscountType::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DiscountCode {
    Table,
    Id,
    Code,
    DiscountType,
    Value,
    IsActive,
    UsageLimit,
    UsedCount,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum DiscountType {
    #[sea_orm(iden = "discount_type")]
    Enum,
    #[sea_orm(iden = "fixed")]
    Fixed,
    #[sea_orm(iden = "percentage")]
    Percentage,
}
