use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create itinerary type enum
        manager
            .create_type(
                Type::create()
                    .as_enum(ItineraryType::Enum)
                    .values([
                        ItineraryType::AirportPickup,
                        ItineraryType::AirportDropoff,
                        ItineraryType::Tourism,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Itinerary::Table)
                    .if_not_exists()
                    .col(uuid(Itinerary::Id).primary_key())
                    .col(string_len(Itinerary::Name, 200).not_null())
                    .col(
                        ColumnDef::new(Itinerary::ItineraryType)
                            .custom(ItineraryType::Enum)
                            .not_null(),
                    )
                    .col(big_integer(Itinerary::PricePerPerson).not_null())
                    .col(text(Itinerary::Description).not_null())
                    // JSON array of "HH:MM" strings
                    .col(json_binary(Itinerary::TimeSlots).not_null())
                    .col(
                        timestamp_with_time_zone(Itinerary::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Itinerary::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ItineraryType::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Itinerary {
    Table,
    Id,
    Name,
    ItineraryType,
    PricePerPerson,
    Description,
    TimeSlots,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ItineraryType {
    #[sea_orm(iden = "itinerary_type")]
    Enum,
    #[sea_orm(iden = "airport_pickup")]
    AirportPickup,
    #[sea_orm(iden = "airport_dropoff")]
    AirportDropoff,
    #[sea_orm(iden = "tourism")]
    Tourism,
}
