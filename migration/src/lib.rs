pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_itineraries;
mod m20250301_000003_create_district_surcharges;
mod m20250301_000004_create_additional_services;
mod m20250301_000005_create_discount_codes;
mod m20250301_000006_create_trips;
mod m20250301_000007_create_participants;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_itineraries::Migration),
            Box::new(m20250301_000003_create_district_surcharges::Migration),
            Box::new(m20250301_000004_create_additional_services::Migration),
            Box::new(m20250301_000005_create_discount_codes::Migration),
            Box::new(m20250301_000006_create_trips::Migration),
            Box::new(m20250301_000007_create_participants::Migration),
        ]
    }
}
