pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_venues;
mod m20240101_000002_create_artists;
mod m20240101_000003_create_venue_genres;
mod m20240101_000004_create_artist_genres;
mod m20240101_000005_create_shows;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_venues::Migration),
            Box::new(m20240101_000002_create_artists::Migration),
            Box::new(m20240101_000003_create_venue_genres::Migration),
            Box::new(m20240101_000004_create_artist_genres::Migration),
            Box::new(m20240101_000005_create_shows::Migration),
        ]
    }
}
