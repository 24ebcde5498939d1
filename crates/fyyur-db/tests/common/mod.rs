// Shared test utilities for integration tests
#![allow(dead_code)]

use chrono::{Duration, Utc};
use fyyur_db::input::{ArtistInput, ShowInput, VenueInput};
use fyyur_db::queries::Timestamp;
use fyyur_db::repository::{ArtistRepository, ShowRepository, VenueRepository};
use fyyur_db::sea_orm::{ConnectOptions, Database, DatabaseConnection};
use fyyur_migration::{Migrator, MigratorTrait};

/// A migrated in-memory SQLite database. A single pooled connection keeps
/// the in-memory schema alive for the whole test.
pub async fn test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

pub fn venue_input(name: &str, city: &str, state: &str, genres: &[&str]) -> VenueInput {
    VenueInput {
        name: name.into(),
        city: city.into(),
        state: state.into(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        ..Default::default()
    }
}

pub fn artist_input(name: &str, genres: &[&str]) -> ArtistInput {
    ArtistInput {
        name: name.into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        image_link: Some(format!("https://img.example.com/{}.jpg", name.len())),
        ..Default::default()
    }
}

pub fn now() -> Timestamp {
    Utc::now().fixed_offset()
}

pub fn days_from(now: Timestamp, days: i64) -> Timestamp {
    now + Duration::days(days)
}

pub async fn book(
    db: &DatabaseConnection,
    artist_id: i32,
    venue_id: i32,
    start_time: Timestamp,
) -> fyyur_db::entities::show::Model {
    ShowRepository::new(db)
        .create(ShowInput {
            artist_id,
            venue_id,
            start_time,
        })
        .await
        .expect("book show")
}

pub async fn seed_pair(db: &DatabaseConnection) -> (i32, i32) {
    let venue = VenueRepository::new(db)
        .create(venue_input("The Hall", "Austin", "TX", &["Jazz"]))
        .await
        .expect("create venue");
    let artist = ArtistRepository::new(db)
        .create(artist_input("Guns N Petals", &["Rock n Roll"]))
        .await
        .expect("create artist");
    (artist.id, venue.id)
}
