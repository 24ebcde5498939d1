// Shared test utilities for integration tests
#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{Duration, Utc};
use fyyur_db::sea_orm::{ConnectOptions, Database, DatabaseConnection};
use fyyur_db::AppState;
use fyyur_migration::{Migrator, MigratorTrait};
use fyyur_server::config::ServerConfig;
use serde_json::Value;
use std::sync::Arc;

pub async fn test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

pub fn test_app_state(db: DatabaseConnection) -> Arc<AppState> {
    Arc::new(AppState { db })
}

pub fn test_router(db: DatabaseConnection) -> axum::Router {
    fyyur_server::build_router(test_app_state(db), &ServerConfig::default())
}

pub async fn test_server() -> TestServer {
    TestServer::new(test_router(test_db().await)).expect("test server")
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, `days` from now.
pub fn start_in_days(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub async fn create_venue(server: &TestServer, name: &str, city: &str, state: &str) -> i32 {
    let body: Value = server
        .post("/venues/create")
        .form(&[
            ("name", name),
            ("city", city),
            ("state", state),
            ("address", "123 Main St"),
            ("genres", "Jazz"),
            ("genres", "Rock"),
        ])
        .await
        .json();
    body["id"].as_i64().expect("venue id") as i32
}

pub async fn create_artist(server: &TestServer, name: &str) -> i32 {
    let body: Value = server
        .post("/artists/create")
        .form(&[
            ("name", name),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("genres", "Rock n Roll"),
            ("image_link", "https://img.example.com/artist.jpg"),
        ])
        .await
        .json();
    body["id"].as_i64().expect("artist id") as i32
}

pub async fn create_show(server: &TestServer, artist_id: i32, venue_id: i32, start_time: &str) {
    server
        .post("/shows/create")
        .form(&[
            ("artist_id", artist_id.to_string()),
            ("venue_id", venue_id.to_string()),
            ("start_time", start_time.to_string()),
        ])
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}
