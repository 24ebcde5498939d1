mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{create_artist, create_show, create_venue, start_in_days, test_server};

#[tokio::test]
async fn test_create_venue_then_list_and_detail() {
    let server = test_server().await;

    let response = server
        .post("/venues/create")
        .form(&[
            ("name", "The Hall"),
            ("city", "Austin"),
            ("state", "TX"),
            ("genres", "Jazz"),
            ("genres", "Rock"),
        ])
        .await;
    response.assert_status(StatusCode::CREATED);
    let flash: Value = response.json();
    assert_eq!(flash["category"], "success");
    assert_eq!(flash["message"], "Venue The Hall was successfully listed!");
    assert_eq!(flash["redirect"], "/");
    let id = flash["id"].as_i64().unwrap();

    let listing: Value = server.get("/venues").await.json();
    assert_eq!(
        listing["areas"],
        json!([{
            "city": "Austin",
            "state": "TX",
            "venues": [{"id": id, "name": "The Hall", "num_upcoming_shows": 0}]
        }])
    );

    let detail: Value = server.get(&format!("/venues/{id}")).await.json();
    assert_eq!(detail["name"], "The Hall");
    assert_eq!(detail["genres"], json!(["Jazz", "Rock"]));
    assert_eq!(detail["past_shows_count"], 0);
    assert_eq!(detail["upcoming_shows_count"], 0);
    assert!(detail["address"].is_null());
    assert_eq!(detail["seeking_talent"], false);
}

#[tokio::test]
async fn test_upcoming_show_is_counted() {
    let server = test_server().await;
    let venue_id = create_venue(&server, "The Hall", "Austin", "TX").await;
    let artist_id = create_artist(&server, "Guns N Petals").await;

    create_show(&server, artist_id, venue_id, &start_in_days(7)).await;
    create_show(&server, artist_id, venue_id, &start_in_days(-7)).await;

    let listing: Value = server.get("/venues").await.json();
    assert_eq!(listing["areas"][0]["venues"][0]["num_upcoming_shows"], 1);

    let detail: Value = server.get(&format!("/venues/{venue_id}")).await.json();
    assert_eq!(detail["upcoming_shows_count"], 1);
    assert_eq!(detail["past_shows_count"], 1);
    assert_eq!(detail["upcoming_shows"][0]["artist_name"], "Guns N Petals");
    assert_eq!(
        detail["upcoming_shows"][0]["artist_image_link"],
        "https://img.example.com/artist.jpg"
    );
}

#[tokio::test]
async fn test_venues_grouped_by_city_and_state() {
    let server = test_server().await;
    create_venue(&server, "The Musical Hop", "San Francisco", "CA").await;
    create_venue(&server, "Park Square Live", "New York", "NY").await;
    create_venue(&server, "The Dueling Pianos", "San Francisco", "CA").await;

    let listing: Value = server.get("/venues").await.json();
    let areas = listing["areas"].as_array().unwrap();
    assert_eq!(areas.len(), 2);
    assert_eq!(areas[0]["city"], "New York");
    assert_eq!(areas[1]["city"], "San Francisco");
    let names: Vec<&str> = areas[1]["venues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["The Dueling Pianos", "The Musical Hop"]);
}

#[tokio::test]
async fn test_search_venues_case_insensitive() {
    let server = test_server().await;
    create_venue(&server, "The Musical Hop", "San Francisco", "CA").await;
    create_venue(&server, "Park Square Live Music & Coffee", "New York", "NY").await;
    create_venue(&server, "The Dueling Pianos Bar", "New York", "NY").await;

    let body: Value = server
        .post("/venues/search")
        .form(&[("search_term", "Music")])
        .await
        .json();
    assert_eq!(body["search_term"], "Music");
    assert_eq!(body["count"], 2);

    let body: Value = server
        .post("/venues/search")
        .form(&[("search_term", "hop")])
        .await
        .json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "The Musical Hop");
    assert_eq!(body["data"][0]["num_upcoming_shows"], 0);
}

#[tokio::test]
async fn test_empty_search_matches_all_venues() {
    let server = test_server().await;
    create_venue(&server, "A", "Austin", "TX").await;
    create_venue(&server, "B", "Austin", "TX").await;

    let body: Value = server
        .post("/venues/search")
        .form(&[("search_term", "")])
        .await
        .json();
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_missing_venue_is_404() {
    let server = test_server().await;
    let response = server.get("/venues/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["category"], "danger");
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_create_venue_without_name_is_rejected() {
    let server = test_server().await;
    let response = server
        .post("/venues/create")
        .form(&[("name", "  "), ("city", "Austin"), ("state", "TX")])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "validation");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred. Venue"));
    assert!(body["message"].as_str().unwrap().contains("name is required"));

    let listing: Value = server.get("/venues").await.json();
    assert!(listing["areas"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_venue_updates_in_place_and_replaces_genres() {
    let server = test_server().await;
    let id = create_venue(&server, "The Hall", "Austin", "TX").await;

    let form: Value = server.get(&format!("/venues/{id}/edit")).await.json();
    assert_eq!(form["id"], id);
    assert_eq!(form["form"]["name"], "The Hall");
    assert_eq!(form["form"]["genres"], json!(["Jazz", "Rock"]));
    assert!(form["genre_choices"].as_array().unwrap().len() > 1);

    let response = server
        .post(&format!("/venues/{id}/edit"))
        .form(&[
            ("name", "The Big Hall"),
            ("city", "Austin"),
            ("state", "TX"),
            ("genres", "Blues"),
            ("seeking_talent", "y"),
            ("seeking_description", "Looking for blues trios"),
        ])
        .await;
    response.assert_status_ok();
    let flash: Value = response.json();
    assert_eq!(flash["redirect"], format!("/venues/{id}"));

    let detail: Value = server.get(&format!("/venues/{id}")).await.json();
    assert_eq!(detail["id"], id);
    assert_eq!(detail["name"], "The Big Hall");
    assert_eq!(detail["genres"], json!(["Blues"]));
    assert_eq!(detail["seeking_talent"], true);
    assert_eq!(detail["seeking_description"], "Looking for blues trios");
}

#[tokio::test]
async fn test_edit_missing_venue_is_404() {
    let server = test_server().await;
    let response = server
        .post("/venues/41/edit")
        .form(&[("name", "Ghost"), ("city", "Austin"), ("state", "TX")])
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_venue_removes_its_shows() {
    let server = test_server().await;
    let venue_id = create_venue(&server, "The Hall", "Austin", "TX").await;
    let artist_id = create_artist(&server, "Guns N Petals").await;
    create_show(&server, artist_id, venue_id, &start_in_days(3)).await;

    let response = server.delete(&format!("/venues/{venue_id}")).await;
    response.assert_status_ok();
    let flash: Value = response.json();
    assert_eq!(flash["message"], "Venue deleted successfully!");
    assert_eq!(flash["redirect"], "/");

    server
        .get(&format!("/venues/{venue_id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let shows: Value = server.get("/shows").await.json();
    assert!(shows["shows"].as_array().unwrap().is_empty());

    let artist: Value = server.get(&format!("/artists/{artist_id}")).await.json();
    assert_eq!(artist["upcoming_shows_count"], 0);
}

#[tokio::test]
async fn test_delete_venue_via_post() {
    let server = test_server().await;
    let id = create_venue(&server, "The Hall", "Austin", "TX").await;
    server
        .post(&format!("/venues/{id}"))
        .await
        .assert_status_ok();
    server
        .get(&format!("/venues/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_venue_reports_failure() {
    let server = test_server().await;
    let response = server.delete("/venues/12").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let flash: Value = response.json();
    assert_eq!(flash["category"], "danger");
    assert_eq!(
        flash["message"],
        "An error occurred. Venue could not be deleted. It does not exist."
    );
}

#[tokio::test]
async fn test_create_form_lists_genre_choices() {
    let server = test_server().await;
    let page: Value = server.get("/venues/create").await.json();
    assert!(page.get("id").is_none());
    assert_eq!(page["form"]["name"], "");
    let choices = page["genre_choices"].as_array().unwrap();
    assert!(choices.contains(&json!("Jazz")));
}
