pub mod api;
pub mod config;

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use fyyur_db::AppState;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use config::ServerConfig;

pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let venues = Router::new()
        .route("/", get(api::venues::list_venues))
        .route("/search", axum::routing::post(api::venues::search_venues))
        .route(
            "/create",
            get(api::venues::create_venue_form).post(api::venues::create_venue),
        )
        .route(
            "/{id}",
            get(api::venues::show_venue)
                .post(api::venues::delete_venue)
                .delete(api::venues::delete_venue),
        )
        .route(
            "/{id}/edit",
            get(api::venues::edit_venue_form).post(api::venues::edit_venue),
        );

    let artists = Router::new()
        .route("/", get(api::artists::list_artists))
        .route("/search", axum::routing::post(api::artists::search_artists))
        .route(
            "/create",
            get(api::artists::create_artist_form).post(api::artists::create_artist),
        )
        .route(
            "/{id}",
            get(api::artists::show_artist)
                .post(api::artists::delete_artist)
                .delete(api::artists::delete_artist),
        )
        .route(
            "/{id}/edit",
            get(api::artists::edit_artist_form).post(api::artists::edit_artist),
        );

    let shows = Router::new()
        .route("/", get(api::shows::list_shows))
        .route("/search", axum::routing::post(api::shows::search_shows))
        .route(
            "/create",
            get(api::shows::create_show_form).post(api::shows::create_show),
        );

    Router::new()
        .route("/", get(api::status))
        .route("/healthz", get(api::status))
        .nest("/venues", venues)
        .nest("/artists", artists)
        .nest("/shows", shows)
        .fallback(api::error::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}
