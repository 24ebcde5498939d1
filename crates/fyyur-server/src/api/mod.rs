pub mod artists;
pub mod error;
pub mod forms;
pub mod shows;
pub mod venues;

use axum::{extract::Path, Json};
use axum_extra::extract::{Form, WithRejection};
use chrono::Utc;
use fyyur_db::queries::Timestamp;
use serde::Serialize;

use error::ApiError;

/// Numeric `{id}` path segment; malformed ids answer like missing records.
pub type IdPath = WithRejection<Path<i32>, ApiError>;

/// Url-encoded body; unreadable bodies answer with a validation flash.
pub type FormBody<T> = WithRejection<Form<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET / and GET /healthz
pub async fn status() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// A venue or artist as it appears in search results and area listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub search_term: String,
    pub count: usize,
    pub data: Vec<Summary>,
}

impl SearchResponse {
    pub fn new(search_term: String, data: Vec<Summary>) -> Self {
        Self {
            search_term,
            count: data.len(),
            data,
        }
    }
}

/// The reference instant for one request.
pub(crate) fn request_now() -> Timestamp {
    Utc::now().fixed_offset()
}
