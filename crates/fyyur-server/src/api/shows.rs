use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::{Form, WithRejection};
use fyyur_db::repository::{ShowListing, ShowRepository};
use fyyur_db::AppState;
use serde::Serialize;
use std::sync::Arc;

use super::error::{ApiError, Flash};
use super::forms::{FormPage, SearchForm, ShowForm};
use super::{request_now, FormBody};

const CREATE_FAILED: &str = "An error occurred. Show could not be listed.";

#[derive(Debug, Serialize)]
pub struct ShowsResponse {
    pub shows: Vec<ShowListing>,
}

#[derive(Debug, Serialize)]
pub struct ShowMatches {
    pub count: usize,
    pub data: Vec<ShowListing>,
}

impl From<Vec<ShowListing>> for ShowMatches {
    fn from(data: Vec<ShowListing>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShowSearchResponse {
    pub search_term: String,
    pub artists: ShowMatches,
    pub venues: ShowMatches,
}

/// GET /shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ShowsResponse>, ApiError> {
    let shows = ShowRepository::new(&state.db).list().await?;
    Ok(Json(ShowsResponse { shows }))
}

/// GET /shows/create
pub async fn create_show_form() -> Json<FormPage<ShowForm>> {
    Json(FormPage {
        id: None,
        form: ShowForm::starting_at(request_now()),
        genre_choices: &[],
    })
}

/// POST /shows/create
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    WithRejection(Form(form), _): FormBody<ShowForm>,
) -> Result<(StatusCode, Json<Flash>), ApiError> {
    let input = form
        .into_input()
        .map_err(|e| ApiError::with_context(e, CREATE_FAILED))?;
    let created = ShowRepository::new(&state.db)
        .create(input)
        .await
        .map_err(|e| ApiError::with_context(e, CREATE_FAILED))?;

    Ok((
        StatusCode::CREATED,
        Json(
            Flash::success("Show was successfully listed!")
                .with_id(created.id)
                .redirect_to("/"),
        ),
    ))
}

/// POST /shows/search
pub async fn search_shows(
    State(state): State<Arc<AppState>>,
    WithRejection(Form(form), _): FormBody<SearchForm>,
) -> Result<Json<ShowSearchResponse>, ApiError> {
    let found = ShowRepository::new(&state.db)
        .search(&form.search_term)
        .await?;
    Ok(Json(ShowSearchResponse {
        search_term: form.search_term,
        artists: found.artists.into(),
        venues: found.venues.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches() {
        let json = serde_json::to_value(ShowMatches::from(Vec::new())).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_form_defaults_start_time() {
        let Json(page) = create_show_form().await;
        assert!(page.id.is_none());
        assert!(page.genre_choices.is_empty());
        assert!(super::super::forms::parse_start_time(&page.form.start_time).is_some());
    }
}
