use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{Form, WithRejection};
use fyyur_db::entities::artist;
use fyyur_db::queries::{
    count_shows, shows_for_artist, OwnerKind, ShowPartition, TimeFrame, VenueShow,
};
use fyyur_db::repository::ArtistRepository;
use fyyur_db::AppState;
use serde::Serialize;
use std::sync::Arc;

use super::error::{ApiError, Flash};
use super::forms::{ArtistForm, FormPage, SearchForm, GENRE_CHOICES};
use super::{request_now, FormBody, IdPath, SearchResponse, Summary};

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<artist::Model> for ArtistResponse {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            image_link: a.image_link,
            facebook_link: a.facebook_link,
            website: a.website_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    #[serde(flatten)]
    pub artist: ArtistResponse,
    pub genres: Vec<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: u64,
    pub upcoming_shows_count: u64,
}

impl ArtistDetailResponse {
    fn new(
        a: artist::Model,
        genres: Vec<String>,
        past: ShowPartition<VenueShow>,
        upcoming: ShowPartition<VenueShow>,
    ) -> Self {
        Self {
            artist: a.into(),
            genres,
            past_shows_count: past.total,
            past_shows: past.data,
            upcoming_shows_count: upcoming.total,
            upcoming_shows: upcoming.data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistNameResponse {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ArtistsResponse {
    pub artists: Vec<ArtistNameResponse>,
}

/// GET /artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ArtistsResponse>, ApiError> {
    let artists = ArtistRepository::new(&state.db)
        .list_names()
        .await?
        .into_iter()
        .map(|(id, name)| ArtistNameResponse { id, name })
        .collect();
    Ok(Json(ArtistsResponse { artists }))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    WithRejection(Form(form), _): FormBody<SearchForm>,
) -> Result<Json<SearchResponse>, ApiError> {
    let now = request_now();
    let artists = ArtistRepository::new(&state.db)
        .search(&form.search_term)
        .await?;

    let mut data = Vec::with_capacity(artists.len());
    for a in artists {
        let upcoming =
            count_shows(&state.db, OwnerKind::Artist, a.id, TimeFrame::Upcoming, now).await?;
        data.push(Summary {
            id: a.id,
            name: a.name,
            num_upcoming_shows: upcoming,
        });
    }
    Ok(Json(SearchResponse::new(form.search_term, data)))
}

/// GET /artists/{id}
pub async fn show_artist(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<ArtistDetailResponse>, ApiError> {
    let now = request_now();
    let repo = ArtistRepository::new(&state.db);
    let a = repo.find(id).await?;
    let genres = repo.genres(id).await?;
    let past = shows_for_artist(&state.db, id, TimeFrame::Past, now).await?;
    let upcoming = shows_for_artist(&state.db, id, TimeFrame::Upcoming, now).await?;
    Ok(Json(ArtistDetailResponse::new(a, genres, past, upcoming)))
}

/// GET /artists/create
pub async fn create_artist_form() -> Json<FormPage<ArtistForm>> {
    Json(FormPage {
        id: None,
        form: ArtistForm::default(),
        genre_choices: GENRE_CHOICES,
    })
}

/// POST /artists/create
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    WithRejection(Form(form), _): FormBody<ArtistForm>,
) -> Result<(StatusCode, Json<Flash>), ApiError> {
    let name = form.name.trim().to_string();
    let created = ArtistRepository::new(&state.db)
        .create(form.into_input())
        .await
        .map_err(|e| {
            ApiError::with_context(e, format!("An error occurred. Artist {name} could not be listed."))
        })?;

    Ok((
        StatusCode::CREATED,
        Json(
            Flash::success(format!("Artist {} was successfully listed!", created.name))
                .with_id(created.id)
                .redirect_to("/"),
        ),
    ))
}

/// POST /artists/{id} and DELETE /artists/{id}
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<Flash>, ApiError> {
    ArtistRepository::new(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::with_context(e, "An error occurred. Artist could not be deleted."))?;

    Ok(Json(
        Flash::success("Artist deleted successfully!").redirect_to("/"),
    ))
}

/// GET /artists/{id}/edit
pub async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<FormPage<ArtistForm>>, ApiError> {
    let repo = ArtistRepository::new(&state.db);
    let a = repo.find(id).await?;
    let genres = repo.genres(id).await?;
    Ok(Json(FormPage {
        id: Some(id),
        form: ArtistForm::from_model(a, genres),
        genre_choices: GENRE_CHOICES,
    }))
}

/// POST /artists/{id}/edit
///
/// Updates the existing row; the artist keeps its id and its shows.
pub async fn edit_artist(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Form(form), _): FormBody<ArtistForm>,
) -> Result<Json<Flash>, ApiError> {
    let name = form.name.trim().to_string();
    let updated = ArtistRepository::new(&state.db)
        .update(id, form.into_input())
        .await
        .map_err(|e| {
            ApiError::with_context(e, format!("An error occurred. Artist {name} could not be updated."))
        })?;

    Ok(Json(
        Flash::success(format!("Artist {} was successfully updated!", updated.name))
            .with_id(id)
            .redirect_to(format!("/artists/{id}")),
    ))
}
