use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{Form, WithRejection};
use fyyur_db::entities::venue;
use fyyur_db::queries::{
    count_shows, shows_for_venue, ArtistShow, OwnerKind, ShowPartition, TimeFrame, Timestamp,
};
use fyyur_db::repository::VenueRepository;
use fyyur_db::AppState;
use serde::Serialize;
use std::sync::Arc;

use super::error::{ApiError, Flash};
use super::forms::{FormPage, SearchForm, VenueForm, GENRE_CHOICES};
use super::{request_now, FormBody, IdPath, SearchResponse, Summary};

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<venue::Model> for VenueResponse {
    fn from(v: venue::Model) -> Self {
        Self {
            id: v.id,
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            image_link: v.image_link,
            facebook_link: v.facebook_link,
            website: v.website_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    pub genres: Vec<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: u64,
    pub upcoming_shows_count: u64,
}

impl VenueDetailResponse {
    fn new(
        v: venue::Model,
        genres: Vec<String>,
        past: ShowPartition<ArtistShow>,
        upcoming: ShowPartition<ArtistShow>,
    ) -> Self {
        Self {
            venue: v.into(),
            genres,
            past_shows_count: past.total,
            past_shows: past.data,
            upcoming_shows_count: upcoming.total,
            upcoming_shows: upcoming.data,
        }
    }
}

/// Venues sharing one (city, state).
#[derive(Debug, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<Summary>,
}

#[derive(Debug, Serialize)]
pub struct AreasResponse {
    pub areas: Vec<Area>,
}

/// Group venues already ordered by city and state into areas.
fn group_by_area(venues: Vec<(venue::Model, u64)>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();
    for (v, upcoming) in venues {
        let summary = Summary {
            id: v.id,
            name: v.name,
            num_upcoming_shows: upcoming,
        };
        match areas.last_mut() {
            Some(area) if area.city == v.city && area.state == v.state => {
                area.venues.push(summary)
            }
            _ => areas.push(Area {
                city: v.city,
                state: v.state,
                venues: vec![summary],
            }),
        }
    }
    areas
}

async fn summarize(
    state: &AppState,
    venues: Vec<venue::Model>,
    now: Timestamp,
) -> Result<Vec<(venue::Model, u64)>, ApiError> {
    let mut out = Vec::with_capacity(venues.len());
    for v in venues {
        let upcoming =
            count_shows(&state.db, OwnerKind::Venue, v.id, TimeFrame::Upcoming, now).await?;
        out.push((v, upcoming));
    }
    Ok(out)
}

/// GET /venues
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AreasResponse>, ApiError> {
    let now = request_now();
    let venues = VenueRepository::new(&state.db).list().await?;
    let counted = summarize(&state, venues, now).await?;
    Ok(Json(AreasResponse {
        areas: group_by_area(counted),
    }))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    WithRejection(Form(form), _): FormBody<SearchForm>,
) -> Result<Json<SearchResponse>, ApiError> {
    let now = request_now();
    let venues = VenueRepository::new(&state.db)
        .search(&form.search_term)
        .await?;
    let data = summarize(&state, venues, now)
        .await?
        .into_iter()
        .map(|(v, upcoming)| Summary {
            id: v.id,
            name: v.name,
            num_upcoming_shows: upcoming,
        })
        .collect();
    Ok(Json(SearchResponse::new(form.search_term, data)))
}

/// GET /venues/{id}
pub async fn show_venue(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<VenueDetailResponse>, ApiError> {
    let now = request_now();
    let repo = VenueRepository::new(&state.db);
    let v = repo.find(id).await?;
    let genres = repo.genres(id).await?;
    let past = shows_for_venue(&state.db, id, TimeFrame::Past, now).await?;
    let upcoming = shows_for_venue(&state.db, id, TimeFrame::Upcoming, now).await?;
    Ok(Json(VenueDetailResponse::new(v, genres, past, upcoming)))
}

/// GET /venues/create
pub async fn create_venue_form() -> Json<FormPage<VenueForm>> {
    Json(FormPage {
        id: None,
        form: VenueForm::default(),
        genre_choices: GENRE_CHOICES,
    })
}

/// POST /venues/create
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    WithRejection(Form(form), _): FormBody<VenueForm>,
) -> Result<(StatusCode, Json<Flash>), ApiError> {
    let name = form.name.trim().to_string();
    let created = VenueRepository::new(&state.db)
        .create(form.into_input())
        .await
        .map_err(|e| {
            ApiError::with_context(e, format!("An error occurred. Venue {name} could not be listed."))
        })?;

    Ok((
        StatusCode::CREATED,
        Json(
            Flash::success(format!("Venue {} was successfully listed!", created.name))
                .with_id(created.id)
                .redirect_to("/"),
        ),
    ))
}

/// POST /venues/{id} and DELETE /venues/{id}
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<Flash>, ApiError> {
    VenueRepository::new(&state.db)
        .delete(id)
        .await
        .map_err(|e| ApiError::with_context(e, "An error occurred. Venue could not be deleted."))?;

    Ok(Json(
        Flash::success("Venue deleted successfully!").redirect_to("/"),
    ))
}

/// GET /venues/{id}/edit
pub async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<FormPage<VenueForm>>, ApiError> {
    let repo = VenueRepository::new(&state.db);
    let v = repo.find(id).await?;
    let genres = repo.genres(id).await?;
    Ok(Json(FormPage {
        id: Some(id),
        form: VenueForm::from_model(v, genres),
        genre_choices: GENRE_CHOICES,
    }))
}

/// POST /venues/{id}/edit
pub async fn edit_venue(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Form(form), _): FormBody<VenueForm>,
) -> Result<Json<Flash>, ApiError> {
    let name = form.name.trim().to_string();
    let updated = VenueRepository::new(&state.db)
        .update(id, form.into_input())
        .await
        .map_err(|e| {
            ApiError::with_context(e, format!("An error occurred. Venue {name} could not be updated."))
        })?;

    Ok(Json(
        Flash::success(format!("Venue {} was successfully updated!", updated.name))
            .with_id(id)
            .redirect_to(format!("/venues/{id}")),
    ))
}
