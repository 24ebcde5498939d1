use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::Serialize;

use crate::entities::{artist, show, venue};
use crate::input::ShowInput;
use crate::queries::{name_matches, to_utc, Timestamp};
use crate::DirectoryError;

/// A show joined with both sides of the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub show_id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: Timestamp,
}

/// Results of one search term applied to artist names and venue names
/// independently.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShowSearch {
    pub artists: Vec<ShowListing>,
    pub venues: Vec<ShowListing>,
}

pub struct ShowRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ShowRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every show, past and upcoming, ordered by start time.
    pub async fn list(&self) -> Result<Vec<ShowListing>, DirectoryError> {
        let shows = show::Entity::find()
            .order_by_asc(show::Column::StartTime)
            .order_by_asc(show::Column::Id)
            .all(self.db)
            .await?;
        self.project(shows).await
    }

    /// Book an artist at a venue. Both must exist; otherwise nothing is
    /// written and every problem is reported together.
    pub async fn create(&self, input: ShowInput) -> Result<show::Model, DirectoryError> {
        let txn = self.db.begin().await?;

        let mut problems = Vec::new();
        if artist::Entity::find_by_id(input.artist_id)
            .one(&txn)
            .await?
            .is_none()
        {
            problems.push("Invalid Artist ID");
        }
        if venue::Entity::find_by_id(input.venue_id)
            .one(&txn)
            .await?
            .is_none()
        {
            problems.push("Invalid Venue ID");
        }
        if !problems.is_empty() {
            return Err(DirectoryError::Validation(problems.join(" ")));
        }

        let created = show::ActiveModel {
            artist_id: Set(input.artist_id),
            venue_id: Set(input.venue_id),
            start_time: Set(to_utc(input.start_time)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(
            show_id = created.id,
            artist_id = created.artist_id,
            venue_id = created.venue_id,
            "show created"
        );
        Ok(created)
    }

    pub async fn search(&self, term: &str) -> Result<ShowSearch, DirectoryError> {
        let by_artist = show::Entity::find()
            .inner_join(artist::Entity)
            .filter(name_matches(artist::Column::Name, term))
            .order_by_asc(show::Column::StartTime)
            .all(self.db)
            .await?;

        let by_venue = show::Entity::find()
            .inner_join(venue::Entity)
            .filter(name_matches(venue::Column::Name, term))
            .order_by_asc(show::Column::StartTime)
            .all(self.db)
            .await?;

        Ok(ShowSearch {
            artists: self.project(by_artist).await?,
            venues: self.project(by_venue).await?,
        })
    }

    /// Attach artist and venue details with one lookup per side.
    async fn project(&self, shows: Vec<show::Model>) -> Result<Vec<ShowListing>, DirectoryError> {
        if shows.is_empty() {
            return Ok(Vec::new());
        }

        let artist_ids: Vec<i32> = shows.iter().map(|s| s.artist_id).collect();
        let venue_ids: Vec<i32> = shows.iter().map(|s| s.venue_id).collect();

        let artists: HashMap<i32, artist::Model> = artist::Entity::find()
            .filter(artist::Column::Id.is_in(artist_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let venues: HashMap<i32, venue::Model> = venue::Entity::find()
            .filter(venue::Column::Id.is_in(venue_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        Ok(shows
            .into_iter()
            .filter_map(|s| {
                let a = artists.get(&s.artist_id)?;
                let v = venues.get(&s.venue_id)?;
                Some(ShowListing {
                    show_id: s.id,
                    venue_id: v.id,
                    venue_name: v.name.clone(),
                    artist_id: a.id,
                    artist_name: a.name.clone(),
                    artist_image_link: a.image_link.clone(),
                    start_time: s.start_time,
                })
            })
            .collect())
    }
}
