use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{show, venue, venue_genre};
use crate::input::VenueInput;
use crate::queries::name_matches;
use crate::DirectoryError;

pub struct VenueRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VenueRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All venues ordered by area, then name.
    pub async fn list(&self) -> Result<Vec<venue::Model>, DirectoryError> {
        Ok(venue::Entity::find()
            .order_by_asc(venue::Column::City)
            .order_by_asc(venue::Column::State)
            .order_by_asc(venue::Column::Name)
            .all(self.db)
            .await?)
    }

    pub async fn find(&self, id: i32) -> Result<venue::Model, DirectoryError> {
        venue::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("venue {id}")))
    }

    pub async fn genres(&self, id: i32) -> Result<Vec<String>, DirectoryError> {
        Ok(venue_genre::Entity::find()
            .filter(venue_genre::Column::VenueId.eq(id))
            .order_by_asc(venue_genre::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(|g| g.genre)
            .collect())
    }

    pub async fn search(&self, term: &str) -> Result<Vec<venue::Model>, DirectoryError> {
        Ok(venue::Entity::find()
            .filter(name_matches(venue::Column::Name, term))
            .order_by_asc(venue::Column::Name)
            .all(self.db)
            .await?)
    }

    pub async fn create(&self, input: VenueInput) -> Result<venue::Model, DirectoryError> {
        let input = input.normalized()?;

        let txn = self.db.begin().await?;
        let mut active = <venue::ActiveModel as ActiveModelTrait>::default();
        let genres = assign(&mut active, input);
        let created = active.insert(&txn).await?;
        insert_genres(&txn, created.id, &genres).await?;
        txn.commit().await?;

        tracing::info!(venue_id = created.id, name = %created.name, "venue created");
        Ok(created)
    }

    /// Overwrite the venue's fields and replace its genre set.
    pub async fn update(&self, id: i32, input: VenueInput) -> Result<venue::Model, DirectoryError> {
        let input = input.normalized()?;

        let txn = self.db.begin().await?;
        let existing = venue::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("venue {id}")))?;

        let mut active: venue::ActiveModel = existing.into();
        let genres = assign(&mut active, input);
        let updated = active.update(&txn).await?;

        venue_genre::Entity::delete_many()
            .filter(venue_genre::Column::VenueId.eq(id))
            .exec(&txn)
            .await?;
        insert_genres(&txn, id, &genres).await?;
        txn.commit().await?;

        tracing::info!(venue_id = id, genres = genres.len(), "venue updated");
        Ok(updated)
    }

    /// Remove the venue together with its shows and genre rows.
    pub async fn delete(&self, id: i32) -> Result<venue::Model, DirectoryError> {
        let txn = self.db.begin().await?;
        let existing = venue::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("venue {id}")))?;

        let shows = show::Entity::delete_many()
            .filter(show::Column::VenueId.eq(id))
            .exec(&txn)
            .await?;
        venue_genre::Entity::delete_many()
            .filter(venue_genre::Column::VenueId.eq(id))
            .exec(&txn)
            .await?;
        venue::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            venue_id = id,
            shows_removed = shows.rows_affected,
            "venue deleted"
        );
        Ok(existing)
    }
}

/// Copy the submitted fields onto the active model, handing back the genres.
fn assign(active: &mut venue::ActiveModel, input: VenueInput) -> Vec<String> {
    active.name = Set(input.name);
    active.city = Set(input.city);
    active.state = Set(input.state);
    active.address = Set(input.address);
    active.phone = Set(input.phone);
    active.image_link = Set(input.image_link);
    active.facebook_link = Set(input.facebook_link);
    active.website_link = Set(input.website_link);
    active.seeking_talent = Set(input.seeking_talent);
    active.seeking_description = Set(input.seeking_description);
    input.genres
}

async fn insert_genres(
    txn: &DatabaseTransaction,
    venue_id: i32,
    genres: &[String],
) -> Result<(), DbErr> {
    for genre in genres {
        venue_genre::ActiveModel {
            venue_id: Set(venue_id),
            genre: Set(genre.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}
