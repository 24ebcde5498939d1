use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{artist, artist_genre, show};
use crate::input::ArtistInput;
use crate::queries::name_matches;
use crate::DirectoryError;

pub struct ArtistRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ArtistRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<artist::Model>, DirectoryError> {
        Ok(artist::Entity::find()
            .order_by_asc(artist::Column::Name)
            .order_by_asc(artist::Column::Id)
            .all(self.db)
            .await?)
    }

    /// `(id, name)` pairs only, for the artist index.
    pub async fn list_names(&self) -> Result<Vec<(i32, String)>, DirectoryError> {
        Ok(artist::Entity::find()
            .select_only()
            .column(artist::Column::Id)
            .column(artist::Column::Name)
            .order_by_asc(artist::Column::Name)
            .order_by_asc(artist::Column::Id)
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?)
    }

    pub async fn find(&self, id: i32) -> Result<artist::Model, DirectoryError> {
        artist::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("artist {id}")))
    }

    pub async fn genres(&self, id: i32) -> Result<Vec<String>, DirectoryError> {
        Ok(artist_genre::Entity::find()
            .filter(artist_genre::Column::ArtistId.eq(id))
            .order_by_asc(artist_genre::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(|g| g.genre)
            .collect())
    }

    pub async fn search(&self, term: &str) -> Result<Vec<artist::Model>, DirectoryError> {
        Ok(artist::Entity::find()
            .filter(name_matches(artist::Column::Name, term))
            .order_by_asc(artist::Column::Name)
            .all(self.db)
            .await?)
    }

    pub async fn create(&self, input: ArtistInput) -> Result<artist::Model, DirectoryError> {
        let input = input.normalized()?;

        let txn = self.db.begin().await?;
        let mut active = <artist::ActiveModel as ActiveModelTrait>::default();
        let genres = assign(&mut active, input);
        let created = active.insert(&txn).await?;
        insert_genres(&txn, created.id, &genres).await?;
        txn.commit().await?;

        tracing::info!(artist_id = created.id, name = %created.name, "artist created");
        Ok(created)
    }

    /// Update the artist row identified by `id` in place and replace its
    /// genre set. No new artist row is ever inserted here.
    pub async fn update(
        &self,
        id: i32,
        input: ArtistInput,
    ) -> Result<artist::Model, DirectoryError> {
        let input = input.normalized()?;

        let txn = self.db.begin().await?;
        let existing = artist::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("artist {id}")))?;

        let mut active: artist::ActiveModel = existing.into();
        let genres = assign(&mut active, input);
        let updated = active.update(&txn).await?;

        artist_genre::Entity::delete_many()
            .filter(artist_genre::Column::ArtistId.eq(id))
            .exec(&txn)
            .await?;
        insert_genres(&txn, id, &genres).await?;
        txn.commit().await?;

        tracing::info!(artist_id = id, genres = genres.len(), "artist updated");
        Ok(updated)
    }

    /// Remove the artist together with its shows and genre rows.
    pub async fn delete(&self, id: i32) -> Result<artist::Model, DirectoryError> {
        let txn = self.db.begin().await?;
        let existing = artist::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(format!("artist {id}")))?;

        let shows = show::Entity::delete_many()
            .filter(show::Column::ArtistId.eq(id))
            .exec(&txn)
            .await?;
        artist_genre::Entity::delete_many()
            .filter(artist_genre::Column::ArtistId.eq(id))
            .exec(&txn)
            .await?;
        artist::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            artist_id = id,
            shows_removed = shows.rows_affected,
            "artist deleted"
        );
        Ok(existing)
    }
}

fn assign(active: &mut artist::ActiveModel, input: ArtistInput) -> Vec<String> {
    active.name = Set(input.name);
    active.city = Set(input.city);
    active.state = Set(input.state);
    active.phone = Set(input.phone);
    active.image_link = Set(input.image_link);
    active.facebook_link = Set(input.facebook_link);
    active.website_link = Set(input.website_link);
    active.seeking_venue = Set(input.seeking_venue);
    active.seeking_description = Set(input.seeking_description);
    input.genres
}

async fn insert_genres(
    txn: &DatabaseTransaction,
    artist_id: i32,
    genres: &[String],
) -> Result<(), DbErr> {
    for genre in genres {
        artist_genre::ActiveModel {
            artist_id: Set(artist_id),
            genre: Set(genre.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}
