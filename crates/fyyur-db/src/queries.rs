//! Show-count and show-listing helpers shared by the venue and artist pages.
//!
//! Every helper takes the reference instant explicitly. Callers read the
//! clock once per request and pass the same value to all helpers so a single
//! page never classifies a show twice.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;

use crate::entities::{artist, show, venue};

pub type Timestamp = DateTime<FixedOffset>;

/// The same instant expressed at `+00:00`.
///
/// Start times are stored and compared in UTC. SQLite keeps them as text and
/// compares them lexically, so mixed offsets would misorder instants.
pub fn to_utc(t: Timestamp) -> Timestamp {
    t.with_timezone(&Utc).fixed_offset()
}

/// Which side of the reference instant a show falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrame {
    /// `start_time > now`
    Upcoming,
    /// `start_time <= now`
    Past,
}

impl TimeFrame {
    pub fn of(start_time: Timestamp, now: Timestamp) -> Self {
        if start_time > now {
            Self::Upcoming
        } else {
            Self::Past
        }
    }

    fn condition(self, now: Timestamp) -> SimpleExpr {
        let now = to_utc(now);
        match self {
            Self::Upcoming => show::Column::StartTime.gt(now),
            Self::Past => show::Column::StartTime.lte(now),
        }
    }
}

/// The entity a show is counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Venue,
    Artist,
}

impl OwnerKind {
    fn column(self) -> show::Column {
        match self {
            Self::Venue => show::Column::VenueId,
            Self::Artist => show::Column::ArtistId,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowPartition<T: Serialize> {
    pub total: u64,
    pub data: Vec<T>,
}

impl<T: Serialize> ShowPartition<T> {
    fn from_rows(data: Vec<T>) -> Self {
        Self {
            total: data.len() as u64,
            data,
        }
    }
}

/// A show seen from an artist's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShow {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: Timestamp,
}

/// A show seen from a venue's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistShow {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: Timestamp,
}

pub async fn count_shows<C: ConnectionTrait>(
    db: &C,
    owner: OwnerKind,
    owner_id: i32,
    frame: TimeFrame,
    now: Timestamp,
) -> Result<u64, DbErr> {
    show::Entity::find()
        .filter(owner.column().eq(owner_id))
        .filter(frame.condition(now))
        .count(db)
        .await
}

pub async fn shows_for_artist<C: ConnectionTrait>(
    db: &C,
    artist_id: i32,
    frame: TimeFrame,
    now: Timestamp,
) -> Result<ShowPartition<VenueShow>, DbErr> {
    let rows = show::Entity::find()
        .filter(show::Column::ArtistId.eq(artist_id))
        .filter(frame.condition(now))
        .order_by_asc(show::Column::StartTime)
        .find_also_related(venue::Entity)
        .all(db)
        .await?;

    let data = rows
        .into_iter()
        .filter_map(|(s, v)| {
            v.map(|v| VenueShow {
                venue_id: v.id,
                venue_name: v.name,
                venue_image_link: v.image_link,
                start_time: s.start_time,
            })
        })
        .collect();

    Ok(ShowPartition::from_rows(data))
}

pub async fn shows_for_venue<C: ConnectionTrait>(
    db: &C,
    venue_id: i32,
    frame: TimeFrame,
    now: Timestamp,
) -> Result<ShowPartition<ArtistShow>, DbErr> {
    let rows = show::Entity::find()
        .filter(show::Column::VenueId.eq(venue_id))
        .filter(frame.condition(now))
        .order_by_asc(show::Column::StartTime)
        .find_also_related(artist::Entity)
        .all(db)
        .await?;

    let data = rows
        .into_iter()
        .filter_map(|(s, a)| {
            a.map(|a| ArtistShow {
                artist_id: a.id,
                artist_name: a.name,
                artist_image_link: a.image_link,
                start_time: s.start_time,
            })
        })
        .collect();

    Ok(ShowPartition::from_rows(data))
}

/// Case-insensitive substring match on a name column. An empty term matches
/// every row.
///
/// The term is lowercased with full Unicode rules. Postgres `LOWER` does the
/// same. SQLite's built-in `LOWER` only folds ASCII, so on SQLite a name
/// holding an uppercase non-ASCII letter such as `É` is not found by a term
/// containing that letter.
pub fn name_matches<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.trim().to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
