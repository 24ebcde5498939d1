//! Validated inputs accepted by the repositories.

use crate::queries::Timestamp;
use crate::DirectoryError;

/// Longest genre tag the genre tables accept.
pub const MAX_GENRE_LEN: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInput {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: Timestamp,
}

/// Collects every problem with a submission before failing.
#[derive(Debug, Default)]
struct Problems(Vec<String>);

impl Problems {
    fn required(&mut self, field: &str, value: String) -> String {
        let value = value.trim().to_string();
        if value.is_empty() {
            self.0.push(format!("{field} is required"));
        }
        value
    }

    fn genres(&mut self, genres: Vec<String>) -> Vec<String> {
        let mut out = Vec::with_capacity(genres.len());
        for genre in genres {
            let genre = genre.trim();
            if genre.is_empty() {
                continue;
            }
            if genre.chars().count() > MAX_GENRE_LEN {
                self.0.push(format!(
                    "genre '{genre}' is longer than {MAX_GENRE_LEN} characters"
                ));
                continue;
            }
            out.push(genre.to_string());
        }
        out
    }

    fn finish<T>(self, value: T) -> Result<T, DirectoryError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(DirectoryError::Validation(self.0.join("; ")))
        }
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl VenueInput {
    /// Trim every field, drop blank optionals and genres, and reject
    /// missing required fields or oversized genres.
    pub fn normalized(self) -> Result<Self, DirectoryError> {
        let mut problems = Problems::default();
        let input = Self {
            name: problems.required("name", self.name),
            city: problems.required("city", self.city),
            state: problems.required("state", self.state),
            address: optional(self.address),
            phone: optional(self.phone),
            genres: problems.genres(self.genres),
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
            website_link: optional(self.website_link),
            seeking_talent: self.seeking_talent,
            seeking_description: optional(self.seeking_description),
        };
        problems.finish(input)
    }
}

impl ArtistInput {
    pub fn normalized(self) -> Result<Self, DirectoryError> {
        let mut problems = Problems::default();
        let input = Self {
            name: problems.required("name", self.name),
            city: problems.required("city", self.city),
            state: problems.required("state", self.state),
            phone: optional(self.phone),
            genres: problems.genres(self.genres),
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
            website_link: optional(self.website_link),
            seeking_venue: self.seeking_venue,
            seeking_description: optional(self.seeking_description),
        };
        problems.finish(input)
    }
}
