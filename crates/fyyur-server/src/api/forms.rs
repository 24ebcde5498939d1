//! Form payloads accepted by the create/edit/search endpoints.
//!
//! Bodies are `application/x-www-form-urlencoded`. `genres` is a repeated
//! key, and checkbox fields are on when their value is `"y"`.

use chrono::{DateTime, NaiveDateTime};
use fyyur_db::entities::{artist, venue};
use fyyur_db::input::{ArtistInput, ShowInput, VenueInput};
use fyyur_db::queries::{to_utc, Timestamp};
use fyyur_db::DirectoryError;
use serde::{Deserialize, Serialize};

/// Suggested genre tags. Stored genres are free-form and not limited to
/// this list.
pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

const CHECKED: &str = "y";

fn checkbox(value: &Option<String>) -> bool {
    value.as_deref() == Some(CHECKED)
}

fn checked(on: bool) -> Option<String> {
    on.then(|| CHECKED.to_string())
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    /// Prefill from a stored venue for the edit page.
    pub fn from_model(v: venue::Model, genres: Vec<String>) -> Self {
        Self {
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            genres,
            image_link: v.image_link,
            facebook_link: v.facebook_link,
            website_link: v.website_link,
            seeking_talent: checked(v.seeking_talent),
            seeking_description: v.seeking_description,
        }
    }

    pub fn into_input(self) -> VenueInput {
        VenueInput {
            seeking_talent: checkbox(&self.seeking_talent),
            name: self.name,
            city: self.city,
            state: self.state,
            address: self.address,
            phone: self.phone,
            genres: self.genres,
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website_link: self.website_link,
            seeking_description: self.seeking_description,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn from_model(a: artist::Model, genres: Vec<String>) -> Self {
        Self {
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            genres,
            image_link: a.image_link,
            facebook_link: a.facebook_link,
            website_link: a.website_link,
            seeking_venue: checked(a.seeking_venue),
            seeking_description: a.seeking_description,
        }
    }

    pub fn into_input(self) -> ArtistInput {
        ArtistInput {
            seeking_venue: checkbox(&self.seeking_venue),
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: self.genres,
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website_link: self.website_link,
            seeking_description: self.seeking_description,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

impl ShowForm {
    /// Blank form with the start time defaulted to `now`.
    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            start_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            ..Default::default()
        }
    }

    /// Parse ids and start time, reporting every malformed field at once.
    /// Ids that do not parse are reported the same way as ids that do not
    /// exist.
    pub fn into_input(self) -> Result<ShowInput, DirectoryError> {
        let artist_id = self.artist_id.trim().parse::<i32>().ok();
        let venue_id = self.venue_id.trim().parse::<i32>().ok();
        let start_time = parse_start_time(&self.start_time);

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) => Ok(ShowInput {
                artist_id,
                venue_id,
                start_time,
            }),
            (artist_id, venue_id, start_time) => {
                let mut problems = Vec::new();
                if artist_id.is_none() {
                    problems.push("Invalid Artist ID");
                }
                if venue_id.is_none() {
                    problems.push("Invalid Venue ID");
                }
                if start_time.is_none() {
                    problems.push("Invalid start time");
                }
                Err(DirectoryError::Validation(problems.join(" ")))
            }
        }
    }
}

/// Accepts RFC 3339 or `YYYY-MM-DD[ T]HH:MM[:SS]`. Values without an offset
/// are taken as UTC; values with one are converted to UTC.
pub fn parse_start_time(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(to_utc(t));
    }
    [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .map(|naive| naive.and_utc().fixed_offset())
}

/// Envelope for the GET side of every form route.
#[derive(Debug, Serialize)]
pub struct FormPage<F: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub form: F,
    #[serde(skip_serializing_if = "no_choices")]
    pub genre_choices: &'static [&'static str],
}

fn no_choices(choices: &&'static [&'static str]) -> bool {
    choices.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_only_y_is_on() {
        assert!(checkbox(&Some("y".into())));
        assert!(!checkbox(&Some("n".into())));
        assert!(!checkbox(&Some("on".into())));
        assert!(!checkbox(&None));
    }

    #[test]
    fn test_venue_form_into_input() {
        let form = VenueForm {
            name: "The Hall".into(),
            city: "Austin".into(),
            state: "TX".into(),
            genres: vec!["Jazz".into(), "Rock".into()],
            seeking_talent: Some("y".into()),
            ..Default::default()
        };
        let input = form.into_input();
        assert_eq!(input.name, "The Hall");
        assert_eq!(input.genres, vec!["Jazz", "Rock"]);
        assert!(input.seeking_talent);
    }

    #[test]
    fn test_venue_form_prefill_round_trips_checkbox() {
        let model = venue::Model {
            id: 1,
            name: "The Hall".into(),
            city: "Austin".into(),
            state: "TX".into(),
            address: None,
            phone: None,
            image_link: None,
            facebook_link: None,
            website_link: None,
            seeking_talent: true,
            seeking_description: Some("Jazz trios".into()),
        };
        let form = VenueForm::from_model(model, vec!["Jazz".into()]);
        assert_eq!(form.seeking_talent.as_deref(), Some("y"));
        assert!(form.into_input().seeking_talent);
    }

    #[test]
    fn test_artist_form_unchecked() {
        let input = ArtistForm {
            name: "Matt Quevedo".into(),
            ..Default::default()
        }
        .into_input();
        assert!(!input.seeking_venue);
    }

    #[test]
    fn test_parse_start_time_formats() {
        let expected = "2035-04-01T20:00:00+00:00";
        for raw in [
            "2035-04-01 20:00:00",
            "2035-04-01T20:00:00",
            "2035-04-01 20:00",
            "2035-04-01T20:00",
            "2035-04-01T20:00:00Z",
            " 2035-04-01T20:00:00+00:00 ",
        ] {
            let parsed = parse_start_time(raw).unwrap_or_else(|| panic!("{raw}"));
            assert_eq!(parsed.to_rfc3339(), expected, "{raw}");
        }
    }

    #[test]
    fn test_parse_start_time_converts_offset_to_utc() {
        let parsed = parse_start_time("2035-04-01T20:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2035-04-01T18:00:00+00:00");

        let parsed = parse_start_time("2035-04-01T00:30:00-05:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2035-04-01T05:30:00+00:00");
    }

    #[test]
    fn test_parse_start_time_rejects_garbage() {
        assert!(parse_start_time("").is_none());
        assert!(parse_start_time("next friday").is_none());
        assert!(parse_start_time("2035-13-01 20:00").is_none());
    }

    #[test]
    fn test_show_form_into_input() {
        let input = ShowForm {
            artist_id: "4".into(),
            venue_id: " 1 ".into(),
            start_time: "2035-04-01 20:00:00".into(),
        }
        .into_input()
        .unwrap();
        assert_eq!(input.artist_id, 4);
        assert_eq!(input.venue_id, 1);
    }

    #[test]
    fn test_show_form_reports_all_problems() {
        let err = ShowForm {
            artist_id: "abc".into(),
            venue_id: String::new(),
            start_time: "soon".into(),
        }
        .into_input()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: Invalid Artist ID Invalid Venue ID Invalid start time"
        );
    }

    #[test]
    fn test_show_form_default_start_time() {
        let now = DateTime::parse_from_rfc3339("2026-10-16T09:30:00+00:00").unwrap();
        let form = ShowForm::starting_at(now);
        assert_eq!(form.start_time, "2026-10-16 09:30:00");
        assert!(form.artist_id.is_empty());
    }

    #[test]
    fn test_search_form_default_term() {
        let form: SearchForm = serde_json::from_str("{}").unwrap();
        assert!(form.search_term.is_empty());
    }

    #[test]
    fn test_form_page_skips_empty_choices() {
        let page = FormPage {
            id: None,
            form: ShowForm::default(),
            genre_choices: &[],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("genre_choices").is_none());
        assert!(json.get("id").is_none());
        assert_eq!(json["form"]["artist_id"], "");
    }

    #[test]
    fn test_genre_choices_fit_column() {
        for genre in GENRE_CHOICES {
            assert!(genre.len() <= fyyur_db::input::MAX_GENRE_LEN);
        }
    }
}
