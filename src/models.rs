use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of catalog entry. TMDB names the two kinds `movie` and `tv` in both
/// its URL paths and its `media_type` payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    /// Neither an override nor the payload named a known type.
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Unknown => "",
        }
    }

    /// Lenient lookup used on raw payload values; anything unrecognised maps
    /// to `Unknown` instead of failing.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            _ => Err(anyhow::anyhow!("media type must be 'movie' or 'tv'")),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub air_date: String,
    pub still_path: String,
    pub episode_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: i64,
    pub film_name: String,
    pub name: String,
    pub season_number: i64,
    pub poster_path: String,
    /// Empty until the season detail is fetched on its own.
    pub episodes: Vec<Episode>,
    pub air_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub description: String,
    pub poster_path: String,
    pub cover_path: String,
    pub genre_ids: Vec<i64>,
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cast {
    pub id: i64,
    pub name: String,
    pub character_name: String,
    pub profile_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    pub id: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// One page of a paged catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmPage {
    pub films: Vec<Film>,
    pub page: i64,
    pub total_pages: i64,
}
