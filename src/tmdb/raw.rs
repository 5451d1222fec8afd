//! Payload shapes as TMDB sends them. Every field is optional so that a record
//! with missing keys (or `null`s) still decodes; `crate::normalize` turns them
//! into the strict view models.
//!
//! Lists are decoded entry by entry: an entry of the wrong shape is dropped
//! and the rest of the list survives.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub media_type: Option<String>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub genre_ids: Option<Vec<i64>>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub genres: Option<Vec<RawGenre>>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub seasons: Option<Vec<RawSeason>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGenre {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSeason {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub season_number: Option<i64>,
    pub air_date: Option<String>,
    /// Only present on the season detail endpoint.
    #[serde(deserialize_with = "lenient_opt_list")]
    pub episodes: Option<Vec<RawEpisode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEpisode {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
    pub episode_number: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCast {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVideo {
    pub id: Option<String>,
    pub key: Option<String>,
    pub site: Option<String>,
    #[serde(rename = "type")]
    pub video_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct RawPage<T> {
    #[serde(default = "Vec::new", deserialize_with = "lenient_list")]
    pub results: Vec<T>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub total_pages: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCredits {
    #[serde(deserialize_with = "lenient_list")]
    pub cast: Vec<RawCast>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawGenreList {
    #[serde(deserialize_with = "lenient_list")]
    pub genres: Vec<RawGenre>,
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient_opt_list(deserializer)?.unwrap_or_default())
}

/// `null` or a non-array value reads as absent.
fn lenient_opt_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(other) => {
            debug!("Ignoring non-list TMDB value: {}", other);
            return Ok(None);
        }
        None => return Ok(None),
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping malformed TMDB entry: {}", e);
                    None
                }
            })
            .collect(),
    ))
}
