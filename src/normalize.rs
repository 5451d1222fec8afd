//! Total conversions from TMDB payloads into view models, and the list merge
//! used by the home page carousels.
//!
//! Nothing in here fails: absent fields become empty strings, zero ids or
//! empty collections.

use crate::models::{Cast, Episode, Film, Genre, MediaType, Season, Trailer};
use crate::tmdb::raw::{RawCast, RawEpisode, RawGenre, RawRecord, RawSeason, RawVideo};

/// Output length of [`merge_films`] when the caller has no preference.
pub const DEFAULT_MERGE_LIMIT: usize = 6;

/// Builds the canonical [`Film`] for one raw search/list/detail record.
///
/// `media_type` wins over the record's own `media_type` field; list endpoints
/// such as `/movie/popular` don't embed one, so the caller passes it.
pub fn format_result(raw: RawRecord, media_type: Option<MediaType>) -> Film {
    let title = non_empty(raw.title)
        .or_else(|| non_empty(raw.name))
        .unwrap_or_default();

    let genre_ids = raw
        .genre_ids
        .or_else(|| {
            raw.genres
                .map(|genres| genres.into_iter().filter_map(|g| g.id).collect())
        })
        .unwrap_or_default();

    let seasons = raw
        .seasons
        .map(|seasons| {
            seasons
                .into_iter()
                .map(|season| format_season(season, &title))
                .collect()
        })
        .unwrap_or_default();

    Film {
        id: raw.id.unwrap_or_default(),
        media_type: media_type.unwrap_or_else(|| MediaType::from_raw(raw.media_type.as_deref())),
        title,
        description: raw.overview.unwrap_or_default(),
        poster_path: raw.poster_path.unwrap_or_default(),
        cover_path: raw.backdrop_path.unwrap_or_default(),
        genre_ids,
        seasons,
    }
}

/// Season summary as embedded in a TV detail payload. Episodes are never
/// carried over here; see [`format_season_detail`].
pub fn format_season(raw: RawSeason, film_name: &str) -> Season {
    Season {
        id: raw.id.unwrap_or_default(),
        film_name: film_name.to_string(),
        name: raw.name.unwrap_or_default(),
        season_number: raw.season_number.unwrap_or_default(),
        poster_path: raw.poster_path.unwrap_or_default(),
        episodes: Vec::new(),
        air_date: raw.air_date.unwrap_or_default(),
    }
}

/// Season from the dedicated season endpoint, episodes included.
pub fn format_season_detail(mut raw: RawSeason, film_name: &str) -> Season {
    let episodes = raw
        .episodes
        .take()
        .unwrap_or_default()
        .into_iter()
        .map(format_episode)
        .collect();
    Season {
        episodes,
        ..format_season(raw, film_name)
    }
}

pub fn format_episode(raw: RawEpisode) -> Episode {
    Episode {
        id: raw.id.unwrap_or_default(),
        title: raw.name.unwrap_or_default(),
        overview: raw.overview.unwrap_or_default(),
        air_date: raw.air_date.unwrap_or_default(),
        still_path: raw.still_path.unwrap_or_default(),
        episode_number: raw.episode_number.unwrap_or_default(),
    }
}

pub fn format_cast(raw: RawCast) -> Cast {
    Cast {
        id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        character_name: raw.character.unwrap_or_default(),
        profile_path: raw.profile_path.unwrap_or_default(),
    }
}

pub fn format_genre(raw: RawGenre) -> Genre {
    Genre {
        id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
    }
}

pub fn format_trailer(raw: RawVideo) -> Trailer {
    Trailer {
        id: raw.id.unwrap_or_default(),
        key: raw.key.unwrap_or_default(),
    }
}

/// Keeps the videos the trailer player can embed (YouTube, with a key), in
/// upstream order.
pub fn trailers_from_videos(videos: Vec<RawVideo>) -> Vec<Trailer> {
    videos
        .into_iter()
        .filter(|v| {
            v.site
                .as_deref()
                .is_some_and(|site| site.eq_ignore_ascii_case("YouTube"))
                && v.key.as_deref().is_some_and(|key| !key.is_empty())
        })
        .map(format_trailer)
        .collect()
}

/// Existence guard applied to every candidate before it is merged.
pub fn is_film(candidate: Option<&Film>) -> bool {
    candidate.is_some()
}

/// Interleaves two ranked lists into at most `limit` entries.
///
/// Output slot `i` looks at position `i - 1` of the inputs: odd slots take
/// `tvs[i - 1]`, even slots also take `tvs[i - 1]` but only when
/// `movies[i - 1]` exists. Slot 0 never has a source. Missing positions are
/// skipped, so the result can be shorter than `limit`.
///
/// Existing callers depend on this exact sequence (movies only gate the even
/// slots, they are never emitted).
pub fn merge_films(movies: &[Film], tvs: &[Film], limit: usize) -> Vec<Film> {
    let mut merged = Vec::with_capacity(limit.min(tvs.len()));
    for i in 0..limit {
        let Some(prev) = i.checked_sub(1) else {
            continue;
        };
        let candidate = if i % 2 == 1 {
            tvs.get(prev)
        } else {
            movies.get(prev).and(tvs.get(prev))
        };
        if is_film(candidate) {
            merged.extend(candidate.cloned());
        }
    }
    merged
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
