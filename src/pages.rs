//! Page-level controllers. Each page fires its fetches together and drops each
//! result into its own slot; a slot whose fetch fails stays empty and the rest
//! of the page still renders.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;
use tracing::{info, warn};

use crate::models::{Cast, Film, FilmPage, Genre, MediaType, Season, Trailer};
use crate::normalize::{merge_films, DEFAULT_MERGE_LIMIT};
use crate::tmdb::TmdbApi;
use crate::utils::{format_date, release_year, tmdb_image_src, youtube_embed, youtube_thumbnail};

/// The popular carousel shows more entries than the hero slider.
pub const POPULAR_MERGE_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub trendings: Vec<Film>,
    pub in_theaters: Vec<Film>,
    pub populars: Vec<Film>,
    pub top_rated_tv: Vec<Film>,
    pub top_rated_movie: Vec<Film>,
}

impl HomePage {
    pub async fn load(api: &dyn TmdbApi) -> Self {
        let (trendings, in_theaters, populars, top_rated_tv, top_rated_movie) = tokio::join!(
            merged(api, Feed::Trending, DEFAULT_MERGE_LIMIT),
            api.in_theaters(),
            merged(api, Feed::Popular, POPULAR_MERGE_LIMIT),
            api.top_rated(MediaType::Tv, 1),
            api.top_rated(MediaType::Movie, 1),
        );

        let page = Self {
            trendings: slot("trendings", trendings),
            in_theaters: slot("in theaters", in_theaters),
            populars: slot("populars", populars),
            top_rated_tv: slot("top rated tv", top_rated_tv.map(|p| p.films)),
            top_rated_movie: slot("top rated movie", top_rated_movie.map(|p| p.films)),
        };
        info!(
            trendings = page.trendings.len(),
            in_theaters = page.in_theaters.len(),
            populars = page.populars.len(),
            top_rated_tv = page.top_rated_tv.len(),
            top_rated_movie = page.top_rated_movie.len(),
            "Home page loaded"
        );
        page
    }
}

#[derive(Debug, Clone, Copy)]
enum Feed {
    Trending,
    Popular,
}

/// Movies first, then shows, then [`merge_films`].
async fn merged(api: &dyn TmdbApi, feed: Feed, limit: usize) -> Result<Vec<Film>> {
    let (movies, tvs) = match feed {
        Feed::Trending => (
            api.trendings(MediaType::Movie).await?,
            api.trendings(MediaType::Tv).await?,
        ),
        Feed::Popular => (
            api.populars(MediaType::Movie, 1).await?,
            api.populars(MediaType::Tv, 1).await?,
        ),
    };
    Ok(merge_films(&movies, &tvs, limit))
}

fn slot<T: Default>(name: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(slot = name, "Fetch failed, leaving slot empty: {:#}", e);
            T::default()
        }
    }
}

/// Listing behind `/list/{kind}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Catalog {
    TopRatedTv,
    TopRatedMovies,
    Search(String),
}

impl Catalog {
    /// `query` is only read for `search`, where it must be non-blank.
    pub fn parse(kind: &str, query: Option<&str>) -> Result<Self> {
        match kind {
            "search" => query
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(|q| Catalog::Search(q.to_string()))
                .ok_or_else(|| anyhow!("search needs a non-empty query")),
            other => other.parse(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Catalog::TopRatedTv => "Top Rated TV".to_string(),
            Catalog::TopRatedMovies => "Top Rated Movies".to_string(),
            Catalog::Search(q) => format!("Search results for \"{q}\""),
        }
    }
}

impl FromStr for Catalog {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top-rated-tv" => Ok(Catalog::TopRatedTv),
            "top-rated-movies" => Ok(Catalog::TopRatedMovies),
            _ => Err(anyhow!("unknown catalog '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub title: String,
    #[serde(flatten)]
    pub listing: FilmPage,
}

impl CatalogPage {
    pub async fn load(api: &dyn TmdbApi, catalog: &Catalog, page: u32) -> Result<Self> {
        let listing = match catalog {
            Catalog::TopRatedTv => api.top_rated(MediaType::Tv, page).await?,
            Catalog::TopRatedMovies => api.top_rated(MediaType::Movie, page).await?,
            Catalog::Search(query) => api.search(query, page).await?,
        };
        Ok(Self {
            title: catalog.title(),
            listing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerCard {
    pub id: String,
    pub key: String,
    pub thumbnail_src: String,
    pub embed_src: String,
}

impl From<Trailer> for TrailerCard {
    fn from(trailer: Trailer) -> Self {
        Self {
            thumbnail_src: youtube_thumbnail(&trailer.key),
            embed_src: youtube_embed(&trailer.key),
            id: trailer.id,
            key: trailer.key,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmDetailPage {
    pub film: Film,
    /// Names for the film's genre ids, in the film's order.
    pub genres: Vec<Genre>,
    pub casts: Vec<Cast>,
    pub trailers: Vec<TrailerCard>,
    pub recommendations: Vec<Film>,
}

impl FilmDetailPage {
    /// Only the film itself is required; the other sections fall back to empty.
    pub async fn load(api: &dyn TmdbApi, media: MediaType, id: i64) -> Result<Self> {
        let (film, genres, casts, trailers, recommendations) = tokio::join!(
            api.film_detail(media, id),
            api.genres(media),
            api.casts(media, id),
            api.trailers(media, id),
            api.recommendations(media, id),
        );
        let film = film?;

        let all_genres = slot("genres", genres);
        let genres = film
            .genre_ids
            .iter()
            .filter_map(|gid| all_genres.iter().find(|g| g.id == *gid).cloned())
            .collect();

        Ok(Self {
            genres,
            casts: slot("casts", casts),
            trailers: slot("trailers", trailers)
                .into_iter()
                .map(TrailerCard::from)
                .collect(),
            recommendations: slot("recommendations", recommendations),
            film,
        })
    }
}

/// Embed URL of the first trailer, `None` when the film has none.
pub async fn play_trailer(api: &dyn TmdbApi, media: MediaType, id: i64) -> Result<Option<String>> {
    let trailers = api.trailers(media, id).await?;
    Ok(trailers.first().map(|t| youtube_embed(&t.key)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRow {
    pub id: i64,
    pub episode_number: i64,
    pub heading: String,
    pub overview: String,
    pub still_src: String,
    pub air_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPage {
    pub film_name: String,
    pub name: String,
    pub season_number: i64,
    pub poster_src: String,
    pub year: Option<i32>,
    pub episode_count: usize,
    pub episodes: Vec<EpisodeRow>,
}

impl SeasonPage {
    pub async fn load(api: &dyn TmdbApi, tv_id: i64, season_number: i64) -> Result<Self> {
        let season = api.season(tv_id, season_number).await?;
        Ok(Self::from(season))
    }
}

impl From<Season> for SeasonPage {
    fn from(season: Season) -> Self {
        let episodes: Vec<EpisodeRow> = season
            .episodes
            .into_iter()
            .map(|e| EpisodeRow {
                heading: format!("{}. {}", e.episode_number, e.title),
                still_src: tmdb_image_src(&e.still_path),
                air_date: format_date(&e.air_date),
                id: e.id,
                episode_number: e.episode_number,
                overview: e.overview,
            })
            .collect();
        Self {
            year: release_year(&season.air_date),
            poster_src: tmdb_image_src(&season.poster_path),
            episode_count: episodes.len(),
            film_name: season.film_name,
            name: season.name,
            season_number: season.season_number,
            episodes,
        }
    }
}
