use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Cast, Film, FilmPage, Genre, MediaType, Season, Trailer};

mod client;
pub mod raw;

pub use client::TmdbClient;

/// Catalog queries the pages need from TMDB, already normalized into view
/// models.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn trendings(&self, media: MediaType) -> Result<Vec<Film>>;
    async fn in_theaters(&self) -> Result<Vec<Film>>;
    async fn populars(&self, media: MediaType, page: u32) -> Result<Vec<Film>>;
    async fn top_rated(&self, media: MediaType, page: u32) -> Result<FilmPage>;
    async fn search(&self, query: &str, page: u32) -> Result<FilmPage>;
    async fn film_detail(&self, media: MediaType, id: i64) -> Result<Film>;
    async fn casts(&self, media: MediaType, id: i64) -> Result<Vec<Cast>>;
    async fn trailers(&self, media: MediaType, id: i64) -> Result<Vec<Trailer>>;
    async fn recommendations(&self, media: MediaType, id: i64) -> Result<Vec<Film>>;
    async fn genres(&self, media: MediaType) -> Result<Vec<Genre>>;
    /// Season of a TV show with its episodes filled in.
    async fn season(&self, tv_id: i64, season_number: i64) -> Result<Season>;
}
