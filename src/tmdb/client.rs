use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::raw::{RawCredits, RawGenreList, RawPage, RawRecord, RawSeason, RawVideo};
use super::TmdbApi;
use crate::config::Config;
use crate::models::{Cast, Film, FilmPage, Genre, MediaType, Season, Trailer};
use crate::normalize::{
    format_cast, format_genre, format_result, format_season_detail, trailers_from_videos,
};

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = format!("filmreel/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            api_key: config.tmdb_api_key.clone(),
            language: config.language.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    async fn list(
        &self,
        path: &str,
        page: Option<u32>,
        media: Option<MediaType>,
    ) -> Result<FilmPage> {
        let extra = page.map(|p| format!("page={p}"));
        let raw: RawPage<RawRecord> = self.get_json(path, extra.as_deref()).await?;
        Ok(film_page(raw, media))
    }

    /// GETs `{base}{path}` with credentials and language attached. `extra` is an
    /// already-encoded query string appended as is.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, extra: Option<&str>) -> Result<T> {
        let mut url = format!("{}{path}", self.base_url);
        if let Some(extra) = extra {
            url.push('?');
            url.push_str(extra);
        }
        debug!(path = %path, "TMDB request");
        let res = self
            .client
            .get(&url)
            .query(&[("api_key", &self.api_key), ("language", &self.language)])
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("request to {path} failed"))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}: {}", path, status, text));
        }
        serde_json::from_str(&text).with_context(|| format!("JSON parse failed for {path}"))
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn trendings(&self, media: MediaType) -> Result<Vec<Film>> {
        let path = format!("/trending/{}/week", media_path(media)?);
        Ok(self.list(&path, None, Some(media)).await?.films)
    }

    async fn in_theaters(&self) -> Result<Vec<Film>> {
        Ok(self
            .list("/movie/now_playing", None, Some(MediaType::Movie))
            .await?
            .films)
    }

    async fn populars(&self, media: MediaType, page: u32) -> Result<Vec<Film>> {
        let path = format!("/{}/popular", media_path(media)?);
        Ok(self.list(&path, Some(page), Some(media)).await?.films)
    }

    async fn top_rated(&self, media: MediaType, page: u32) -> Result<FilmPage> {
        let path = format!("/{}/top_rated", media_path(media)?);
        self.list(&path, Some(page), Some(media)).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<FilmPage> {
        let extra = format!("query={}&page={page}", urlencoding::encode(query));
        let raw: RawPage<RawRecord> = self.get_json("/search/multi", Some(&extra)).await?;
        let RawPage {
            results,
            page,
            total_pages,
        } = raw;
        // multi search also returns people
        let results = results
            .into_iter()
            .filter(|r| matches!(r.media_type.as_deref(), Some("movie" | "tv")))
            .collect();
        Ok(film_page(
            RawPage {
                results,
                page,
                total_pages,
            },
            None,
        ))
    }

    async fn film_detail(&self, media: MediaType, id: i64) -> Result<Film> {
        let path = format!("/{}/{id}", media_path(media)?);
        let raw: RawRecord = self.get_json(&path, None).await?;
        Ok(format_result(raw, Some(media)))
    }

    async fn casts(&self, media: MediaType, id: i64) -> Result<Vec<Cast>> {
        let path = format!("/{}/{id}/credits", media_path(media)?);
        let raw: RawCredits = self.get_json(&path, None).await?;
        Ok(raw.cast.into_iter().map(format_cast).collect())
    }

    async fn trailers(&self, media: MediaType, id: i64) -> Result<Vec<Trailer>> {
        let path = format!("/{}/{id}/videos", media_path(media)?);
        let raw: RawPage<RawVideo> = self.get_json(&path, None).await?;
        Ok(trailers_from_videos(raw.results))
    }

    async fn recommendations(&self, media: MediaType, id: i64) -> Result<Vec<Film>> {
        let path = format!("/{}/{id}/recommendations", media_path(media)?);
        Ok(self.list(&path, None, Some(media)).await?.films)
    }

    async fn genres(&self, media: MediaType) -> Result<Vec<Genre>> {
        let path = format!("/genre/{}/list", media_path(media)?);
        let raw: RawGenreList = self.get_json(&path, None).await?;
        Ok(raw.genres.into_iter().map(format_genre).collect())
    }

    async fn season(&self, tv_id: i64, season_number: i64) -> Result<Season> {
        let show_path = format!("/tv/{tv_id}");
        let season_path = format!("/tv/{tv_id}/season/{season_number}");
        let (show, season) = tokio::try_join!(
            self.get_json::<RawRecord>(&show_path, None),
            self.get_json::<RawSeason>(&season_path, None),
        )?;
        let show = format_result(show, Some(MediaType::Tv));
        Ok(format_season_detail(season, &show.title))
    }
}

fn media_path(media: MediaType) -> Result<&'static str> {
    match media {
        MediaType::Movie | MediaType::Tv => Ok(media.as_str()),
        MediaType::Unknown => bail!("media type is required for this TMDB endpoint"),
    }
}

fn film_page(raw: RawPage<RawRecord>, media: Option<MediaType>) -> FilmPage {
    FilmPage {
        films: raw
            .results
            .into_iter()
            .map(|r| format_result(r, media))
            .collect(),
        page: raw.page.unwrap_or(1),
        total_pages: raw.total_pages.unwrap_or(0),
    }
}
