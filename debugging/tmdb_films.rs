//! Fetch one page's data from TMDB and print the normalized JSON.
//! Usage:
//!   cargo run --bin tmdb_films -- home
//!   cargo run --bin tmdb_films -- list <top-rated-tv|top-rated-movies> [page]
//!   cargo run --bin tmdb_films -- search <query> [page]
//!   cargo run --bin tmdb_films -- movie <tmdb_id>
//!   cargo run --bin tmdb_films -- tv <tmdb_id> [season_number]
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use filmreel::models::MediaType;
use filmreel::pages::{Catalog, CatalogPage, FilmDetailPage, HomePage, SeasonPage};
use filmreel::tmdb::TmdbClient;
use serde::Serialize;
use std::env;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tmdb_films <home | list <kind> [page] | search <query> [page] | movie <id> | tv <id> [season]>";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// TMDB pages start at 1; `0` is bumped up like the HTTP handler does.
fn parse_page(arg: Option<&String>) -> Result<u32> {
    arg.map(|p| p.parse::<u32>().context("page must be a positive integer"))
        .transpose()
        .map(|p| p.unwrap_or(1).max(1))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().ok_or_else(|| anyhow!(USAGE))?;
    let client = TmdbClient::from_env()?;

    match command.as_str() {
        "home" => print_json(&HomePage::load(&client).await)?,
        "list" | "search" => {
            let arg = args.get(1).ok_or_else(|| anyhow!(USAGE))?;
            let catalog = if command == "search" {
                Catalog::parse("search", Some(arg.as_str()))?
            } else {
                arg.parse::<Catalog>()?
            };
            let page = parse_page(args.get(2))?;
            print_json(&CatalogPage::load(&client, &catalog, page).await?)?
        }
        "movie" | "tv" => {
            let media: MediaType = command.parse()?;
            let id: i64 = args
                .get(1)
                .ok_or_else(|| anyhow!(USAGE))?
                .parse()
                .context("tmdb_id must be an integer")?;
            match args.get(2) {
                Some(season) if media == MediaType::Tv => {
                    let season: i64 = season.parse().context("season number must be an integer")?;
                    print_json(&SeasonPage::load(&client, id, season).await?)?
                }
                _ => print_json(&FilmDetailPage::load(&client, media, id).await?)?,
            }
        }
        _ => return Err(anyhow!(USAGE)),
    }

    Ok(())
}
