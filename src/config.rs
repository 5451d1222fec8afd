use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ADDR: &str = "0.0.0.0:3146";

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub language: String,
    pub request_timeout: Duration,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading from any key lookup, so tests
    /// don't have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tmdb_api_key = get("TMDB_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: TMDB_API_KEY"))?;
        let tmdb_base_url = get("TMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let language = get("TMDB_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let timeout_secs = match get("TMDB_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("TMDB_TIMEOUT_SECS is not a number: {v}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let addr = get("FILMREEL_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let listen_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("FILMREEL_ADDR is not a socket address: {addr}"))?;

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url,
            language,
            request_timeout: Duration::from_secs(timeout_secs),
            listen_addr,
        })
    }
}
