use crate::config::Config;
use crate::models::MediaType;
use crate::pages::{self, Catalog, CatalogPage, FilmDetailPage, HomePage, SeasonPage};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// the API is read-only; nothing legitimate sends a body
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<u32>,
    query: Option<String>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    info!(
        "Using TMDB at {} (language {})",
        config.tmdb_base_url, config.language
    );

    let app = build_router(AppState { tmdb });

    info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/home", get(home))
        .route("/list/:kind", get(catalog))
        .route("/movie/:id", get(movie_detail))
        .route("/movie/:id/trailer", get(movie_trailer))
        .route("/tv/:id", get(tv_detail))
        .route("/tv/:id/trailer", get(tv_trailer))
        .route("/tv/:id/season/:season_number", get(season))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home(State(state): State<AppState>) -> Json<HomePage> {
    Json(HomePage::load(state.tmdb.as_ref()).await)
}

async fn catalog(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<CatalogPage>, StatusCode> {
    let catalog = match Catalog::parse(&kind, params.query.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            warn!("Rejecting list request: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let page = params.page.unwrap_or(1).max(1);
    CatalogPage::load(state.tmdb.as_ref(), &catalog, page)
        .await
        .map(Json)
        .map_err(|e| upstream_failure("list", e))
}

async fn movie_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FilmDetailPage>, StatusCode> {
    film_detail(&state, MediaType::Movie, id).await
}

async fn tv_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FilmDetailPage>, StatusCode> {
    film_detail(&state, MediaType::Tv, id).await
}

async fn film_detail(
    state: &AppState,
    media: MediaType,
    id: i64,
) -> Result<Json<FilmDetailPage>, StatusCode> {
    FilmDetailPage::load(state.tmdb.as_ref(), media, id)
        .await
        .map(Json)
        .map_err(|e| upstream_failure("film detail", e))
}

async fn movie_trailer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    trailer(&state, MediaType::Movie, id).await
}

async fn tv_trailer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    trailer(&state, MediaType::Tv, id).await
}

async fn trailer(state: &AppState, media: MediaType, id: i64) -> Result<Json<Value>, StatusCode> {
    let src = pages::play_trailer(state.tmdb.as_ref(), media, id)
        .await
        .map_err(|e| upstream_failure("trailer", e))?;
    Ok(Json(json!({ "src": src })))
}

async fn season(
    State(state): State<AppState>,
    Path((id, season_number)): Path<(i64, i64)>,
) -> Result<Json<SeasonPage>, StatusCode> {
    SeasonPage::load(state.tmdb.as_ref(), id, season_number)
        .await
        .map(Json)
        .map_err(|e| upstream_failure("season", e))
}

fn upstream_failure(what: &str, err: anyhow::Error) -> StatusCode {
    warn!("Failed to load {}: {:#}", what, err);
    StatusCode::BAD_GATEWAY
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
