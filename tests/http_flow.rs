use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use filmreel::app::{build_router, AppState};
use filmreel::models::{Cast, Episode, Film, FilmPage, Genre, MediaType, Season, Trailer};
use filmreel::pages::HomePage;
use filmreel::tmdb::TmdbApi;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

#[derive(Default)]
struct FakeTmdb {
    fail_in_theaters: bool,
    fail_detail: bool,
    fail_casts: bool,
    no_trailers: bool,
    searches: Mutex<Vec<(String, u32)>>,
}

fn film(id: i64, media_type: MediaType) -> Film {
    Film {
        id,
        media_type,
        title: format!("{media_type} {id}"),
        description: String::new(),
        poster_path: format!("/{id}.jpg"),
        cover_path: String::new(),
        genre_ids: vec![18, 35],
        seasons: vec![],
    }
}

fn films(media_type: MediaType, start: i64, count: i64) -> Vec<Film> {
    (start..start + count).map(|id| film(id, media_type)).collect()
}

#[async_trait::async_trait]
impl TmdbApi for FakeTmdb {
    async fn trendings(&self, media: MediaType) -> anyhow::Result<Vec<Film>> {
        Ok(match media {
            MediaType::Movie => films(media, 1, 10),
            _ => films(media, 100, 10),
        })
    }
    async fn in_theaters(&self) -> anyhow::Result<Vec<Film>> {
        if self.fail_in_theaters {
            anyhow::bail!("upstream timed out");
        }
        Ok(films(MediaType::Movie, 200, 3))
    }
    async fn populars(&self, media: MediaType, page: u32) -> anyhow::Result<Vec<Film>> {
        assert_eq!(page, 1);
        Ok(match media {
            MediaType::Movie => films(media, 300, 20),
            _ => films(media, 400, 20),
        })
    }
    async fn top_rated(&self, media: MediaType, page: u32) -> anyhow::Result<FilmPage> {
        let start = if media == MediaType::Tv { 500 } else { 600 };
        Ok(FilmPage {
            films: films(media, start, 2),
            page: i64::from(page),
            total_pages: 9,
        })
    }
    async fn search(&self, query: &str, page: u32) -> anyhow::Result<FilmPage> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), page));
        Ok(FilmPage {
            films: films(MediaType::Movie, 700, 1),
            page: i64::from(page),
            total_pages: 1,
        })
    }
    async fn film_detail(&self, media: MediaType, id: i64) -> anyhow::Result<Film> {
        if self.fail_detail {
            anyhow::bail!("404 not found");
        }
        Ok(film(id, media))
    }
    async fn casts(&self, _media: MediaType, _id: i64) -> anyhow::Result<Vec<Cast>> {
        if self.fail_casts {
            anyhow::bail!("credits unavailable");
        }
        Ok(vec![Cast {
            id: 1,
            name: "Actor".to_string(),
            character_name: "Hero".to_string(),
            profile_path: String::new(),
        }])
    }
    async fn trailers(&self, _media: MediaType, _id: i64) -> anyhow::Result<Vec<Trailer>> {
        if self.no_trailers {
            return Ok(vec![]);
        }
        Ok(vec![
            Trailer {
                id: "a".to_string(),
                key: "first".to_string(),
            },
            Trailer {
                id: "b".to_string(),
                key: "second".to_string(),
            },
        ])
    }
    async fn recommendations(&self, media: MediaType, _id: i64) -> anyhow::Result<Vec<Film>> {
        Ok(films(media, 800, 2))
    }
    async fn genres(&self, _media: MediaType) -> anyhow::Result<Vec<Genre>> {
        Ok(vec![
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
            Genre {
                id: 18,
                name: "Drama".to_string(),
            },
            Genre {
                id: 99,
                name: "Documentary".to_string(),
            },
        ])
    }
    async fn season(&self, tv_id: i64, season_number: i64) -> anyhow::Result<Season> {
        assert_eq!(tv_id, 1399);
        Ok(Season {
            id: 3624,
            film_name: "Game of Thrones".to_string(),
            name: format!("Season {season_number}"),
            season_number,
            poster_path: "s.jpg".to_string(),
            episodes: vec![Episode {
                id: 63056,
                title: "Winter Is Coming".to_string(),
                overview: "Lord Stark".to_string(),
                air_date: "2011-04-17".to_string(),
                still_path: "e.jpg".to_string(),
                episode_number: 1,
            }],
            air_date: "2011-04-17".to_string(),
        })
    }
}

fn app_with(tmdb: FakeTmdb) -> (Router, Arc<FakeTmdb>) {
    let tmdb = Arc::new(tmdb);
    let router = build_router(AppState { tmdb: tmdb.clone() });
    (router, tmdb)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<Value>) {
    let res = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).ok())
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = app_with(FakeTmdb::default());
    let res = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_merges_trending_and_popular() {
    let (app, _) = app_with(FakeTmdb::default());
    let (status, body) = get(app, "/home").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();

    // merged lists only ever surface shows, one slot short of the limit
    assert_eq!(ids(&body["trendings"]), [100, 101, 102, 103, 104]);
    assert_eq!(ids(&body["populars"]).len(), 19);
    assert_eq!(ids(&body["inTheaters"]), [200, 201, 202]);
    assert_eq!(ids(&body["topRatedTv"]), [500, 501]);
    assert_eq!(ids(&body["topRatedMovie"]), [600, 601]);
    assert_eq!(body["trendings"][0]["mediaType"], "tv");
}

#[tokio::test]
async fn home_keeps_other_slots_when_one_fetch_fails() {
    let tmdb = FakeTmdb {
        fail_in_theaters: true,
        ..FakeTmdb::default()
    };
    let page = HomePage::load(&tmdb).await;
    assert!(page.in_theaters.is_empty());
    assert_eq!(page.trendings.len(), 5);
    assert_eq!(page.top_rated_tv.len(), 2);
}

#[tokio::test]
async fn top_rated_list_passes_page() {
    let (app, _) = app_with(FakeTmdb::default());
    let (status, body) = get(app, "/list/top-rated-tv?page=4").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["title"], "Top Rated TV");
    assert_eq!(body["page"], 4);
    assert_eq!(body["totalPages"], 9);
    assert_eq!(ids(&body["films"]), [500, 501]);
}

#[tokio::test]
async fn search_list_forwards_query() {
    let (app, tmdb) = app_with(FakeTmdb::default());
    let (status, _) = get(app, "/list/search?query=blade%20runner").await;
    assert_eq!(status, StatusCode::OK);
    let searches = tmdb.searches.lock().unwrap();
    assert_eq!(searches.as_slice(), [("blade runner".to_string(), 1)]);
}

#[tokio::test]
async fn bad_list_requests_are_rejected() {
    let (app, _) = app_with(FakeTmdb::default());
    let (status, _) = get(app.clone(), "/list/upcoming").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(app, "/list/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn movie_detail_resolves_genres_and_trailers() {
    let (app, _) = app_with(FakeTmdb::default());
    let (status, body) = get(app, "/movie/550").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["film"]["id"], 550);
    assert_eq!(body["film"]["mediaType"], "movie");
    let genres: Vec<&str> = body["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(genres, ["Drama", "Comedy"]);
    assert_eq!(body["casts"][0]["characterName"], "Hero");
    assert_eq!(
        body["trailers"][0]["thumbnailSrc"],
        "https://img.youtube.com/vi/first/mqdefault.jpg"
    );
    assert_eq!(ids(&body["recommendations"]), [800, 801]);
}

#[tokio::test]
async fn detail_survives_failed_side_fetch() {
    let (app, _) = app_with(FakeTmdb {
        fail_casts: true,
        ..FakeTmdb::default()
    });
    let (status, body) = get(app, "/tv/1399").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["film"]["mediaType"], "tv");
    assert!(body["casts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn detail_failure_is_bad_gateway() {
    let (app, _) = app_with(FakeTmdb {
        fail_detail: true,
        ..FakeTmdb::default()
    });
    let (status, _) = get(app, "/movie/1").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn trailer_returns_first_embed() {
    let (app, _) = app_with(FakeTmdb::default());
    let (status, body) = get(app, "/tv/1399/trailer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.unwrap()["src"],
        "https://www.youtube.com/embed/first?autoplay=0"
    );
}

#[tokio::test]
async fn trailer_is_null_without_videos() {
    let (app, _) = app_with(FakeTmdb {
        no_trailers: true,
        ..FakeTmdb::default()
    });
    let (status, body) = get(app, "/movie/1/trailer").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap()["src"].is_null());
}

#[tokio::test]
async fn season_page_is_display_ready() {
    let (app, _) = app_with(FakeTmdb::default());
    let (status, body) = get(app, "/tv/1399/season/1").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["filmName"], "Game of Thrones");
    assert_eq!(body["year"], 2011);
    assert_eq!(body["episodeCount"], 1);
    assert_eq!(body["episodes"][0]["heading"], "1. Winter Is Coming");
    assert_eq!(body["episodes"][0]["airDate"], "17/4/2011");
    assert_eq!(
        body["episodes"][0]["stillSrc"],
        "https://image.tmdb.org/t/p/original/e.jpg"
    );
}
