use std::{collections::HashMap, net::SocketAddr, time::Duration};

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use reelmate::services::{CatalogClient, TmdbClient};

type Params = Query<HashMap<String, String>>;

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("api_key").map(String::as_str) == Some("test-key")
        && params.get("language").map(String::as_str) == Some("en-US")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "status_message": "Invalid API key" })),
    )
        .into_response()
}

async fn genre_list(Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    Json(json!({
        "genres": [
            { "id": 28, "name": "Action" },
            { "id": 18, "name": "Drama" }
        ]
    }))
    .into_response()
}

async fn top_rated(Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    match params.get("page").map(String::as_str) {
        Some("1") => Json(json!({
            "page": 1,
            "results": [
                {
                    "id": 278,
                    "title": "The Shawshank Redemption",
                    "vote_average": 8.7,
                    "vote_count": 26000,
                    "poster_path": "/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
                    "overview": "Imprisoned in the 1940s...",
                    "release_date": "1994-09-23",
                    "genre_ids": [18, 80]
                },
                { "id": 11 }
            ]
        }))
        .into_response(),
        Some("2") => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => Json(json!({ "page": 3 })).into_response(),
    }
}

/// Everything under `/movie/`: the top-rated listing and per-movie lookups
async fn movie_resource(Path(rest): Path<String>, query: Params) -> Response {
    match rest.split_once('/') {
        None if rest == "top_rated" => top_rated(query).await,
        Some((id, "videos")) => match id.parse() {
            Ok(movie_id) => videos(movie_id, query).await,
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        },
        Some((id, "credits")) => match id.parse() {
            Ok(movie_id) => credits(movie_id, query).await,
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        },
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn videos(movie_id: i64, Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    let results = if movie_id == 278 {
        json!([
            { "site": "Vimeo", "type": "Trailer", "key": "vimeo1" },
            { "site": "YouTube", "type": "Teaser", "key": "teaser1" },
            { "site": "YouTube", "type": "Trailer", "key": "PLl99DlL6b4" },
            { "site": "YouTube", "type": "Trailer", "key": "second" }
        ])
    } else {
        json!([])
    };
    Json(json!({ "id": movie_id, "results": results })).into_response()
}

async fn credits(movie_id: i64, Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    match movie_id {
        278 => Json(json!({
            "id": 278,
            "cast": [
                { "name": "Tim Robbins" },
                { "name": "Morgan Freeman" },
                { "name": "Bob Gunton" },
                { "name": "William Sadler" },
                { "name": "Clancy Brown" },
                { "name": "Gil Bellows" }
            ]
        }))
        .into_response(),
        500 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({ "id": movie_id })).into_response(),
    }
}

async fn search(Query(params): Params) -> Response {
    if !authorized(&params) {
        return unauthorized();
    }
    let results = match params.get("query").map(String::as_str) {
        Some("dune part") => json!([
            {
                "id": 693134,
                "title": "Dune: Part Two",
                "vote_average": 8.2,
                "genre_ids": [878, 12]
            }
        ]),
        _ => json!([]),
    };
    Json(json!({ "results": results })).into_response()
}

/// Serves canned TMDB responses under `/3` on an ephemeral port
async fn spawn_fake_tmdb() -> SocketAddr {
    let app = Router::new()
        .route("/3/genre/movie/list", get(genre_list))
        .route("/3/movie/*rest", get(movie_resource))
        .route("/3/search/movie", get(search));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client_with_key(api_key: &str) -> TmdbClient {
    let addr = spawn_fake_tmdb().await;
    TmdbClient::new(
        api_key.to_string(),
        format!("http://{}/3/", addr),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_genres_fetched() {
    let client = client_with_key("test-key").await;
    let genres = client.genres().await;
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[&28], "Action");
    assert_eq!(genres[&18], "Drama");
}

#[tokio::test]
async fn test_top_rated_tolerates_sparse_entries() {
    let client = client_with_key("test-key").await;
    let movies = client.top_rated(1).await;

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "The Shawshank Redemption");
    assert_eq!(movies[0].vote_count, Some(26000));
    assert_eq!(movies[0].genre_ids, vec![18, 80]);
    assert!(movies[0].is_well_rated());

    assert_eq!(movies[1].id, 11);
    assert_eq!(movies[1].vote_average, None);
    assert!(!movies[1].is_well_rated());
}

#[tokio::test]
async fn test_top_rated_malformed_or_missing_results_are_empty() {
    let client = client_with_key("test-key").await;
    assert!(client.top_rated(2).await.is_empty());
    assert!(client.top_rated(3).await.is_empty());
}

#[tokio::test]
async fn test_trailer_is_first_youtube_trailer() {
    let client = client_with_key("test-key").await;
    assert_eq!(
        client.trailer(278).await.as_deref(),
        Some("https://www.youtube.com/embed/PLl99DlL6b4")
    );
    assert_eq!(client.trailer(11).await, None);
}

#[tokio::test]
async fn test_cast_limited_to_five() {
    let client = client_with_key("test-key").await;
    assert_eq!(
        client.cast(278).await,
        "Tim Robbins, Morgan Freeman, Bob Gunton, William Sadler, Clancy Brown"
    );
    assert_eq!(client.cast(11).await, "");
    assert_eq!(client.cast(500).await, "");
}

#[tokio::test]
async fn test_search_passes_query() {
    let client = client_with_key("test-key").await;
    let results = client.search("dune part").await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Dune: Part Two");
    assert_eq!(results[0].poster_path, None);

    assert!(client.search("nothing here").await.is_empty());
}

#[tokio::test]
async fn test_rejected_api_key_degrades_to_empty() {
    let client = client_with_key("wrong-key").await;
    assert!(client.genres().await.is_empty());
    assert!(client.top_rated(1).await.is_empty());
    assert_eq!(client.trailer(278).await, None);
    assert_eq!(client.cast(278).await, "");
}
