use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::RawQuery,
    http::{Request, StatusCode, header},
    routing::get,
};
use bookshelf::app::App;
use bookshelf::config;
use bookshelf::db::Database;
use bookshelf::error::StoreError;
use bookshelf::handler::AppState;
use bookshelf::kv::KeyValueStore;
use bookshelf::model::{BookRecord, FavoriteId, UNTITLED};
use bookshelf::router;
use bookshelf::search::{SearchClient, Volume, normalize};
use bookshelf::store::{FavoritesRepository, LocalFavorites, RemoteFavorites};
use bookshelf::theme::ThemeStore;
use tempfile::TempDir;
use tower::ServiceExt;

type Seen = Arc<Mutex<Vec<String>>>;

async fn spawn_catalog() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let body = serde_json::json!({
        "items": [{ "volumeInfo": { "title": "Dune", "authors": ["Frank Herbert"] } }]
    })
    .to_string();
    let app = Router::new().route(
        "/volumes",
        get(move |RawQuery(q): RawQuery| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                recorder.lock().unwrap().push(q.unwrap_or_default());
                body
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{}/volumes", addr), seen)
}

fn search_client(endpoint: &str) -> SearchClient {
    SearchClient::new(&config::Search {
        endpoint: endpoint.to_string(),
        ..Default::default()
    })
    .unwrap()
}

struct Harness {
    state: AppState,
    seen: Seen,
    _dir: TempDir,
}

async fn local_harness() -> Harness {
    let (endpoint, seen) = spawn_catalog().await;
    let dir = TempDir::new().unwrap();
    let kv = Arc::new(KeyValueStore::new(dir.path().join("store.json")));
    let app = App::new(
        search_client(&endpoint),
        Arc::new(LocalFavorites::new(kv.clone())),
        ThemeStore::new(kv),
    );
    app.startup().await;

    Harness {
        state: AppState {
            db: Arc::new(Database::open(":memory:").await.unwrap()),
            app: Arc::new(app),
        },
        seen,
        _dir: dir,
    }
}

/// Serves the full router on an ephemeral port with server-mode favorites
/// pointing back at its own `/api/favorites`.
async fn spawn_server_mode() -> (String, Harness) {
    let (endpoint, seen) = spawn_catalog().await;
    let dir = TempDir::new().unwrap();
    let kv = Arc::new(KeyValueStore::new(dir.path().join("store.json")));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let remote =
        RemoteFavorites::new(&format!("{}/api/favorites", base), Duration::from_secs(5)).unwrap();

    let app = App::new(search_client(&endpoint), Arc::new(remote), ThemeStore::new(kv));
    let state = AppState {
        db: Arc::new(Database::open(":memory:").await.unwrap()),
        app: Arc::new(app),
    };
    let served = router(state.clone());
    tokio::spawn(async move { axum::serve(listener, served).await.unwrap() });

    (
        base,
        Harness {
            state,
            seen,
            _dir: dir,
        },
    )
}

async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_api_create_list_delete() {
    let h = local_harness().await;

    let (status, _, body) = send(
        &h.state,
        json_request(
            "POST",
            "/api/favorites",
            serde_json::json!({ "title": "Dune", "author": "Frank Herbert" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(created["data"]["title"], "Dune");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _, body) = send(&h.state, get_request("/api/favorites")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["author"], "Frank Herbert");

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/favorites/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&h.state, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let again = Request::builder()
        .method("DELETE")
        .uri(format!("/api/favorites/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&h.state, again).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, _, body) = send(&h.state, get_request("/api/favorites")).await;
    let listed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_api_rejects_bad_input() {
    let h = local_harness().await;

    let (status, _, body) = send(
        &h.state,
        json_request("POST", "/api/favorites", serde_json::json!({ "author": "Anon" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("title is required"));

    let (status, _, body) = send(
        &h.state,
        json_request("POST", "/api/favorites", serde_json::json!({ "title": "Beowulf" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains("\"author\":\"Unknown\""));

    let delete = Request::builder()
        .method("DELETE")
        .uri("/api/favorites/not-a-number")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&h.state, delete).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remote_store_against_endpoint() {
    let (base, _h) = spawn_server_mode().await;
    let remote =
        RemoteFavorites::new(&format!("{}/api/favorites", base), Duration::from_secs(5)).unwrap();

    let dune = remote.add(BookRecord::new("Dune", "Frank Herbert")).await.unwrap();
    let emma = remote.add(BookRecord::new("Emma", "Jane Austen")).await.unwrap();
    assert_eq!(remote.list().await.unwrap().len(), 2);

    remote.remove(&dune).await.unwrap();
    let listed = remote.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, emma);
    assert_eq!(listed[0].record, BookRecord::new("Emma", "Jane Austen"));

    assert!(matches!(remote.remove(&dune).await, Err(StoreError::NotFound(_))));
    assert!(matches!(
        remote.remove(&FavoriteId::from("nope")).await,
        Err(StoreError::Status(_))
    ));
}

#[tokio::test]
async fn test_server_mode_round_trips_records_unchanged() {
    let (base, _h) = spawn_server_mode().await;
    let remote =
        RemoteFavorites::new(&format!("{}/api/favorites", base), Duration::from_secs(5)).unwrap();

    let padded = BookRecord::new("  Dune ", "Frank Herbert ");
    let id = remote.add(padded.clone()).await.unwrap();

    let listed = remote.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].record, padded);
}

#[tokio::test]
async fn test_server_mode_accepts_blank_title_results() {
    let (_base, h) = spawn_server_mode().await;
    let volume: Volume =
        serde_json::from_value(serde_json::json!({ "volumeInfo": { "title": "", "authors": ["X"] } }))
            .unwrap();
    let record = normalize(volume);
    assert_eq!(record, BookRecord::new(UNTITLED, "X"));

    let after_add = h.state.app.add_favorite(record.clone()).await.unwrap();
    assert_eq!(after_add.len(), 1);
    assert_eq!(after_add[0].record, record);
}

#[tokio::test]
async fn test_server_mode_add_then_remove() {
    let (_base, h) = spawn_server_mode().await;
    let app = &h.state.app;

    let records = app.search("Dune").await;
    assert_eq!(records, vec![BookRecord::new("Dune", "Frank Herbert")]);

    let after_add = app.add_favorite(records[0].clone()).await.unwrap();
    assert_eq!(after_add.len(), 1);
    assert_eq!(after_add[0].record, records[0]);

    let after_remove = app.remove_favorite(&after_add[0].id).await.unwrap();
    assert!(after_remove.is_empty());
}

#[tokio::test]
async fn test_search_add_and_theme_through_pages() {
    let h = local_harness().await;

    let (status, _, body) = send(&h.state, get_request("/?q=Dune")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<strong>Dune</strong> by Frank Herbert"));
    assert_eq!(*h.seen.lock().unwrap(), vec!["q=Dune&maxResults=10".to_string()]);

    let (status, headers, _) = send(
        &h.state,
        form_request("/favorites", "title=Dune&author=Frank+Herbert&q=Dune"),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/?q=Dune");

    let (_, _, body) = send(&h.state, get_request("/")).await;
    assert!(body.contains("<li>Dune by Frank Herbert"));
    assert!(body.contains("<body>"));

    let favorites = h.state.app.favorites().await;
    assert_eq!(favorites.len(), 1);

    let (status, headers, _) = send(&h.state, form_request("/theme", "q=")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");
    let (_, _, body) = send(&h.state, get_request("/")).await;
    assert!(body.contains("<body class=\"dark\">"));

    let remove_uri = format!("/favorites/{}/remove", favorites[0].id);
    let (status, _, _) = send(&h.state, form_request(&remove_uri, "q=Dune")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(h.state.app.favorites().await.is_empty());
}

#[tokio::test]
async fn test_empty_query_issues_no_request() {
    let h = local_harness().await;

    let (status, _, body) = send(&h.state, get_request("/?q=%20%20")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<div id=\"search-results\">\n</div>"));
    assert!(h.seen.lock().unwrap().is_empty());
    assert!(h.state.app.favorites().await.is_empty());
}

#[tokio::test]
async fn test_add_without_title_is_rejected() {
    let h = local_harness().await;

    let (status, _, _) = send(&h.state, form_request("/favorites", "author=Anon")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.state.app.favorites().await.is_empty());
}

#[tokio::test]
async fn test_healthcheck_and_assets() {
    let h = local_harness().await;

    let (status, _, body) = send(&h.state, get_request("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"ok"}"#);

    let (status, headers, body) = send(&h.state, get_request("/style.css")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/css");
    assert!(body.contains("body.dark"));

    let (status, _, _) = send(&h.state, get_request("/missing.js")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
