use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use pickamovie::{
    api::{create_router, session::SESSION_COOKIE, AppState},
    config::Config,
};

const USER_HEADER: &str = "x-authenticated-user";

fn test_config(tmdb_url: String) -> Config {
    Config {
        tmdb_api_key: "test_key".to_string(),
        tmdb_api_url: tmdb_url,
        database_url: None,
        redis_url: None,
        host: "127.0.0.1".to_string(),
        port: 0,
        session_ttl_secs: 3600,
        movie_cache_ttl_secs: 3600,
        auth_header: USER_HEADER.to_string(),
        secure_cookies: false,
    }
}

/// Fake TMDB knowing movies 1, 2 and 3, all returned by any discover query
async fn mock_tmdb() -> MockServer {
    let tmdb = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 1,
            "results": [{ "id": 1 }, { "id": 2 }, { "id": 3 }]
        })))
        .mount(&tmdb)
        .await;

    for id in 1..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/movie/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "title": format!("Movie {}", id),
                "original_language": "fr"
            })))
            .mount(&tmdb)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/movie/{}/credits", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cast": [
                    { "id": 10, "name": "A", "character": "One" },
                    { "id": 11, "name": "B", "character": "Two" },
                    { "id": 12, "name": "C", "character": "Three" },
                    { "id": 13, "name": "D", "character": "Four" }
                ],
                "crew": [
                    { "id": 20, "name": "Writer", "job": "Screenplay" },
                    { "id": 21, "name": "Boss", "job": "Director" }
                ]
            })))
            .mount(&tmdb)
            .await;
    }

    tmdb
}

async fn create_test_server(tmdb: &MockServer) -> TestServer {
    let (state, _writer) = AppState::from_config(&test_config(tmdb.uri()))
        .await
        .unwrap();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn user(id: i64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(USER_HEADER),
        HeaderValue::from_str(&id.to_string()).unwrap(),
    )
}

fn location(response: &TestResponse) -> String {
    response
        .header(header::LOCATION)
        .to_str()
        .unwrap()
        .to_string()
}

fn movie_id_from(location: &str) -> i64 {
    location.trim_start_matches("/movie/").parse().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
    let request_id = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_search_form_lists_choices() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;

    let response = server.get("/find").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["genres"][0]["value"], "");
    assert!(body["genres"]
        .as_array()
        .unwrap()
        .iter()
        .any(|g| g["value"] == "28" && g["label"] == "Action"));
    assert_eq!(body["ratings"][1]["value"], "9");
    assert!(!response.cookie(SESSION_COOKIE).value().is_empty());
}

#[tokio::test]
async fn test_search_then_walk_the_queue() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;

    let response = server
        .post("/find")
        .form(&[("genre", "28"), ("year_from", "2020"), ("rating", "")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    let cookie = response.cookie(SESSION_COOKIE);

    let mut seen = vec![movie_id_from(&location(&response))];

    let response = server
        .get(&format!("/movie/{}", seen[0]))
        .add_cookie(cookie.clone())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["movie"]["id"], seen[0]);
    assert_eq!(body["cast"].as_array().unwrap().len(), 3);
    assert_eq!(body["director"]["name"], "Boss");
    assert_eq!(body["full_language_name"], "French");
    assert_eq!(body["queued"], 2);

    for _ in 0..2 {
        let response = server.get("/next").add_cookie(cookie.clone()).await;
        response.assert_status(StatusCode::SEE_OTHER);
        seen.push(movie_id_from(&location(&response)));
    }
    seen.sort();
    assert_eq!(seen, vec![1, 2, 3]);

    let response = server.get("/next").add_cookie(cookie.clone()).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/find");
}

#[tokio::test]
async fn test_next_without_search_goes_to_form() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;

    let response = server.get("/next").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/find");
}

#[tokio::test]
async fn test_search_without_results_shows_notice() {
    let tmdb = mock_tmdb().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 0,
            "results": []
        })))
        .with_priority(1)
        .mount(&tmdb)
        .await;
    let server = create_test_server(&tmdb).await;

    let response = server.post("/find").form(&[("genre", "99")]).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["notice"].is_string());
}

#[tokio::test]
async fn test_search_with_invalid_filters() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;

    let response = server
        .post("/find")
        .form(&[("genre", "12345"), ("year_from", "soon")])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["fields"]["genre"].is_array());
    assert!(body["fields"]["year_from"].is_array());
}

#[tokio::test]
async fn test_unknown_movie_is_not_found() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;

    let response = server.get("/movie/424242").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_account_routes_require_identity() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;

    server.get("/profile").await.assert_status(StatusCode::UNAUTHORIZED);
    server
        .post("/list/add")
        .form(&[("movie_id", "1"), ("status", "watch_later")])
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (name, _) = user(1);
    server
        .get("/profile")
        .add_header(name, HeaderValue::from_static("alice"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_lifecycle() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;
    let (name, value) = user(7);

    let response = server
        .post("/list/add")
        .add_header(name.clone(), value.clone())
        .add_header(
            header::REFERER,
            HeaderValue::from_static("http://localhost/movie/2"),
        )
        .form(&[("movie_id", "2"), ("status", "watch_later")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/movie/2");
    let cookie = response.cookie(SESSION_COOKIE);

    // Re-adding only changes the status
    let response = server
        .post("/list/add")
        .add_header(name.clone(), value.clone())
        .form(&[("movie_id", "2"), ("status", "watch_later")])
        .await;
    assert_eq!(location(&response), "/find");

    let response = server
        .get("/profile")
        .add_header(name.clone(), value.clone())
        .add_cookie(cookie.clone())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["watch_later_count"], 1);
    assert_eq!(body["watched_count"], 0);
    assert_eq!(body["messages"][0], "Movie list updated successfully!");
    assert!(body["avatar"].as_str().unwrap().starts_with("avatars/avatar"));
    let entry_id = body["watch_later"][0]["entry"]["id"].as_i64().unwrap();
    assert_eq!(body["watch_later"][0]["movie"]["title"], "Movie 2");

    // Another user can neither see nor touch the entry
    let (_, other) = user(8);
    server
        .post("/list/move-to-watched")
        .add_header(name.clone(), other.clone())
        .form(&[("entry_id", entry_id.to_string())])
        .await
        .assert_status_not_found();
    server
        .get("/my-movie/2")
        .add_header(name.clone(), other)
        .await
        .assert_status_not_found();

    let response = server
        .post("/list/move-to-watched")
        .add_header(name.clone(), value.clone())
        .form(&[("entry_id", entry_id.to_string())])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/my-movie/2");

    let response = server
        .get("/my-movie/2")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["entry"]["status"], "watched");
    assert_eq!(body["status_label"], "Watched");
    assert_eq!(body["director"]["name"], "Boss");

    let response = server
        .post("/list/delete")
        .add_header(name.clone(), value.clone())
        .form(&[("entry_id", entry_id.to_string())])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/profile");
    let cookie = response.cookie(SESSION_COOKIE);

    let body: Value = server
        .get("/profile")
        .add_header(name, value)
        .add_cookie(cookie)
        .await
        .json();
    assert_eq!(body["watched_count"], 0);
    assert_eq!(body["watch_later_count"], 0);
    assert_eq!(body["messages"][0], "Movie list updated successfully!");
}

#[tokio::test]
async fn test_profile_counts_entries_without_details() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;
    let (name, value) = user(11);

    // Movie 500 is unknown to TMDB and answers 404
    for movie_id in ["2", "500"] {
        server
            .post("/list/add")
            .add_header(name.clone(), value.clone())
            .form(&[("movie_id", movie_id), ("status", "watch_later")])
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    let response = server.get("/profile").add_header(name, value).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["watch_later_count"], 2);
    assert_eq!(body["watched_count"], 0);

    let listed = body["watch_later"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["movie"]["id"], 2);
}

#[tokio::test]
async fn test_add_to_list_rejects_bad_status() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;
    let (name, value) = user(3);

    let response = server
        .post("/list/add")
        .add_header(name, value)
        .form(&[("movie_id", "2"), ("status", "someday")])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_account() {
    let tmdb = mock_tmdb().await;
    let server = create_test_server(&tmdb).await;
    let (name, value) = user(9);

    server
        .post("/list/add")
        .add_header(name.clone(), value.clone())
        .form(&[("movie_id", "1"), ("status", "watched")])
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let response = server
        .get("/profile/delete")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["action"], "/profile/delete");

    let response = server
        .post("/profile/delete")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = response.cookie(SESSION_COOKIE);

    let body: Value = server.get("/").add_cookie(cookie).await.json();
    assert_eq!(body["messages"][0], "Your account has been successfully deleted.");

    let body: Value = server
        .get("/profile")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(body["watched_count"], 0);
}
