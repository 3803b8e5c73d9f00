//! TMDB client tests
//!
//! Fetch helper errors, list queries, search and certification lookups
//! against a mocked upstream.

use chrono::NaiveDate;
use mockito::{Matcher, Server};
use serde_json::json;

use huuqo::api::{GenreCache, TmdbClient, TmdbError};
use huuqo::models::{ContentKind, Genre};

fn page(results: serde_json::Value, total_pages: u32) -> String {
    json!({
        "page": 1,
        "results": results,
        "total_pages": total_pages,
        "total_results": 0
    })
    .to_string()
}

fn genres() -> GenreCache {
    GenreCache::preloaded(
        vec![
            Genre::new(28, "Action"),
            Genre::new(18, "Drama"),
            Genre::new(53, "Thriller"),
            Genre::new(80, "Crime"),
        ],
        vec![Genre::new(10765, "Sci-Fi & Fantasy")],
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// Fetch Helper
// =============================================================================

#[tokio::test]
async fn test_non_200_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/trending/movie/day")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"status_message": "Invalid API key"}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("bad_key", server.url());
    let err = client
        .trending(ContentKind::Movie, false, 20)
        .await
        .unwrap_err();
    assert!(matches!(err, TmdbError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_wrong_shape_is_decoding_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/trending/tv/day")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page": 1, "items": []}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client
        .trending(ContentKind::Series, false, 20)
        .await
        .unwrap_err();
    assert!(matches!(err, TmdbError::Decoding(_)));
}

#[tokio::test]
async fn test_bad_base_url_is_invalid_url() {
    let client = TmdbClient::with_base_url("test_key", "not a url");
    let err = client.popular(ContentKind::Movie).await.unwrap_err();
    assert!(matches!(err, TmdbError::InvalidUrl(_)));
    assert!(!err.to_string().contains("test_key"));
}

#[tokio::test]
async fn test_api_key_sent_as_query_parameter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/trending/movie/day")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), "test_key".into()),
            Matcher::UrlEncoded("language".into(), "en-US".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([]), 1))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let items = client
        .trending(ContentKind::Movie, false, 20)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(items.is_empty());
}

// =============================================================================
// Trending / Popular
// =============================================================================

#[tokio::test]
async fn test_trending_normalizes_and_limits() {
    let mut server = Server::new_async().await;
    let results: Vec<serde_json::Value> = (1..=25)
        .map(|id| json!({"id": id, "title": format!("Movie {id}"), "genre_ids": [18, 28]}))
        .collect();
    let _mock = server
        .mock("GET", "/trending/movie/day")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!(results), 1))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url()).with_genres(genres());
    let items = client
        .trending(ContentKind::Movie, false, 20)
        .await
        .unwrap();

    assert_eq!(items.len(), 20);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].title, "Movie 1");
    assert_eq!(items[0].kind, ContentKind::Movie);
    assert_eq!(items[0].subtitle, "Drama");
    assert!(items[0].logo_path.is_none());
}

#[tokio::test]
async fn test_trending_by_genre_enriches_only_the_limit() {
    let mut server = Server::new_async().await;
    let results: Vec<serde_json::Value> = (1..=25)
        .map(|id| json!({"id": id, "title": format!("Movie {id}"), "genre_ids": [28]}))
        .collect();
    let trending = server
        .mock("GET", "/trending/movie/day")
        .match_query(Matcher::UrlEncoded("with_genres".into(), "28".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!(results), 1))
        .expect(1)
        .create_async()
        .await;
    let images = server
        .mock("GET", Matcher::Regex(r"^/movie/\d+/images$".into()))
        .match_query(Matcher::UrlEncoded("include_image_language".into(), "en".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"logos": [{"aspect_ratio": 2.0, "file_path": "/logo.png", "height": 100, "width": 200, "vote_average": 5.0, "vote_count": 1, "iso_639_1": "en"}]}"#)
        .expect(3)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url()).with_genres(genres());
    let items = client
        .trending_by_genre(ContentKind::Movie, 28, 3)
        .await
        .unwrap();

    trending.assert_async().await;
    images.assert_async().await;
    let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(items.iter().all(|i| i.logo_path.as_deref() == Some("/logo.png")));
}

#[tokio::test]
async fn test_popular_prefers_regional_list() {
    let mut server = Server::new_async().await;
    let regional = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::UrlEncoded("region".into(), "US".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([{"id": 1, "title": "Regional"}]), 1))
        .expect(1)
        .create_async()
        .await;
    let unscoped = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Exact(
            "api_key=test_key&language=en-US&page=1".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([{"id": 2, "title": "Anywhere"}]), 1))
        .expect(0)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let items = client.popular(ContentKind::Movie).await.unwrap();

    regional.assert_async().await;
    unscoped.assert_async().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Regional");
}

#[tokio::test]
async fn test_popular_falls_back_when_region_is_empty() {
    let mut server = Server::new_async().await;
    let regional = server
        .mock("GET", "/tv/popular")
        .match_query(Matcher::UrlEncoded("region".into(), "US".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([]), 0))
        .expect(1)
        .create_async()
        .await;
    let results: Vec<serde_json::Value> = (1..=20)
        .map(|id| json!({"id": id, "name": format!("Show {id}")}))
        .collect();
    let unscoped = server
        .mock("GET", "/tv/popular")
        .match_query(Matcher::Exact(
            "api_key=test_key&language=en-US&page=1".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!(results), 1))
        .expect(1)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let items = client.popular(ContentKind::Series).await.unwrap();

    regional.assert_async().await;
    unscoped.assert_async().await;
    assert_eq!(items.len(), 15);
    assert!(items.iter().all(|i| i.kind == ContentKind::Series));
}

// =============================================================================
// Upcoming
// =============================================================================

#[tokio::test]
async fn test_upcoming_movies_filter_and_order() {
    let mut server = Server::new_async().await;
    let body = page(
        json!([
            {"id": 1, "title": "Today", "poster_path": "/1.jpg", "release_date": "2025-03-07"},
            {"id": 2, "title": "No Poster", "poster_path": null, "release_date": "2025-03-08"},
            {"id": 3, "title": "Later", "poster_path": "/3.jpg", "release_date": "2025-03-20"},
            {"id": 4, "title": "Already Out", "poster_path": "/4.jpg", "release_date": "2025-03-01"},
            {"id": 5, "title": "Soon", "poster_path": "/5.jpg", "release_date": "2025-03-10"},
            {"id": 6, "title": "Undated", "poster_path": "/6.jpg", "release_date": ""}
        ]),
        1,
    );
    let _mock = server
        .mock("GET", "/movie/upcoming")
        .match_query(Matcher::UrlEncoded("region".into(), "US".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let items = client.upcoming_movies_on(date(2025, 3, 7)).await.unwrap();

    let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 5, 3]);
    assert_eq!(items[0].subtitle, "Available Today");
    assert_eq!(items[1].subtitle, "Available soon\nMarch 10, 2025");
    assert_eq!(items[2].subtitle, "Available soon\nMarch 20, 2025");
}

#[tokio::test]
async fn test_upcoming_movies_fall_back_when_region_is_empty() {
    let mut server = Server::new_async().await;
    let regional = server
        .mock("GET", "/movie/upcoming")
        .match_query(Matcher::UrlEncoded("region".into(), "US".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([]), 0))
        .expect(1)
        .create_async()
        .await;
    let unscoped = server
        .mock("GET", "/movie/upcoming")
        .match_query(Matcher::Exact("api_key=test_key&language=en-US".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(
            json!([
                {"id": 9, "title": "Elsewhere", "poster_path": "/9.jpg", "release_date": "2025-03-09"},
                {"id": 10, "title": "Last Year", "poster_path": "/10.jpg", "release_date": "2024-03-09"}
            ]),
            1,
        ))
        .expect(1)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let items = client.upcoming_movies_on(date(2025, 3, 7)).await.unwrap();

    regional.assert_async().await;
    unscoped.assert_async().await;
    let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![9]);
    assert_eq!(items[0].subtitle, "Available soon\nMarch 9, 2025");
}

#[tokio::test]
async fn test_upcoming_series_window() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/discover/tv")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sort_by".into(), "first_air_date.asc".into()),
            Matcher::UrlEncoded("air_date.gte".into(), "2025-03-07".into()),
            Matcher::UrlEncoded("air_date.lte".into(), "2025-09-07".into()),
            Matcher::UrlEncoded("first_air_date.gte".into(), "2025-03-07".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(
            json!([
                {"id": 10, "name": "Late", "poster_path": "/a.jpg", "first_air_date": "2025-04-01"},
                {"id": 11, "name": "No Poster", "first_air_date": "2025-03-09"},
                {"id": 12, "name": "Tonight", "poster_path": "/b.jpg", "first_air_date": "2025-03-07"}
            ]),
            1,
        ))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let items = client.upcoming_series_on(date(2025, 3, 7)).await.unwrap();

    mock.assert_async().await;
    let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![10, 12]);
    assert_eq!(items[0].subtitle, "Premiering on\nApril 1, 2025");
    assert_eq!(items[1].subtitle, "Premiering Today");
}

// =============================================================================
// Discover
// =============================================================================

#[tokio::test]
async fn test_movie_provider_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("with_watch_providers".into(), "8".into()),
            Matcher::UrlEncoded("watch_region".into(), "NL".into()),
            Matcher::UrlEncoded("with_watch_providers.operator".into(), "OR".into()),
            Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded(
                "with_watch_monetization_types".into(),
                "flatrate|free|ads".into(),
            ),
            Matcher::UrlEncoded("vote_count.gte".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(
            json!([{"id": 1, "title": "Heat", "genre_ids": [80, 28, 18, 53]}]),
            3,
        ))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url()).with_genres(genres());
    let items = client
        .by_provider(ContentKind::Movie, 8, "NL", 2)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(items[0].subtitle, "Crime, Action, Drama");
}

#[tokio::test]
async fn test_series_provider_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/discover/tv")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("with_watch_providers".into(), "337".into()),
            Matcher::UrlEncoded("with_watch_providers.operator".into(), "AND".into()),
            Matcher::UrlEncoded("with_watch_monetization_types".into(), "flatrate".into()),
            Matcher::UrlEncoded("vote_count.gte".into(), "50".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(
            json!([{"id": 1, "name": "Andor", "genre_ids": [10765, 18]}]),
            1,
        ))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url()).with_genres(genres());
    let items = client
        .by_provider(ContentKind::Series, 337, "US", 1)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(items[0].subtitle, "Sci-Fi & Fantasy");
}

#[tokio::test]
async fn test_by_genre_uses_major_providers() {
    let mut server = Server::new_async().await;
    let results: Vec<serde_json::Value> = (1..=30)
        .map(|id| json!({"id": id, "title": "x", "genre_ids": [28]}))
        .collect();
    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("with_genres".into(), "28".into()),
            Matcher::UrlEncoded("with_watch_providers".into(), "8|337|350|9|15|1899".into()),
            Matcher::UrlEncoded("with_watch_monetization_types".into(), "flatrate".into()),
            Matcher::UrlEncoded("watch_region".into(), "US".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!(results), 2))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url()).with_genres(genres());
    let items = client.by_genre(28, ContentKind::Movie).await.unwrap();

    mock.assert_async().await;
    assert_eq!(items.len(), 20);
    assert_eq!(items[0].subtitle, "Action");
}

#[tokio::test]
async fn test_family_excludes_adult() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("with_genres".into(), "10751".into()),
            Matcher::UrlEncoded("include_adult".into(), "false".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([{"id": 1, "title": "Paddington"}]), 1))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let items = client.family().await.unwrap();

    mock.assert_async().await;
    assert_eq!(items[0].title, "Paddington");
}

#[tokio::test]
async fn test_recommended_is_open_ended() {
    let mut server = Server::new_async().await;
    let _first = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("vote_count.gte".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(
            json!([{"id": 1, "title": "Heat", "genre_ids": [80, 28, 18]}]),
            1000,
        ))
        .create_async()
        .await;
    let _second = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("vote_count.gte".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([]), 1000))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url()).with_genres(genres());

    let first = client.recommended(ContentKind::Movie, 1).await.unwrap();
    assert_eq!(first.total_pages, None);
    assert!(first.has_more());
    assert_eq!(first.items[0].subtitle, "Crime, Action");

    let second = client.recommended(ContentKind::Movie, 2).await.unwrap();
    assert!(!second.has_more());
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_reports_total_pages() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "the batman".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("include_adult".into(), "false".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([{"id": 414906, "title": "The Batman"}]), 5))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client
        .search(ContentKind::Movie, "the batman", 1)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.total_pages, Some(5));
    assert_eq!(result.items[0].id, 414906);
    assert!(result.has_more());
}

#[tokio::test]
async fn test_empty_search_lists_popular() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/search/tv")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let popular = server
        .mock("GET", "/tv/popular")
        .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(json!([{"id": 1399, "name": "Game of Thrones"}]), 500))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client.search(ContentKind::Series, "", 3).await.unwrap();

    search.assert_async().await;
    popular.assert_async().await;
    assert_eq!(result.page, 3);
    assert_eq!(result.items[0].title, "Game of Thrones");
}

#[tokio::test]
async fn test_search_multi_drops_people() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::UrlEncoded("query".into(), "nolan".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(
            json!([
                {"id": 1, "media_type": "movie", "title": "Inception"},
                {"id": 2, "media_type": "person", "name": "Christopher Nolan"},
                {"id": 3, "media_type": "tv", "name": "Nolan Show"}
            ]),
            1,
        ))
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let items = client.search_multi("nolan").await.unwrap();

    let kinds: Vec<ContentKind> = items.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![ContentKind::Movie, ContentKind::Series]);
}

// =============================================================================
// Certification
// =============================================================================

#[tokio::test]
async fn test_movie_certification_for_region() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/414906/release_dates")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": 414906,
                "results": [
                    {"iso_3166_1": "GB", "release_dates": [{"certification": "15", "type": 3}]},
                    {"iso_3166_1": "US", "release_dates": [
                        {"certification": "", "type": 1},
                        {"certification": "PG-13", "type": 3}
                    ]}
                ]
            }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let rating = client.certification(414906, ContentKind::Movie).await;
    assert_eq!(rating.as_deref(), Some("PG-13"));
}

#[tokio::test]
async fn test_series_rating_for_region() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/tv/1396/content_ratings")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"results": [
                {"iso_3166_1": "DE", "rating": "16"},
                {"iso_3166_1": "US", "rating": "TV-MA"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let rating = client.certification(1396, ContentKind::Series).await;
    assert_eq!(rating.as_deref(), Some("TV-MA"));
}

#[tokio::test]
async fn test_certification_failures_are_absent() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/movie/1/release_dates")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;
    let _garbled = server
        .mock("GET", "/tv/2/content_ratings")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results": "nope"}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.certification(1, ContentKind::Movie).await.is_none());
    assert!(client.certification(2, ContentKind::Series).await.is_none());
}
