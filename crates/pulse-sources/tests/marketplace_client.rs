//! Integration tests for `MarketplaceClient` using wiremock.

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pulse_core::{ReviewSource, ReviewWindow};
use pulse_sources::{MarketplaceClient, SourceAdapter, SourceError};

fn test_client(base_url: &str) -> MarketplaceClient {
    MarketplaceClient::new(base_url, "in.indwealth", "en", "in", 200, 5, "pulse-test/0.1")
        .expect("failed to build test MarketplaceClient")
}

fn window() -> ReviewWindow {
    ReviewWindow::trailing_days(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(), 84)
}

#[tokio::test]
async fn fetch_sends_listing_query_and_normalizes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps/in.indwealth/reviews"))
        .and(query_param("lang", "en"))
        .and(query_param("country", "in"))
        .and(query_param("sort", "newest"))
        .and(query_param("num", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": "gp-1",
                    "userName": "Anil",
                    "userImage": "https://img.example/a.png",
                    "date": "2025-05-20T10:00:00.000Z",
                    "score": 2,
                    "title": null,
                    "text": "KYC keeps failing",
                    "url": "https://play.example/r/gp-1",
                    "version": "9.0.1"
                },
                {
                    "id": "gp-2",
                    "userName": "Blank",
                    "date": "2025-05-19T10:00:00.000Z",
                    "score": 5,
                    "text": ""
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reviews = test_client(&server.uri())
        .fetch(&window())
        .await
        .expect("fetch should succeed");

    assert_eq!(reviews.len(), 1, "empty-text review is skipped");
    let review = &reviews[0];
    assert_eq!(review.id, "gp-1");
    assert_eq!(review.user_image.as_deref(), Some("https://img.example/a.png"));
    assert_eq!(review.score, 2);
    assert_eq!(review.title, None);
    assert_eq!(review.source, ReviewSource::Marketplace);
    assert_eq!(review.date, Utc.with_ymd_and_hms(2025, 5, 20, 10, 0, 0).unwrap());
}

#[tokio::test]
async fn missing_data_key_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps/in.indwealth/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let reviews = test_client(&server.uri())
        .fetch(&window())
        .await
        .expect("fetch should succeed");
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn server_error_propagates_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps/in.indwealth/reviews"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch(&window())
        .await
        .expect_err("502 must fail");
    assert!(
        matches!(err, SourceError::UnexpectedStatus { status: 502, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn malformed_record_keeps_the_rest_of_the_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps/in.indwealth/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "gp-1", "date": "2025-05-20T10:00:00Z", "score": 1, "text": "Refund never came"},
                {"id": "gp-2", "date": null, "score": 3, "text": "no date"}
            ]
        })))
        .mount(&server)
        .await;

    let reviews = test_client(&server.uri())
        .fetch(&window())
        .await
        .expect("fetch should succeed");
    let ids: Vec<&str> = reviews.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["gp-1"]);
}
