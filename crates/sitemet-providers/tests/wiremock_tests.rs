//! Provider client tests against a mock HTTP server
//!
//! Verify request shape, payload decoding, and the error taxonomy mapping
//! (HTTP status vs. malformed body) for both upstream clients.

use chrono::NaiveDate;
use sitemet_providers::{
    CurrentProvider, HistoricalProvider, HistoricalRequest, MeteosourceClient, MeteostatClient,
    ProviderError,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_request() -> HistoricalRequest {
    HistoricalRequest {
        lat: -23.36,
        lon: 119.73,
        start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        timezone: "Australia/Perth".to_string(),
        units: "metric".to_string(),
    }
}

fn sample_hourly_body() -> serde_json::Value {
    serde_json::json!({
        "data": [
            {"time": "2024-03-01 10:00:00", "temp": 31.2, "rhum": 18, "wspd": 18.0, "wdir": 90, "prcp": 0.0},
            {"time": "2024-03-01 11:00:00", "temp": null, "rhum": null, "wspd": null, "wdir": null, "prcp": null}
        ]
    })
}

#[tokio::test]
async fn historical_client_sends_rapidapi_headers_and_decodes_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/point/hourly"))
        .and(query_param("lat", "-23.36"))
        .and(query_param("start", "2024-03-01"))
        .and(query_param("units", "metric"))
        .and(header("X-RapidAPI-Key", "test-key"))
        .and(header("X-RapidAPI-Host", "test-host"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_hourly_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = MeteostatClient::new(server.uri(), "test-key", "test-host");
    let rows = client.hourly(&sample_request()).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].wspd, Some(18.0));
    assert_eq!(rows[1].temp, None);
}

#[tokio::test]
async fn historical_non_2xx_maps_to_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/point/hourly"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = MeteostatClient::new(server.uri(), "k", "h");
    let err = client.hourly(&sample_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Http { status: 429 }));
}

#[tokio::test]
async fn historical_shape_mismatch_maps_to_malformed_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/point/hourly"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"rows": []})),
        )
        .mount(&server)
        .await;

    let client = MeteostatClient::new(server.uri(), "k", "h");
    let err = client.hourly(&sample_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::MalformedPayload(_)));
}

#[tokio::test]
async fn current_client_decodes_the_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/point"))
        .and(query_param("place_id", "newman"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": {
                "summary": "Sunny",
                "temperature": 36.0,
                "cloud_cover": 2,
                "precipitation": {"total": 0.0},
                "wind": {"speed": 4.2, "angle": 135}
            }
        })))
        .mount(&server)
        .await;

    let client = MeteosourceClient::new(server.uri(), "test-key");
    let conditions = client.current("newman").await.unwrap();

    assert_eq!(conditions.summary, "Sunny");
    assert_eq!(conditions.wind_angle, 135.0);
}

#[tokio::test]
async fn current_non_2xx_maps_to_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/point"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = MeteosourceClient::new(server.uri(), "test-key");
    let err = client.current("newman").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http { status: 500 }));
}
