use std::time::Duration;

use connectify_core::{AsyncOpenWeather, ClientConfig, DEFAULT_LANG, Units};
use httpmock::prelude::*;
use serde_json::json;

const PATH: &str = "/data/2.5/weather";

fn client_for(server: &MockServer, retries: u32) -> AsyncOpenWeather {
    let config = ClientConfig::new("test-key")
        .unwrap()
        .with_base_url(server.url(PATH))
        .with_retries(retries)
        .with_backoff_base(Duration::from_millis(5));
    AsyncOpenWeather::new(config)
}

#[tokio::test]
async fn session_fetches_and_normalizes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(PATH)
                .query_param("q", "Algiers")
                .query_param("appid", "test-key");
            then.status(200).json_body(json!({
                "name": "Algiers",
                "sys": {"country": "DZ"},
                "weather": [],
                "main": {"temp": 25.5, "temp_min": 21, "temp_max": 28}
            }));
        })
        .await;

    let mut client = client_for(&server, 2);
    {
        let session = client.session().unwrap();
        let report = session
            .get_city_weather("Algiers", Units::Metric, DEFAULT_LANG)
            .await
            .unwrap();

        assert_eq!(report.city.as_deref(), Some("Algiers"));
        assert_eq!(report.temperature, Some(25.5));
        assert_eq!(report.temp_min, Some(21.0));
        assert_eq!(report.temp_max, Some(28.0));
        assert_eq!(report.description, None);
    }

    mock.assert_async().await;
    assert!(!client.is_open());
}

#[tokio::test]
async fn session_is_shared_by_several_requests() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).json_body(json!({"name": "Oslo"}));
        })
        .await;

    let mut client = client_for(&server, 0);
    let session = client.session().unwrap();
    let (a, b) = tokio::join!(
        session.get_city_weather("Oslo", Units::Metric, DEFAULT_LANG),
        session.get_by_coords(59.9, 10.7, Units::Metric, DEFAULT_LANG),
    );

    assert_eq!(a.unwrap().city.as_deref(), Some("Oslo"));
    assert_eq!(b.unwrap().city.as_deref(), Some("Oslo"));
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn use_without_session_is_rejected() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = client_for(&server, 2);
    let err = client
        .get_city_weather("Algiers", Units::Metric, DEFAULT_LANG)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Session not initialized"));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn error_body_message_is_embedded_after_retries() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(404).json_body(json!({"cod": "404", "message": "city not found"}));
        })
        .await;

    let mut client = client_for(&server, 2);
    let session = client.session().unwrap();
    let err = session
        .get_city_weather("Atlantis", Units::Metric, DEFAULT_LANG)
        .await
        .unwrap_err();

    mock.assert_hits_async(3).await;
    assert_eq!(
        err.to_string(),
        "HTTP request failed after 3 attempts: OpenWeather API error (404): city not found"
    );
}

#[tokio::test]
async fn plain_text_error_body_is_used_verbatim() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(503).body("Service Unavailable");
        })
        .await;

    let mut client = client_for(&server, 0);
    let session = client.session().unwrap();
    let err = session
        .get_by_coords(0.0, 0.0, Units::Standard, DEFAULT_LANG)
        .await
        .unwrap_err();

    assert!(err.to_string().ends_with("OpenWeather API error (503): Service Unavailable"));
}
