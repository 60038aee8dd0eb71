//! Tests of the events client, against a local fake webhook

mod webhook;

use std::time::Duration;

use serde_json::json;

use event_board::client::Client;
use event_board::traits::EventSource;
use event_board::{FetchError, Settings};

use webhook::{closed_url, Reply, Webhook};

fn client(url: &str) -> Client {
    Client::new(Settings::new(url).unwrap()).unwrap()
}

#[tokio::test]
async fn fetch_sorts_events() {
    let _ = env_logger::builder().is_test(true).try_init();

    let webhook = Webhook::json(200, r#"{"value": [
        {"ID": 3, "Title": "March", "EventStartDate": "2024-03-01"},
        {"ID": 1, "Title": "January", "EventStartDate": "2024-01-01"},
        {"ID": 2, "Title": "February", "EventStartDate": "2024-02-01"}
    ]}"#).await;

    let events = client(webhook.url()).fetch_events().await.unwrap();
    let ids: Vec<_> = events.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn fetch_sends_an_empty_json_post() {
    let _ = env_logger::builder().is_test(true).try_init();

    let webhook = Webhook::json(200, r#"{"value": []}"#).await;
    client(webhook.url()).fetch_events().await.unwrap();

    let requests = webhook.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.starts_with("POST /workflows/events/invoke?sig=secret HTTP/1.1\r\n"));
    assert!(request.to_lowercase().contains("content-type: application/json\r\n"));
    assert!(request.ends_with("\r\n\r\n{}"));
}

#[tokio::test]
async fn missing_value_is_an_empty_list() {
    let webhook = Webhook::json(200, "{}").await;
    let events = client(webhook.url()).fetch_events().await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn http_errors_carry_their_status() {
    let webhook = Webhook::json(500, r#"{"error": "boom"}"#).await;
    let err = client(webhook.url()).fetch_events().await.unwrap_err();
    assert_eq!(err, FetchError::HttpStatus { status: 500 });
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "HTTP error! status: 500");

    let webhook = Webhook::json(404, "").await;
    let err = client(webhook.url()).fetch_events().await.unwrap_err();
    assert_eq!(err, FetchError::HttpStatus { status: 404 });
}

#[tokio::test]
async fn invalid_json_is_a_network_error() {
    let webhook = Webhook::json(200, "<html>maintenance</html>").await;
    let err = client(webhook.url()).fetch_events().await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let url = closed_url().await;
    let err = client(&url).fetch_events().await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}

#[tokio::test]
async fn slow_endpoints_time_out() {
    let webhook = Webhook::serve(vec![Reply::Hang]).await;
    let settings = Settings::new(webhook.url()).unwrap()
        .with_timeout(Duration::from_millis(200));
    let client = Client::new(settings).unwrap();

    let err = client.fetch_events().await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}

#[tokio::test]
async fn probe_returns_the_raw_answer() {
    let webhook = Webhook::json(200, r#"{"value": [{"ID": 1}], "@odata.context": "x"}"#).await;

    let answer = client(webhook.url()).probe(json!({ "top": 5 })).await.unwrap();
    assert_eq!(answer["@odata.context"], "x");
    assert_eq!(answer["value"][0]["ID"], 1);

    let requests = webhook.requests();
    assert!(requests[0].ends_with(r#"{"top":5}"#));
}
