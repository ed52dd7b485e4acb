use std::time::Duration;

use jobfeed_client::HeadHunterClient;
use jobfeed_core::{AppError, HttpConfig, JobBoard};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HeadHunterClient {
    HeadHunterClient::new(&HttpConfig {
        base_url: format!("{}/vacancies", server.uri()),
        retry_base_delay: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
        ..HttpConfig::default()
    })
    .unwrap()
}

fn page(names: &[&str]) -> serde_json::Value {
    let items: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "id": i.to_string(),
                "name": name,
                "url": format!("https://api.hh.ru/vacancies/{}", i),
                "salary": {"from": 100000, "to": null, "currency": "RUR"},
                "snippet": {"requirement": "Rust", "responsibility": null}
            })
        })
        .collect();
    json!({"items": items, "found": names.len(), "pages": 1, "page": 0})
}

#[tokio::test]
async fn fetches_single_page_with_search_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .and(query_param("text", "Python"))
        .and(query_param("per_page", "50"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[
            "Python Developer",
            "Data Scientist",
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let listings = client_for(&server)
        .fetch_vacancies("Python", 1)
        .await
        .unwrap();

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].name, "Python Developer");
    assert_eq!(listings[1].name, "Data Scientist");
    assert_eq!(listings[0].salary.as_ref().unwrap().from, Some(100000));
}

#[tokio::test]
async fn fetches_multiple_pages_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .and(query_param("page", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&["Python Developer"]))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["Data Scientist"])))
        .expect(1)
        .mount(&server)
        .await;

    let listings = client_for(&server)
        .fetch_vacancies("Python", 2)
        .await
        .unwrap();

    let names: Vec<_> = listings.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Python Developer", "Data Scientist"]);
}

#[tokio::test]
async fn missing_items_is_an_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"found": 0})))
        .mount(&server)
        .await;

    let listings = client_for(&server).fetch_page("Cobol", 0).await.unwrap();
    assert!(listings.is_empty());
}

#[tokio::test]
async fn client_error_maps_to_api_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_vacancies("Python", 1)
        .await
        .unwrap_err();

    match err {
        AppError::ApiError { status, reason } => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_is_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_page("Python", 0).await.unwrap_err();
    assert!(matches!(err, AppError::ApiError { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn recovers_after_transient_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["Rust Developer"])))
        .mount(&server)
        .await;

    let listings = client_for(&server).fetch_page("Rust", 0).await.unwrap();
    assert_eq!(listings.len(), 1);
}

#[tokio::test]
async fn malformed_body_is_a_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_page("Rust", 0).await.unwrap_err();
    assert!(matches!(err, AppError::SerializationError(_)));
}

#[tokio::test]
async fn unreachable_host_is_a_connection_error() {
    // nothing listens on port 1
    let client = HeadHunterClient::new(&HttpConfig {
        base_url: "http://127.0.0.1:1/vacancies".to_string(),
        retry_base_delay: Duration::from_millis(1),
        max_retries: 2,
        ..HttpConfig::default()
    })
    .unwrap();

    let err = client.fetch_page("Rust", 0).await.unwrap_err();
    assert!(matches!(err, AppError::ConnectionError(_)));
}
