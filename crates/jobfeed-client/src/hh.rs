use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use jobfeed_core::config::{HttpConfig, MAX_RETRIES};
use jobfeed_core::error::AppError;
use jobfeed_core::raw::RawVacancy;
use jobfeed_core::traits::JobBoard;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

/// Generic wrapper for HeadHunter search responses.
///
/// API reference: <https://api.hh.ru/openapi/redoc#tag/Poisk-vakansij>
///
/// Only `items` is needed; paging metadata (`found`, `pages`, `page`) is
/// ignored. Items are kept as raw JSON so that one malformed listing does
/// not fail the whole page.
#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Value>,
}

/// HTTP client for the HeadHunter (hh.ru) vacancy search API.
///
/// # Examples
///
/// ```no_run
/// use jobfeed_client::HeadHunterClient;
/// use jobfeed_core::{HttpConfig, JobBoard};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HeadHunterClient::new(&HttpConfig::default())?;
/// let listings = client.fetch_vacancies("Rust", 2).await?;
/// println!("Found {} listings", listings.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HeadHunterClient {
    client: Client,
    base_url: Url,
    per_page: u32,
    max_retries: u32,
    retry_base_delay: Duration,
    timeout: Duration,
    concurrency: usize,
}

impl HeadHunterClient {
    /// Creates a new client from HTTP configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the base URL is malformed.
    /// Returns `AppError::ConnectionError` if the HTTP client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .user_agent("Jobfeed/0.1 (vacancy-search)")
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            per_page: config.per_page,
            max_retries: config.max_retries.clamp(1, MAX_RETRIES),
            retry_base_delay: config.retry_base_delay,
            timeout: config.timeout,
            concurrency: config.concurrency.max(1),
        })
    }

    /// Fetches one zero-based page of listings matching `keyword`.
    ///
    /// Listings that cannot be decoded are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ApiError` on a non-success status,
    /// `AppError::ConnectionError` or `AppError::Timeout` on transport
    /// failure, and `AppError::SerializationError` if the body is not JSON.
    pub async fn search_page(&self, keyword: &str, page: u32) -> Result<Vec<RawVacancy>, AppError> {
        let url = self.page_url(keyword, page);
        let resp = self.request_with_retry(&url).await?;

        let body = resp
            .text()
            .await
            .map_err(|e| AppError::ConnectionError(e.to_string()))?;
        let search: SearchResponse = serde_json::from_str(&body)?;

        let listings = Self::decode_items(search.items);
        debug!(
            "Fetched page {} for {:?}: {} listings",
            page,
            keyword,
            listings.len()
        );
        Ok(listings)
    }

    fn page_url(&self, keyword: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("text", keyword)
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    fn decode_items(items: Vec<Value>) -> Vec<RawVacancy> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value(item) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    warn!("Skipping undecodable listing #{}: {}", i, e);
                    None
                }
            })
            .collect()
    }

    /// Makes an HTTP GET request with automatic retry on transient failures.
    ///
    /// Retries with backoff on:
    /// - Connection failures
    /// - Timeouts
    /// - Server errors (5xx)
    /// - Rate limiting (429)
    async fn request_with_retry(&self, url: &Url) -> Result<reqwest::Response, AppError> {
        let mut last_error = AppError::Generic("No attempts made".to_string());

        for attempt in 1..=self.max_retries {
            match self.client.get(url.clone()).send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        return Ok(resp);
                    }

                    let error = api_error(status);

                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        last_error = error;
                        if attempt < self.max_retries {
                            debug!(
                                "HTTP {} from {}, retrying (attempt {})",
                                status.as_u16(),
                                url,
                                attempt
                            );
                            sleep(backoff_delay(self.retry_base_delay, attempt)).await;
                            continue;
                        }
                        break;
                    }

                    // Client error (4xx except 429) - don't retry
                    return Err(error);
                }
                Err(e) => {
                    let retryable = e.is_timeout() || e.is_connect();
                    last_error = if e.is_timeout() {
                        AppError::Timeout(self.timeout.as_secs())
                    } else {
                        AppError::ConnectionError(e.to_string())
                    };

                    if retryable && attempt < self.max_retries {
                        sleep(self.retry_base_delay * attempt).await;
                        continue;
                    }
                    break;
                }
            }
        }

        Err(last_error)
    }
}

/// Exponential delay before retry number `attempt` (1-based).
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
}

fn api_error(status: StatusCode) -> AppError {
    AppError::ApiError {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

#[async_trait]
impl JobBoard for HeadHunterClient {
    fn name(&self) -> &str {
        "hh.ru"
    }

    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<Vec<RawVacancy>, AppError> {
        self.search_page(keyword, page).await
    }

    /// Fetches pages concurrently, keeping results in page order.
    async fn fetch_vacancies(
        &self,
        keyword: &str,
        pages: u32,
    ) -> Result<Vec<RawVacancy>, AppError> {
        let per_page: Vec<Vec<RawVacancy>> = stream::iter(0..pages)
            .map(|page| self.search_page(keyword, page))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(per_page.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> HttpConfig {
        HttpConfig {
            base_url: base_url.to_string(),
            ..HttpConfig::default()
        }
    }

    #[test]
    fn test_new_with_valid_url() {
        let client = HeadHunterClient::new(&HttpConfig::default()).unwrap();
        assert_eq!(client.base_url.as_str(), "https://api.hh.ru/vacancies");
        assert_eq!(client.per_page, 50);
    }

    #[test]
    fn test_new_with_invalid_url() {
        let result = HeadHunterClient::new(&config("not-a-valid-url"));
        match result {
            Err(AppError::InvalidUrl(msg)) => assert!(msg.contains("not-a-valid-url")),
            _ => panic!("Expected AppError::InvalidUrl"),
        }
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        let client = HeadHunterClient::new(&HttpConfig {
            max_retries: 0,
            concurrency: 0,
            ..HttpConfig::default()
        })
        .unwrap();
        assert_eq!(client.max_retries, 1);
        assert_eq!(client.concurrency, 1);
    }

    #[test]
    fn test_retries_capped_and_backoff_saturates() {
        let client = HeadHunterClient::new(&HttpConfig {
            max_retries: 40,
            ..HttpConfig::default()
        })
        .unwrap();
        assert_eq!(client.max_retries, MAX_RETRIES);

        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), base);
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(2000));
        assert_eq!(backoff_delay(base, 40), base * u32::MAX);
        assert_eq!(backoff_delay(Duration::MAX, 2), Duration::MAX);
    }

    #[test]
    fn test_page_url_encodes_keyword() {
        let client = HeadHunterClient::new(&HttpConfig::default()).unwrap();
        let url = client.page_url("Rust разработчик", 3);
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("text".to_string(), "Rust разработчик".to_string()),
                ("per_page".to_string(), "50".to_string()),
                ("page".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_response_missing_items() {
        let response: SearchResponse = serde_json::from_str(r#"{"found": 0}"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_decode_items_skips_malformed() {
        let items = vec![
            serde_json::json!({"name": "Rust Developer", "url": "https://api.hh.ru/vacancies/1"}),
            serde_json::json!({"name": 42}),
            serde_json::json!({"name": "QA", "url": "https://api.hh.ru/vacancies/2", "salary": null}),
        ];
        let decoded = HeadHunterClient::decode_items(items);
        let names: Vec<_> = decoded.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Rust Developer", "QA"]);
    }

    #[test]
    fn test_api_error_reason() {
        match api_error(StatusCode::NOT_FOUND) {
            AppError::ApiError { status, reason } => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
