//! Content client: cache, priority fallback chain, placeholder.

use std::time::Duration;

use astroreel_models::{retry, ContentItem, RetryPolicy};
use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::apod::ApodClient;
use crate::cache::{cache_key, DailyCache};
use crate::error::ContentResult;
use crate::news::NewsClient;

/// Default picture-of-the-day endpoint.
pub const DEFAULT_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Default space news feed endpoint.
pub const DEFAULT_NEWS_URL: &str = "https://api.spaceflightnewsapi.net/v4/articles";

/// Per-request timeout for content fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("astroreel/", env!("CARGO_PKG_VERSION"));

/// Configuration for the content client.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub apod_url: String,
    pub news_url: String,
    pub api_key: String,
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            apod_url: DEFAULT_APOD_URL.to_string(),
            news_url: DEFAULT_NEWS_URL.to_string(),
            api_key: "DEMO_KEY".to_string(),
            cache_ttl: Duration::from_secs(3600),
            retry: RetryPolicy::new("content fetch"),
        }
    }
}

/// Fetches one "item of the day", caching the result per calendar date.
///
/// Sources are tried in fixed priority order: picture-of-the-day API,
/// then the news feed. When every source fails the client returns fixed
/// placeholder content, so the pipeline can always render something.
pub struct ContentClient {
    apod: ApodClient,
    news: NewsClient,
    cache: DailyCache,
    retry: RetryPolicy,
}

impl ContentClient {
    pub fn new(config: ContentConfig) -> ContentResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            apod: ApodClient::new(http.clone(), config.apod_url, config.api_key),
            news: NewsClient::new(http, config.news_url),
            cache: DailyCache::new(config.cache_ttl),
            retry: config.retry,
        })
    }

    /// Get today's content item.
    ///
    /// A fresh cache entry short-circuits the network entirely. Source
    /// failures are logged and degrade down the fallback chain; this
    /// method never fails.
    pub async fn daily_item(&mut self) -> ContentItem {
        self.daily_item_for(Local::now().date_naive()).await
    }

    /// Same as [`daily_item`](Self::daily_item) with an explicit date.
    pub async fn daily_item_for(&mut self, today: NaiveDate) -> ContentItem {
        let key = cache_key(today);

        if let Some(item) = self.cache.get(&key) {
            debug!("Returning cached content for {key}");
            return item;
        }

        let apod_policy = self.retry.named("fetch picture of the day");
        match retry(&apod_policy, || self.apod.fetch(today)).await {
            Ok(item) => {
                self.cache.insert(key, item.clone());
                return item;
            }
            Err(e) => warn!("Picture-of-the-day source unavailable: {e}"),
        }

        let news_policy = self.retry.named("fetch news feed");
        match retry(&news_policy, || self.news.fetch_latest(today)).await {
            Ok(item) => {
                self.cache.insert(key, item.clone());
                return item;
            }
            Err(e) => warn!("News feed unavailable: {e}"),
        }

        warn!("All content sources failed, using placeholder content");
        ContentItem::placeholder(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astroreel_models::ContentOrigin;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new("test")
            .with_max_attempts(1)
            .with_initial_delay(Duration::from_millis(1))
    }

    fn config(server: &MockServer, cache_ttl: Duration) -> ContentConfig {
        ContentConfig {
            apod_url: format!("{}/apod", server.uri()),
            news_url: format!("{}/articles", server.uri()),
            api_key: "DEMO_KEY".to_string(),
            cache_ttl,
            retry: fast_retry(),
        }
    }

    fn apod_body() -> serde_json::Value {
        serde_json::json!({
            "title": "Crab Nebula",
            "explanation": "A supernova remnant.",
            "url": "https://example.com/crab.jpg",
            "media_type": "image"
        })
    }

    #[tokio::test]
    async fn test_second_lookup_within_ttl_makes_no_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(apod_body()))
            .expect(1)
            .mount(&server)
            .await;

        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let mut client =
            ContentClient::new(config(&server, Duration::from_secs(3600))).unwrap();

        let first = client.daily_item_for(today).await;
        let second = client.daily_item_for(today).await;
        assert_eq!(first.title, second.title);
        // The expect(1) on the mock verifies no second call happened.
    }

    #[tokio::test]
    async fn test_lookup_past_ttl_refetches_exactly_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(apod_body()))
            .expect(2)
            .mount(&server)
            .await;

        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let mut client = ContentClient::new(config(&server, Duration::ZERO)).unwrap();

        client.daily_item_for(today).await;
        client.daily_item_for(today).await;
    }

    #[tokio::test]
    async fn test_apod_failure_falls_back_to_news() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apod"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "title": "Backup Story", "summary": "Still news." }]
            })))
            .mount(&server)
            .await;

        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let mut client =
            ContentClient::new(config(&server, Duration::from_secs(3600))).unwrap();
        let item = client.daily_item_for(today).await;
        assert_eq!(item.origin, ContentOrigin::NewsFeed);
        assert_eq!(item.title, "Backup Story");
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apod"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let mut client =
            ContentClient::new(config(&server, Duration::from_secs(3600))).unwrap();
        let item = client.daily_item_for(today).await;
        assert_eq!(item.origin, ContentOrigin::Placeholder);
        assert!(!item.has_image());
    }

    #[tokio::test]
    async fn test_fallback_success_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apod"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "title": "Backup Story", "summary": "Still news." }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let mut client =
            ContentClient::new(config(&server, Duration::from_secs(3600))).unwrap();
        client.daily_item_for(today).await;
        // Second call must be served from cache (expect(1) on both mocks).
        let item = client.daily_item_for(today).await;
        assert_eq!(item.origin, ContentOrigin::NewsFeed);
    }
}
