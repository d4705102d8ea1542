//! Space news feed client (fallback source).

use astroreel_models::{ContentItem, ContentOrigin};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ContentError, ContentResult};

/// Wire format of the news feed endpoint.
#[derive(Debug, Deserialize)]
struct NewsResponse {
    results: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsArticle {
    title: Option<String>,
    summary: Option<String>,
    image_url: Option<String>,
}

/// Client for the space news feed.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NewsClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetch the most recent article as a content item.
    pub async fn fetch_latest(&self, date: NaiveDate) -> ContentResult<ContentItem> {
        debug!("Fetching space news from {}", self.base_url);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("limit", "1"), ("ordering", "-published_at")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::unexpected_status("news", status.as_u16()));
        }

        let body: NewsResponse = response.json().await?;
        let article = body.results.into_iter().next().ok_or(ContentError::EmptyFeed)?;

        let item = ContentItem {
            title: article.title.unwrap_or_else(|| "Space News".to_string()),
            description: article.summary.unwrap_or_default(),
            image_url: article.image_url.filter(|u| !u.is_empty()),
            date,
            origin: ContentOrigin::NewsFeed,
        };

        info!("Fetched space news: {}", item.title);
        Ok(item)
    }
}
