//! Astronomy picture-of-the-day client (primary source).

use astroreel_models::{ContentItem, ContentOrigin};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ContentError, ContentResult};

/// Wire format of the picture-of-the-day endpoint.
#[derive(Debug, Deserialize)]
struct ApodResponse {
    title: Option<String>,
    explanation: Option<String>,
    url: Option<String>,
    media_type: Option<String>,
    date: Option<String>,
}

/// Client for the picture-of-the-day API.
#[derive(Debug, Clone)]
pub struct ApodClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApodClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch today's item. Non-image media (videos) yield no image URL;
    /// the renderer falls back to the branding background in that case.
    pub async fn fetch(&self, fallback_date: NaiveDate) -> ContentResult<ContentItem> {
        debug!("Fetching picture of the day from {}", self.base_url);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::unexpected_status("apod", status.as_u16()));
        }

        let body: ApodResponse = response.json().await?;

        let image_url = match body.media_type.as_deref() {
            Some("image") | None => body.url.filter(|u| !u.is_empty()),
            Some(other) => {
                debug!("Skipping non-image media of type {other}");
                None
            }
        };

        let date = body
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .unwrap_or(fallback_date);

        let item = ContentItem {
            title: body.title.unwrap_or_else(|| "Space Discovery".to_string()),
            description: body.explanation.unwrap_or_default(),
            image_url,
            date,
            origin: ContentOrigin::Apod,
        };

        info!("Fetched picture of the day: {}", item.title);
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApodClient {
        ApodClient::new(
            reqwest::Client::new(),
            format!("{}/planetary/apod", server.uri()),
            "DEMO_KEY",
        )
    }

    #[tokio::test]
    async fn test_fetch_parses_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/planetary/apod"))
            .and(query_param("api_key", "DEMO_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Pillars of Creation",
                "explanation": "Towers of gas and dust.",
                "url": "https://example.com/pillars.jpg",
                "media_type": "image",
                "date": "2025-03-01"
            })))
            .mount(&server)
            .await;

        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let item = client_for(&server).fetch(today).await.unwrap();
        assert_eq!(item.title, "Pillars of Creation");
        assert_eq!(item.image_url.as_deref(), Some("https://example.com/pillars.jpg"));
        assert_eq!(item.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(item.origin, ContentOrigin::Apod);
    }

    #[tokio::test]
    async fn test_video_media_has_no_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/planetary/apod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "A Flight Over the Moon",
                "explanation": "Rendered from orbiter data.",
                "url": "https://example.com/clip.mov",
                "media_type": "video"
            })))
            .mount(&server)
            .await;

        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let item = client_for(&server).fetch(today).await.unwrap();
        assert!(!item.has_image());
        assert_eq!(item.date, today);
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/planetary/apod"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let err = client_for(&server).fetch(today).await.unwrap_err();
        assert!(matches!(
            err,
            ContentError::UnexpectedStatus { status: 503, .. }
        ));
    }
}
