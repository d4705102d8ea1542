//! Daily content item fetched from a remote source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which source produced a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentOrigin {
    /// Astronomy picture-of-the-day API (primary source).
    Apod,
    /// Space news feed (fallback source).
    NewsFeed,
    /// Fixed placeholder used when every source failed.
    Placeholder,
}

impl ContentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentOrigin::Apod => "apod",
            ContentOrigin::NewsFeed => "news_feed",
            ContentOrigin::Placeholder => "placeholder",
        }
    }
}

/// One "item of the day": title, description and an optional image.
///
/// Produced by the content source, consumed by the renderer. Identity is
/// the calendar date only; a new item supersedes the previous one daily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    pub description: String,
    /// Remote image URL, if the source provided one.
    pub image_url: Option<String>,
    pub date: NaiveDate,
    pub origin: ContentOrigin,
}

impl ContentItem {
    /// Fixed placeholder item used when all remote sources are unavailable.
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            title: "Amazing Space Discovery".to_string(),
            description: "The universe is full of wonders waiting to be discovered!"
                .to_string(),
            image_url: None,
            date,
            origin: ContentOrigin::Placeholder,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().map_or(false, |u| !u.is_empty())
    }
}
