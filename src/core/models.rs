//! Data models for the public photo feed.

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::util::text::html_to_text;

/// A page of the public photo feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub modified: DateTime<Utc>,
    pub generator: String,
    pub items: Vec<FeedItem>,
}

/// One photo in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub media: Media,
    pub date_taken: String,
    /// HTML fragment.
    pub description: String,
    pub published: String,
    pub author: String,
    pub author_id: String,
    /// Space-separated tags.
    pub tags: String,
}

impl FeedItem {
    /// Tags as a list.
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.split_whitespace().collect()
    }

    /// Description with markup removed.
    #[must_use]
    pub fn plain_description(&self) -> String {
        html_to_text(&self.description)
    }

    /// Image URL, if the feed sent a valid one.
    #[must_use]
    pub fn image_url(&self) -> Option<Url> {
        self.media.image_url()
    }
}

/// Media links of a feed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Medium-size image URL.
    pub m: String,
}

impl Media {
    #[must_use]
    pub fn image_url(&self) -> Option<Url> {
        Url::parse(&self.m).ok()
    }
}

/// Outcome of searching one tag, as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<PhotoFeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

/// Error details in a [`SearchOutcome`].
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeError {
    pub code: String,
    pub message: String,
}

impl SearchOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.feed.is_some()
    }
}

/// Envelope for robot-mode output.
#[derive(Debug, Clone, Serialize)]
pub struct RobotOutput<T> {
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub command: &'static str,
    pub data: T,
}

impl<T> RobotOutput<T> {
    pub fn new(command: &'static str, data: T) -> Self {
        Self {
            schema_version: "flickr-feed.v1",
            generated_at: Utc::now(),
            command,
            data,
        }
    }
}
