//! Public photo feed search.

use super::client::{ApiClient, ApiResult};
use super::endpoint::Endpoint;
use super::http::Transport;
use super::models::PhotoFeed;
use crate::error::ApiError;
use crate::util::text::is_blank;

/// Path of the public photo feed, relative to the API domain.
pub const FEED_PATH: &str = "services/feeds/photos_public.gne";

/// Normalize user search text: trimmed, or `None` if blank.
#[must_use]
pub fn normalize_search(text: &str) -> Option<&str> {
    if is_blank(text) {
        None
    } else {
        Some(text.trim())
    }
}

/// Endpoint for a tag search on the public feed.
#[must_use]
pub fn search_endpoint(tags: &str) -> Endpoint {
    Endpoint::path(FEED_PATH)
        .query("format", "json")
        .query("nojsoncallback", "1")
        .query("tags", tags)
}

/// Searches the public photo feed by tag.
#[derive(Debug, Clone)]
pub struct FeedService<T> {
    client: ApiClient<T>,
}

impl<T: Transport> FeedService<T> {
    #[must_use]
    pub const fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// Fetch the photos tagged with `tags`.
    ///
    /// The tag text is trimmed before it is sent.
    pub async fn search(&self, tags: &str) -> ApiResult<PhotoFeed, ApiError> {
        let tags = tags.trim();
        tracing::debug!(tags, "Searching public feed");

        let result: ApiResult<PhotoFeed, ApiError> =
            self.client.get(&search_endpoint(tags)).await;
        if let ApiResult::Success { value, .. } = &result {
            tracing::info!(tags, items = value.items.len(), "Feed search complete");
        }
        result
    }
}
