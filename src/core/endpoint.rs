//! Endpoint descriptors and URL resolution.

use reqwest::Url;

use super::platform::{PlatformInfo, build_user_agent};
use crate::error::ApiError;

/// Base domain of the Flickr API.
pub const DEFAULT_BASE_URL: &str = "https://api.flickr.com";

/// JSON media type, used for both `Content-Type` and `Accept`.
pub const APPLICATION_JSON: &str = "application/json";

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A complete URL, used as-is.
    Absolute(Url),
    /// A path relative to the client's base domain, with ordered query
    /// parameters.
    Relative {
        path: String,
        query: Vec<(String, String)>,
    },
}

impl Endpoint {
    /// Endpoint for a complete URL.
    #[must_use]
    pub const fn absolute(url: Url) -> Self {
        Self::Absolute(url)
    }

    /// Endpoint for a path relative to the base domain, without query.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Relative {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter. Has no effect on absolute endpoints.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Relative { query, .. } = &mut self {
            query.push((key.into(), value.into()));
        }
        self
    }

    /// Resolve to a concrete URL against `base_domain`.
    ///
    /// Relative paths are joined with exactly one `/` whether or not they
    /// already start with one. Query parameters keep their order and are
    /// form-urlencoded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the joined string is not a valid
    /// absolute URL.
    pub fn resolve(&self, base_domain: &str) -> Result<Url, ApiError> {
        match self {
            Self::Absolute(url) => Ok(url.clone()),
            Self::Relative { path, query } => {
                let base = base_domain.trim_end_matches('/');
                let separator = if path.starts_with('/') { "" } else { "/" };
                let raw = format!("{base}{separator}{path}");

                let mut url =
                    Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
                if url.cannot_be_a_base() {
                    return Err(ApiError::InvalidUrl(format!("{raw}: not a hierarchical URL")));
                }

                if !query.is_empty() {
                    url.query_pairs_mut()
                        .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                }
                Ok(url)
            }
        }
    }

    /// Headers sent with every request to this endpoint.
    #[must_use]
    pub fn headers(&self, platform: &dyn PlatformInfo) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_string(), APPLICATION_JSON.to_string()),
            ("User-Agent".to_string(), build_user_agent(platform)),
        ]
    }
}

impl From<Url> for Endpoint {
    fn from(url: Url) -> Self {
        Self::Absolute(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::FixedPlatform;

    #[test]
    fn relative_path_gets_one_slash() {
        let url = Endpoint::path("services/feeds/photos_public.gne")
            .resolve(DEFAULT_BASE_URL)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.flickr.com/services/feeds/photos_public.gne"
        );
    }

    #[test]
    fn leading_slash_is_not_doubled() {
        let with = Endpoint::path("/a/b").resolve("https://example.com").unwrap();
        let without = Endpoint::path("a/b").resolve("https://example.com").unwrap();
        assert_eq!(with, without);
        assert_eq!(with.as_str(), "https://example.com/a/b");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let url = Endpoint::path("a").resolve("https://example.com/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn query_keeps_order_and_encodes_values() {
        let url = Endpoint::path("feed")
            .query("format", "json")
            .query("nojsoncallback", "1")
            .query("tags", "porto & lisbon")
            .resolve("https://example.com")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/feed?format=json&nojsoncallback=1&tags=porto+%26+lisbon"
        );
    }

    #[test]
    fn no_query_means_no_question_mark() {
        let url = Endpoint::path("feed").resolve("https://example.com").unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn absolute_url_is_unchanged() {
        let target = Url::parse("http://other.example/x?y=1").unwrap();
        let url = Endpoint::absolute(target.clone())
            .query("ignored", "1")
            .resolve("https://example.com")
            .unwrap();
        assert_eq!(url, target);
    }

    #[test]
    fn invalid_base_fails_explicitly() {
        let err = Endpoint::path("feed").resolve("not a domain").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)), "{err:?}");

        let err = Endpoint::path("feed").resolve("mailto:someone").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)), "{err:?}");
    }

    #[test]
    fn headers_carry_json_and_identifier() {
        let platform = FixedPlatform::new("Linux/6.1", "x86_64");
        let headers = Endpoint::path("feed").headers(&platform);
        assert!(headers.contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(headers.contains(&(
            "User-Agent".to_string(),
            "FlickrFeed/1.0 Linux/6.1 Device/x86_64".to_string()
        )));
    }
}
