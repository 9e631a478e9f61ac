//! Test utilities for flickr-feed.
//!
//! Provides a recording transport, feed fixtures, temporary directories, and
//! assertion macros for use across all test modules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use flickr_feed::test_utils::*;
//!
//! let transport = RecordingTransport::new().respond("porto", 200, PORTO_FEED_JSON);
//! let dir = TestDir::new();
//! dir.create_file("config.toml", "[api]\nstrict_status = true");
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::http::{Request, Response, Transport};
use crate::error::TransportError;

// =============================================================================
// Feed Fixtures
// =============================================================================

/// A one-item feed page for the tag `porto`.
pub const PORTO_FEED_JSON: &str = r#"{"title":"t","link":"l","description":"d","modified":"2024-01-01T00:00:00Z","generator":"g","items":[{"title":"a","link":"b","media":{"m":"http://x/y.jpg"},"date_taken":"2024-01-01","description":"desc","published":"p","author":"au","author_id":"1","tags":"t1 t2"}]}"#;

/// A feed page whose only item has no `link`.
pub const MISSING_LINK_FEED_JSON: &str = r#"{"title":"t","link":"l","description":"d","modified":"2024-01-01T00:00:00Z","generator":"g","items":[{"title":"a","media":{"m":"http://x/y.jpg"},"date_taken":"2024-01-01","description":"desc","published":"p","author":"au","author_id":"1","tags":"t1 t2"}]}"#;

/// Build a feed page for `tag` with `count` items shaped like the live feed.
#[must_use]
pub fn sample_feed_json(tag: &str, count: usize) -> String {
    let items: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "title": format!("{tag} photo {i}"),
                "link": format!("https://www.flickr.com/photos/jo/{i}/"),
                "media": {"m": format!("https://live.staticflickr.com/65535/{i}_m.jpg")},
                "date_taken": "2024-05-01T10:00:00-08:00",
                "description": format!(
                    " <p><a href=\"https://www.flickr.com/people/jo/\">jo</a> posted a photo:</p> <p>{tag} &amp; friends</p>"
                ),
                "published": "2024-05-02T10:00:00Z",
                "author": "nobody@flickr.com (\"jo\")",
                "author_id": "12345@N00",
                "tags": format!("{tag} travel"),
            })
        })
        .collect();

    serde_json::json!({
        "title": format!("Recent Uploads tagged {tag}"),
        "link": format!("https://www.flickr.com/photos/tags/{tag}/"),
        "description": "",
        "modified": "2024-05-02T10:00:00Z",
        "generator": "https://www.flickr.com",
        "items": items,
    })
    .to_string()
}

/// Create a test config TOML string.
#[must_use]
pub fn make_test_config_toml(base_url: &str) -> String {
    format!(
        r#"[api]
base_url = "{base_url}"
strict_status = false

[debug]
http_bodies = false

[output]
color = false
pretty = false
"#
    )
}

// =============================================================================
// Recording Transport
// =============================================================================

/// In-memory [`Transport`] that records every request and answers by tag.
///
/// Requests are matched on their `tags` query parameter. Unrouted tags get
/// a `404` with an empty body.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    routes: HashMap<String, (u16, String)>,
    failing: HashSet<String>,
    sent: Arc<Mutex<Vec<Request>>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer searches for `tag` with `status` and `body`.
    #[must_use]
    pub fn respond(mut self, tag: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(tag.to_string(), (status, body.to_string()));
        self
    }

    /// Fail searches for `tag` at the transport level.
    #[must_use]
    pub fn fail(mut self, tag: &str) -> Self {
        self.failing.insert(tag.to_string());
        self
    }

    /// Requests sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<Request> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let tag = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "tags")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if self.failing.contains(&tag) {
            return Err(TransportError::other(io::Error::new(
                io::ErrorKind::NotFound,
                format!("simulated DNS failure for {tag}"),
            )));
        }

        let (status, body) = self
            .routes
            .get(&tag)
            .cloned()
            .unwrap_or_else(|| (404, String::new()));
        Ok(Response {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.into_bytes(),
        })
    }
}

// =============================================================================
// Temporary Directories
// =============================================================================

/// Isolated temporary directory, removed on drop.
///
/// # Examples
///
/// ```rust,ignore
/// use flickr_feed::test_utils::TestDir;
///
/// let dir = TestDir::new();
/// dir.create_file("config.toml", "[output]\ncolor = false");
/// assert!(dir.file_exists("config.toml"));
/// ```
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new isolated temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Create a file in the temporary directory with the given content.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.inner.path().join(name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        let mut file = fs::File::create(&path).expect("Failed to create test file");
        file.write_all(content.as_bytes())
            .expect("Failed to write test file");
    }

    /// Check if a file exists in the temporary directory.
    #[must_use]
    pub fn file_exists(&self, name: &str) -> bool {
        self.inner.path().join(name).exists()
    }

    /// Get the full path to a file in the temporary directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert that a string contains a substring.
///
/// # Examples
///
/// ```rust,ignore
/// use flickr_feed::assert_contains;
///
/// assert_contains!("Hello, world!", "world");
/// ```
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Assert that a string is valid JSON.
#[macro_export]
macro_rules! assert_json_valid {
    ($json:expr) => {
        let json = $json;
        if let Err(e) = serde_json::from_str::<serde_json::Value>(json) {
            panic!(
                "Expected valid JSON, but parsing failed: {}\n\nJSON string:\n{}",
                e, json
            );
        }
    };
}
