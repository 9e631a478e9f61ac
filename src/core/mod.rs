//! API client core and the feed service built on it.

pub mod client;
pub mod codec;
pub mod endpoint;
pub mod feed;
pub mod http;
pub mod logging;
pub mod models;
pub mod platform;

pub use client::{ApiClient, ApiResult, ResponseMeta, StatusPolicy};
pub use endpoint::{DEFAULT_BASE_URL, Endpoint};
pub use feed::{FEED_PATH, FeedService, normalize_search, search_endpoint};
pub use http::{
    HttpDebug, Method, REQUEST_TIMEOUT, ReqwestTransport, Request, Response, Transport,
};
pub use models::{FeedItem, Media, PhotoFeed, RobotOutput, SearchOutcome};
pub use platform::{FixedPlatform, PlatformInfo, SystemPlatform, build_user_agent};
