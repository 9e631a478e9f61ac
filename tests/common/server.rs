//! Wiremock helpers for the public feed endpoint.
#![allow(dead_code)]

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flickr_feed::core::client::ApiClient;
use flickr_feed::core::http::{HttpDebug, ReqwestTransport};
use flickr_feed::core::platform::FixedPlatform;

/// Path of the feed endpoint as the mock server sees it.
pub const FEED_ROUTE: &str = "/services/feeds/photos_public.gne";

/// User agent sent by [`client_for`].
pub const TEST_USER_AGENT: &str = "FlickrFeed/1.0 TestOS/1.0 Device/test-rig";

/// Client pointed at the mock server with a fixed platform identity.
pub fn client_for(server: &MockServer) -> ApiClient<ReqwestTransport> {
    let transport = ReqwestTransport::new(HttpDebug::Off).expect("transport build");
    ApiClient::new(transport)
        .with_base_domain(server.uri())
        .with_platform(FixedPlatform::new("TestOS/1.0", "test-rig"))
}

/// Answer feed searches for `tag` with `template`.
pub async fn mount_feed(server: &MockServer, tag: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(FEED_ROUTE))
        .and(query_param("format", "json"))
        .and(query_param("nojsoncallback", "1"))
        .and(query_param("tags", tag))
        .respond_with(template)
        .mount(server)
        .await;
}

/// JSON response with the given raw body.
pub fn json_body(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "application/json")
}
