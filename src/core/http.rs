//! HTTP transport.
//!
//! Issues one request and returns the raw status, headers, and body. No
//! retries; redirects follow reqwest's default policy.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Url};

use crate::error::TransportError;

/// Timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A fully built request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl Request {
    /// First value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A raw response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the status is a valid HTTP status code.
    #[must_use]
    pub const fn is_http(&self) -> bool {
        self.status >= 100 && self.status <= 599
    }

    /// First value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Something that can carry a [`Request`] to a server.
///
/// Each call is independent: implementations must not share mutable state
/// between requests.
pub trait Transport: Send + Sync {
    /// Send the request and wait for the complete response.
    ///
    /// A failure while reading the body is a transport error: the status
    /// and headers already received are not returned.
    fn send(&self, request: Request)
    -> impl Future<Output = Result<Response, TransportError>> + Send;
}

// =============================================================================
// Wire logging
// =============================================================================

/// Whether request and response bodies are logged.
///
/// Decided once when the transport is built. Release builds never log
/// bodies, whatever was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpDebug {
    #[default]
    Off,
    On,
}

impl HttpDebug {
    /// Resolve the requested setting against the build profile.
    #[must_use]
    pub const fn resolve(requested: bool) -> Self {
        if requested && cfg!(debug_assertions) {
            Self::On
        } else {
            Self::Off
        }
    }

    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

fn log_request(request: &Request) {
    let body = request
        .body
        .as_deref()
        .and_then(|bytes| std::str::from_utf8(bytes).ok());
    tracing::debug!(
        target: "flickr_feed::http",
        method = %request.method,
        url = %request.url,
        headers = ?request.headers,
        body,
        "HTTP request"
    );
}

fn log_response(request: &Request, response: &Response) {
    let body = std::str::from_utf8(&response.body).ok();
    tracing::debug!(
        target: "flickr_feed::http",
        method = %request.method,
        url = %request.url,
        status = response.status,
        body,
        "HTTP response"
    );
}

// =============================================================================
// reqwest transport
// =============================================================================

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client, TransportError> {
    ClientBuilder::new()
        .timeout(timeout)
        .build()
        .map_err(TransportError::Request)
}

/// Transport backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    debug: HttpDebug,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying client cannot be built (TLS backend
    /// initialization failure).
    pub fn new(debug: HttpDebug) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(REQUEST_TIMEOUT)?,
            debug,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        if self.debug.is_on() {
            log_request(&request);
        }

        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone())
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, request.timeout))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(e, request.timeout))?
            .to_vec();

        let response = Response {
            status,
            headers,
            body,
        };
        if self.debug.is_on() {
            log_response(&request, &response);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(method: Method, url: &str, body: Option<&[u8]>) -> Request {
        Request {
            method,
            url: url.parse().unwrap(),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: body.map(<[u8]>::to_vec),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn method_names() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(reqwest::Method::from(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(reqwest::Method::from(Method::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn http_debug_follows_build_profile() {
        assert_eq!(HttpDebug::resolve(false), HttpDebug::Off);
        assert_eq!(HttpDebug::resolve(true).is_on(), cfg!(debug_assertions));
    }

    #[test]
    fn response_status_range() {
        let mut response = Response {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Vec::new(),
        };
        assert!(response.is_http());
        assert_eq!(response.header("content-type"), Some("application/json"));
        response.status = 0;
        assert!(!response.is_http());
    }

    #[test]
    fn build_client_with_zero_timeout() {
        // Zero timeout is valid for reqwest
        assert!(build_client(Duration::from_secs(0)).is_ok());
    }

    #[tokio::test]
    #[traced_test]
    async fn wire_logging_records_request_and_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"resp":1}"#))
            .mount(&server)
            .await;

        let transport = ReqwestTransport {
            client: build_client(REQUEST_TIMEOUT).unwrap(),
            debug: HttpDebug::On,
        };
        let url = format!("{}/echo", server.uri());
        let response = transport
            .send(request(Method::Post, &url, Some(br#"{"req":2}"#)))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(logs_contain("HTTP request"));
        assert!(logs_contain("method=POST"));
        assert!(logs_contain("/echo"));
        assert!(logs_contain("Content-Type"));
        assert!(logs_contain(r#"{\"req\":2}"#));
        assert!(logs_contain("HTTP response"));
        assert!(logs_contain("status=200"));
        assert!(logs_contain(r#"{\"resp\":1}"#));
    }

    #[tokio::test]
    #[traced_test]
    async fn wire_logging_skips_non_utf8_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/binary"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0xff, 0xfe, 0x00], "image/jpeg"),
            )
            .mount(&server)
            .await;

        let transport = ReqwestTransport {
            client: build_client(REQUEST_TIMEOUT).unwrap(),
            debug: HttpDebug::On,
        };
        let url = format!("{}/binary", server.uri());
        let response = transport
            .send(request(Method::Post, &url, Some(&[0xc3, 0x28])))
            .await
            .unwrap();

        assert_eq!(response.body, vec![0xff, 0xfe, 0x00]);
        assert!(logs_contain("HTTP request"));
        assert!(logs_contain("HTTP response"));
        assert!(!logs_contain("body="));
    }

    #[tokio::test]
    #[traced_test]
    async fn wire_logging_off_emits_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quiet"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(HttpDebug::Off).unwrap();
        let url = format!("{}/quiet", server.uri());
        transport
            .send(request(Method::Get, &url, None))
            .await
            .unwrap();

        assert!(!logs_contain("HTTP request"));
        assert!(!logs_contain("HTTP response"));
    }
}
