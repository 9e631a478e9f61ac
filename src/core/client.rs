//! Typed API client.
//!
//! # Design
//! Every call goes through one pipeline: resolve the endpoint, attach
//! headers, send once through the [`Transport`], then classify the outcome
//! into an [`ApiResult`]. The client holds no per-call state, so concurrent
//! calls on a shared client are fully independent.
//!
//! Empty bodies are always reported as [`ApiError::EmptyResponse`]. HTTP
//! status codes are treated as metadata unless a [`StatusPolicy`] says
//! otherwise.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use super::codec;
use super::endpoint::{APPLICATION_JSON, DEFAULT_BASE_URL, Endpoint};
use super::http::{Method, REQUEST_TIMEOUT, Request, Response, Transport, find_header};
use super::platform::{PlatformInfo, SystemPlatform};
use crate::error::ApiError;

// =============================================================================
// Call outcome
// =============================================================================

/// Status and headers of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl ResponseMeta {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// First value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Outcome of one call.
///
/// `Failure::response` is `None` when no HTTP response was received.
#[derive(Debug)]
pub enum ApiResult<S, F> {
    Success {
        response: ResponseMeta,
        value: S,
    },
    Failure {
        response: Option<ResponseMeta>,
        error: F,
    },
}

impl<S, F> ApiResult<S, F> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Response metadata, if a response was received.
    #[must_use]
    pub const fn response(&self) -> Option<&ResponseMeta> {
        match self {
            Self::Success { response, .. } => Some(response),
            Self::Failure { response, .. } => response.as_ref(),
        }
    }

    /// The error, if the call failed.
    #[must_use]
    pub const fn error(&self) -> Option<&F> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Drop the metadata and keep the outcome.
    ///
    /// # Errors
    ///
    /// Returns the failure value.
    pub fn into_result(self) -> Result<S, F> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::Failure { error, .. } => Err(error),
        }
    }

    /// Transform the success value.
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> ApiResult<T, F> {
        match self {
            Self::Success { response, value } => ApiResult::Success {
                response,
                value: f(value),
            },
            Self::Failure { response, error } => ApiResult::Failure { response, error },
        }
    }
}

// =============================================================================
// Status policy
// =============================================================================

/// How the HTTP status affects the outcome of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any status is accepted; callers inspect [`ResponseMeta::status`].
    #[default]
    AcceptAny,
    /// Non-2xx statuses fail with [`ApiError::UnsuccessfulResponse`].
    RequireSuccess,
}

impl StatusPolicy {
    /// Check a response against the policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnsuccessfulResponse`] when the policy rejects the
    /// status.
    pub const fn check(self, response: &ResponseMeta) -> Result<(), ApiError> {
        match self {
            Self::AcceptAny => Ok(()),
            Self::RequireSuccess if response.is_success() => Ok(()),
            Self::RequireSuccess => Err(ApiError::UnsuccessfulResponse(response.status)),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Typed JSON API client over a [`Transport`].
#[derive(Clone)]
pub struct ApiClient<T> {
    transport: T,
    base_domain: String,
    platform: Arc<dyn PlatformInfo>,
    status_policy: StatusPolicy,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("transport", &self.transport)
            .field("base_domain", &self.base_domain)
            .field("status_policy", &self.status_policy)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ApiClient<T> {
    /// Client for the default base domain, reporting the running system.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_domain: DEFAULT_BASE_URL.to_string(),
            platform: Arc::new(SystemPlatform),
            status_policy: StatusPolicy::default(),
        }
    }

    /// Use a different base domain for relative endpoints.
    #[must_use]
    pub fn with_base_domain(mut self, base_domain: impl Into<String>) -> Self {
        self.base_domain = base_domain.into();
        self
    }

    /// Use a different platform for the client identifier.
    #[must_use]
    pub fn with_platform(mut self, platform: impl PlatformInfo + 'static) -> Self {
        self.platform = Arc::new(platform);
        self
    }

    /// Apply a status policy to every call.
    #[must_use]
    pub const fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    #[must_use]
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    #[must_use]
    pub const fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request for an endpoint without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the endpoint does not resolve.
    pub fn build_request(
        &self,
        endpoint: &Endpoint,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<Request, ApiError> {
        let url = endpoint.resolve(&self.base_domain)?;
        let mut headers = vec![("Accept".to_string(), APPLICATION_JSON.to_string())];
        headers.extend(endpoint.headers(self.platform.as_ref()));

        Ok(Request {
            method,
            url,
            headers,
            body,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Send raw bytes and return the raw body.
    ///
    /// A zero-length body comes back as `None`.
    pub async fn call_raw(
        &self,
        endpoint: &Endpoint,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> ApiResult<Option<Vec<u8>>, ApiError> {
        let request = match self.build_request(endpoint, method, body) {
            Ok(request) => request,
            Err(error) => {
                tracing::debug!(?endpoint, %error, "Endpoint did not resolve");
                return ApiResult::Failure {
                    response: None,
                    error,
                };
            }
        };

        tracing::debug!(method = %request.method, url = %request.url, "Sending request");
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(%error, "Transport failed");
                return ApiResult::Failure {
                    response: None,
                    error: error.into(),
                };
            }
        };

        self.classify(response)
    }

    /// Encode a request object, send it, and return the raw body.
    ///
    /// If encoding fails the network is never touched.
    pub async fn call_with_raw<Q>(
        &self,
        endpoint: &Endpoint,
        method: Method,
        request: &Q,
    ) -> ApiResult<Option<Vec<u8>>, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        match codec::encode(request) {
            Ok(body) => self.call_raw(endpoint, method, Some(body)).await,
            Err(error) => ApiResult::Failure {
                response: None,
                error,
            },
        }
    }

    /// Call without a body and decode the response into `R`.
    pub async fn call<R>(&self, endpoint: &Endpoint, method: Method) -> ApiResult<R, ApiError>
    where
        R: DeserializeOwned,
    {
        decode_body(self.call_raw(endpoint, method, None).await)
    }

    /// `GET` an endpoint and decode the response into `R`.
    pub async fn get<R>(&self, endpoint: &Endpoint) -> ApiResult<R, ApiError>
    where
        R: DeserializeOwned,
    {
        self.call(endpoint, Method::Get).await
    }

    /// Encode a request object, send it, and decode the response into `R`.
    pub async fn call_with<Q, R>(
        &self,
        endpoint: &Endpoint,
        method: Method,
        request: &Q,
    ) -> ApiResult<R, ApiError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        decode_body(self.call_with_raw(endpoint, method, request).await)
    }

    /// Run a bodiless call on the tokio runtime and hand the outcome to
    /// `completion` exactly once.
    ///
    /// `completion` runs on a runtime worker thread.
    pub fn dispatch<R, F>(&self, endpoint: Endpoint, method: Method, completion: F) -> JoinHandle<()>
    where
        T: Clone + 'static,
        R: DeserializeOwned + Send + 'static,
        F: FnOnce(ApiResult<R, ApiError>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let result = client.call(&endpoint, method).await;
            completion(result);
        })
    }

    fn classify(&self, response: Response) -> ApiResult<Option<Vec<u8>>, ApiError> {
        if !response.is_http() {
            return ApiResult::Failure {
                response: None,
                error: ApiError::InvalidResponseObject,
            };
        }

        let meta = ResponseMeta {
            status: response.status,
            headers: response.headers,
        };
        tracing::debug!(status = meta.status, bytes = response.body.len(), "Received response");

        if let Err(error) = self.status_policy.check(&meta) {
            return ApiResult::Failure {
                response: Some(meta),
                error,
            };
        }

        let body = (!response.body.is_empty()).then_some(response.body);
        ApiResult::Success {
            response: meta,
            value: body,
        }
    }
}

fn decode_body<R: DeserializeOwned>(
    raw: ApiResult<Option<Vec<u8>>, ApiError>,
) -> ApiResult<R, ApiError> {
    match raw {
        ApiResult::Failure { response, error } => ApiResult::Failure { response, error },
        ApiResult::Success {
            response,
            value: None,
        } => ApiResult::Failure {
            response: Some(response),
            error: ApiError::EmptyResponse,
        },
        ApiResult::Success {
            response,
            value: Some(body),
        } => match codec::decode(&body) {
            Ok(value) => ApiResult::Success { response, value },
            Err(error) => {
                tracing::warn!(
                    kind = %error.kind,
                    path = %error.path,
                    message = %error.message,
                    "Failed to decode response"
                );
                ApiResult::Failure {
                    response: Some(response),
                    error: error.into(),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::FixedPlatform;
    use crate::error::TransportError;
    use serde::Deserialize;
    use std::sync::Mutex;

    /// Transport that records requests and replays one canned outcome.
    struct CannedTransport {
        sent: Mutex<Vec<Request>>,
        status: u16,
        body: &'static str,
        fail: bool,
    }

    impl CannedTransport {
        fn ok(status: u16, body: &'static str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                status,
                body,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::ok(0, "")
            }
        }

        fn sent(&self) -> Vec<Request> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for CannedTransport {
        async fn send(&self, request: Request) -> Result<Response, TransportError> {
            self.sent.lock().unwrap().push(request);
            if self.fail {
                return Err(TransportError::other(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "dns lookup failed",
                )));
            }
            Ok(Response {
                status: self.status,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        ok: bool,
    }

    fn client(transport: CannedTransport) -> ApiClient<CannedTransport> {
        ApiClient::new(transport)
            .with_base_domain("https://example.com")
            .with_platform(FixedPlatform::new("Linux/6.1", "x86_64"))
    }

    #[tokio::test]
    async fn get_decodes_body() {
        let client = client(CannedTransport::ok(200, r#"{"ok":true}"#));
        let result: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("echo")).await;

        let response = result.response().cloned().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(result.into_result().unwrap(), Echo { ok: true });
    }

    #[tokio::test]
    async fn request_carries_headers_and_timeout() {
        let client = client(CannedTransport::ok(200, r#"{"ok":true}"#));
        let _: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("/echo")).await;

        let sent = client.transport().sent();
        assert_eq!(sent.len(), 1);
        let request = &sent[0];
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url.as_str(), "https://example.com/echo");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(
            request.header("user-agent"),
            Some("FlickrFeed/1.0 Linux/6.1 Device/x86_64")
        );
        assert_eq!(request.timeout, REQUEST_TIMEOUT);
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn empty_body_is_empty_response_for_any_status() {
        for status in [200, 204, 404, 500] {
            let client = client(CannedTransport::ok(status, ""));
            let result: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("echo")).await;
            match result {
                ApiResult::Failure {
                    response: Some(meta),
                    error: ApiError::EmptyResponse,
                } => assert_eq!(meta.status, status),
                other => panic!("expected EmptyResponse for {status}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn status_is_metadata_by_default() {
        let client = client(CannedTransport::ok(500, r#"{"ok":false}"#));
        let result: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("echo")).await;
        assert!(result.is_success());
        assert_eq!(result.response().unwrap().status, 500);
    }

    #[tokio::test]
    async fn require_success_rejects_non_2xx() {
        let client = client(CannedTransport::ok(503, r#"{"ok":false}"#))
            .with_status_policy(StatusPolicy::RequireSuccess);
        let result: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("echo")).await;
        assert!(matches!(
            result,
            ApiResult::Failure {
                response: Some(_),
                error: ApiError::UnsuccessfulResponse(503)
            }
        ));
    }

    #[tokio::test]
    async fn transport_failure_has_no_response() {
        let client = client(CannedTransport::failing());
        let result: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("echo")).await;
        match result {
            ApiResult::Failure {
                response: None,
                error: ApiError::Transport(err),
            } => assert!(err.to_string().contains("dns lookup failed")),
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_http_status_is_invalid_response_object() {
        let client = client(CannedTransport::ok(0, r#"{"ok":true}"#));
        let result: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("echo")).await;
        assert!(matches!(
            result,
            ApiResult::Failure {
                response: None,
                error: ApiError::InvalidResponseObject
            }
        ));
    }

    #[tokio::test]
    async fn unresolvable_endpoint_never_sends() {
        let client = client(CannedTransport::ok(200, r#"{"ok":true}"#)).with_base_domain("nope");
        let result: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("echo")).await;
        assert!(matches!(
            result,
            ApiResult::Failure {
                response: None,
                error: ApiError::InvalidUrl(_)
            }
        ));
        assert!(client.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn unencodable_request_never_sends() {
        let mut map = std::collections::BTreeMap::new();
        map.insert((1, 2), "tuple keys are not JSON");

        let client = client(CannedTransport::ok(200, r#"{"ok":true}"#));
        let result: ApiResult<Echo, ApiError> = client
            .call_with(&Endpoint::path("echo"), Method::Post, &map)
            .await;
        assert!(matches!(
            result,
            ApiResult::Failure {
                response: None,
                error: ApiError::InvalidRequestObject(_)
            }
        ));
        assert!(client.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn call_with_sends_encoded_body() {
        #[derive(Serialize)]
        struct Query<'a> {
            tags: &'a str,
        }

        let client = client(CannedTransport::ok(200, r#"{"ok":true}"#));
        let raw = client
            .call_with_raw(&Endpoint::path("echo"), Method::Patch, &Query { tags: "porto" })
            .await;
        assert_eq!(raw.into_result().unwrap().unwrap(), br#"{"ok":true}"#.to_vec());

        let sent = client.transport().sent();
        assert_eq!(sent[0].method, Method::Patch);
        assert_eq!(sent[0].body.as_deref(), Some(br#"{"tags":"porto"}"#.as_slice()));
    }

    #[tokio::test]
    async fn raw_call_reports_empty_body_as_none() {
        let client = client(CannedTransport::ok(204, ""));
        let raw = client
            .call_raw(&Endpoint::path("echo"), Method::Delete, None)
            .await;
        assert!(raw.is_success());
        assert!(raw.into_result().unwrap().is_none());
    }

    #[tokio::test]
    async fn map_keeps_metadata() {
        let client = client(CannedTransport::ok(200, r#"{"ok":true}"#));
        let result: ApiResult<Echo, ApiError> = client.get(&Endpoint::path("echo")).await;
        let mapped = result.map(|echo| echo.ok);
        assert_eq!(mapped.response().unwrap().status, 200);
        assert!(mapped.error().is_none());
        assert!(mapped.into_result().unwrap());
    }
}
