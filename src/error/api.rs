//! Error taxonomy for the API client.
//!
//! ## Layers
//!
//! `ApiError` is one flat, closed enumeration shared by every call site, but
//! each variant belongs to exactly one layer (see [`ErrorLayer`]):
//! - **Client**: endpoint resolution and response policy (`InvalidUrl`,
//!   `EmptyResponse`, `UnsuccessfulResponse`, `Custom`, `Other`)
//! - **Transport**: the network round-trip (`Transport`, `InvalidResponseObject`)
//! - **Codec**: JSON encoding and decoding (`InvalidRequestObject`, `Decode`,
//!   `UnparsableResponse`)
//! - **Domain**: account-level failures reserved for authenticated endpoints.
//!   The public feed never produces these.
//!
//! Decode failures keep their classification ([`DecodeErrorKind`]) and the
//! offending field path instead of collapsing into a free-form message.

use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Error Layers
// =============================================================================

/// The layer of the client that can produce a given [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorLayer {
    /// Endpoint resolution and caller-level response policy.
    Client,
    /// The HTTP round-trip.
    Transport,
    /// Request encoding and response decoding.
    Codec,
    /// Account-level failures of authenticated APIs.
    Domain,
}

impl ErrorLayer {
    /// Returns a human-readable description of the layer.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Client => "Client error",
            Self::Transport => "Transport error",
            Self::Codec => "Codec error",
            Self::Domain => "Domain error",
        }
    }
}

impl std::fmt::Display for ErrorLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// Failure to complete the HTTP round-trip.
///
/// Every variant wraps the underlying cause so it stays reachable through
/// [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request did not complete within the timeout.
    #[error("request timed out after {}s", .timeout.as_secs())]
    Timeout {
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    /// DNS resolution, TCP connect, or TLS handshake failed.
    #[error("could not connect to {host}")]
    Connect {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other failure reported by the HTTP stack.
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Failure raised by a non-reqwest transport.
    #[error("transport failed: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Classify a reqwest error.
    #[must_use]
    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                timeout,
                source: error,
            }
        } else if error.is_connect() {
            let host = error
                .url()
                .and_then(|url| url.host_str())
                .unwrap_or("unknown host")
                .to_string();
            Self::Connect {
                host,
                source: error,
            }
        } else {
            Self::Request(error)
        }
    }

    /// Wrap an arbitrary error raised by a custom transport.
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// =============================================================================
// Decode Errors
// =============================================================================

/// Why a response body could not be decoded into the target shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// The payload is not well-formed JSON.
    Corrupted,
    /// A required field is absent.
    MissingKey,
    /// A required field is present but `null`.
    NullValue,
    /// A field is present with the wrong type or shape.
    TypeMismatch,
}

impl DecodeErrorKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Corrupted => "corrupted data",
            Self::MissingKey => "missing key",
            Self::NullValue => "null value",
            Self::TypeMismatch => "type mismatch",
        }
    }
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified response decode failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at '{path}': {message}")]
pub struct DecodeError {
    /// Failure classification.
    pub kind: DecodeErrorKind,
    /// Path of the offending field (`.` for the document root).
    pub path: String,
    /// Description from the JSON parser, including line and column.
    pub message: String,
}

// =============================================================================
// API Errors
// =============================================================================

/// Closed set of failures reported by [`crate::core::client::ApiClient`].
///
/// `Display` gives a diagnostic message; [`ApiError::user_message`] gives the
/// short text meant for end users.
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================================================
    // Client layer
    // ==========================================================================
    /// The endpoint did not resolve to a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body was absent or zero-length.
    #[error("Empty response")]
    EmptyResponse,

    /// A status policy rejected the response status.
    #[error("Unsuccessful response: {0}")]
    UnsuccessfulResponse(u16),

    /// Caller-provided message.
    #[error("{0}")]
    Custom(String),

    /// Arbitrary wrapped error.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),

    // ==========================================================================
    // Transport layer
    // ==========================================================================
    /// The network round-trip failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The transport completed but produced no usable HTTP response.
    #[error("Invalid response object")]
    InvalidResponseObject,

    // ==========================================================================
    // Codec layer
    // ==========================================================================
    /// The request object could not be encoded.
    #[error("Invalid request object: {0}")]
    InvalidRequestObject(String),

    /// The response body could not be decoded.
    #[error("Unable to parse response: {0}")]
    Decode(#[from] DecodeError),

    /// The response body could not be interpreted at all.
    #[error("Unable to parse response")]
    UnparsableResponse,

    // ==========================================================================
    // Domain layer (reserved for authenticated endpoints)
    // ==========================================================================
    #[error("Unable to parse client info from response")]
    InvalidClientInfo,

    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Invalid login")]
    BadCredentials,

    #[error("Not found")]
    NotFound,

    #[error("Try again in 30 seconds")]
    TooManyRequests,

    #[error("Invalid code")]
    InvalidMfaCode,

    #[error("No User Found")]
    NoUserFound,
}

impl ApiError {
    /// Wrap an arbitrary error.
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }

    /// Returns the layer that produces this error.
    #[must_use]
    pub const fn layer(&self) -> ErrorLayer {
        match self {
            Self::InvalidUrl(_)
            | Self::EmptyResponse
            | Self::UnsuccessfulResponse(_)
            | Self::Custom(_)
            | Self::Other(_) => ErrorLayer::Client,

            Self::Transport(_) | Self::InvalidResponseObject => ErrorLayer::Transport,

            Self::InvalidRequestObject(_) | Self::Decode(_) | Self::UnparsableResponse => {
                ErrorLayer::Codec
            }

            Self::InvalidClientInfo
            | Self::InvalidToken
            | Self::BadCredentials
            | Self::NotFound
            | Self::TooManyRequests
            | Self::InvalidMfaCode
            | Self::NoUserFound => ErrorLayer::Domain,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `FLKR-{layer}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "FLKR-C001",
            Self::EmptyResponse => "FLKR-C002",
            Self::UnsuccessfulResponse(_) => "FLKR-C003",
            Self::Custom(_) => "FLKR-C098",
            Self::Other(_) => "FLKR-C099",

            Self::Transport(TransportError::Timeout { .. }) => "FLKR-T001",
            Self::Transport(TransportError::Connect { .. }) => "FLKR-T002",
            Self::Transport(_) => "FLKR-T003",
            Self::InvalidResponseObject => "FLKR-T010",

            Self::InvalidRequestObject(_) => "FLKR-D001",
            Self::Decode(_) => "FLKR-D002",
            Self::UnparsableResponse => "FLKR-D003",

            Self::InvalidClientInfo => "FLKR-A001",
            Self::InvalidToken => "FLKR-A002",
            Self::BadCredentials => "FLKR-A003",
            Self::NotFound => "FLKR-A004",
            Self::TooManyRequests => "FLKR-A005",
            Self::InvalidMfaCode => "FLKR-A006",
            Self::NoUserFound => "FLKR-A007",
        }
    }

    /// Short message suitable for showing to an end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl(_) => "Invalid URL".to_string(),
            Self::InvalidRequestObject(_) => "Invalid request object".to_string(),
            Self::Decode(_) => "Unable to parse response".to_string(),
            Self::NotFound => "No Data Found".to_string(),
            other => other.to_string(),
        }
    }

    /// Decode classification, if this is a decode failure.
    #[must_use]
    pub const fn decode_kind(&self) -> Option<DecodeErrorKind> {
        match self {
            Self::Decode(err) => Some(err.kind),
            _ => None,
        }
    }

    /// Whether a later identical call might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(TransportError::Timeout { .. } | TransportError::Connect { .. })
                | Self::TooManyRequests
        )
    }
}
