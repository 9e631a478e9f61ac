//! Error types for flickr-feed.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Two levels:
//! - [`ApiError`] is the closed taxonomy returned by the API client for a
//!   single call (see [`api`]).
//! - [`AppError`] is what the command-line front end reports. It wraps
//!   `ApiError` and adds configuration, input, and I/O failures.
//!
//! Each `AppError` has a stable error code (e.g., `FLKR-C001`) and a category
//! for routing fix suggestions.

pub mod api;
pub mod suggestions;

use thiserror::Error;

pub use api::{ApiError, DecodeError, DecodeErrorKind, ErrorLayer, TransportError};
pub use suggestions::FixSuggestion;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network issues (timeout, DNS, TLS, connection refused).
    Network,
    /// Configuration issues (parse errors, invalid values).
    Configuration,
    /// The feed answered with something unusable.
    Remote,
    /// Invalid command-line input.
    Input,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network error",
            Self::Configuration => "Configuration error",
            Self::Remote => "Feed error",
            Self::Input => "Input error",
            Self::Internal => "Internal error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Invalid input or configuration
    UsageError = 2,
    /// Response could not be decoded
    ParseError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for flickr-feed operations.
#[derive(Error, Debug)]
pub enum AppError {
    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Input errors
    // ==========================================================================
    /// The search text was empty after trimming.
    #[error("search text is blank")]
    BlankSearch,

    // ==========================================================================
    // Feed errors
    // ==========================================================================
    /// A feed search failed.
    #[error("search for '{tag}' failed: {source}")]
    Search {
        tag: String,
        #[source]
        source: ApiError,
    },

    /// Some searches succeeded, some failed.
    #[error("partial failure: {failed} search(es) failed")]
    PartialFailure { failed: usize },

    /// API client failure outside a search.
    #[error(transparent)]
    Api(#[from] ApiError),

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// The API error behind this failure, if any.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Search { source, .. } => Some(source),
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Map error to exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        if let Some(api) = self.api_error() {
            return match api {
                ApiError::Transport(TransportError::Timeout { .. }) => ExitCode::Timeout,
                ApiError::Decode(_)
                | ApiError::UnparsableResponse
                | ApiError::InvalidRequestObject(_) => ExitCode::ParseError,
                ApiError::InvalidUrl(_) => ExitCode::UsageError,
                _ => ExitCode::GeneralError,
            };
        }

        match self {
            Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_)
            | Self::BlankSearch => ExitCode::UsageError,
            _ => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        if let Some(api) = self.api_error() {
            return match api.layer() {
                ErrorLayer::Transport => ErrorCategory::Network,
                ErrorLayer::Codec | ErrorLayer::Domain => ErrorCategory::Remote,
                ErrorLayer::Client => match api {
                    ApiError::InvalidUrl(_) => ErrorCategory::Configuration,
                    ApiError::Other(_) => ErrorCategory::Internal,
                    _ => ErrorCategory::Remote,
                },
            };
        }

        match self {
            Self::ConfigParse { .. } | Self::ConfigInvalid { .. } | Self::Config(_) => {
                ErrorCategory::Configuration
            }
            Self::BlankSearch => ErrorCategory::Input,
            Self::PartialFailure { .. } => ErrorCategory::Remote,
            _ => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        if let Some(api) = self.api_error() {
            return api.error_code();
        }

        match self {
            Self::ConfigParse { .. } => "FLKR-G001",
            Self::ConfigInvalid { .. } => "FLKR-G002",
            Self::Config(_) => "FLKR-G003",
            Self::BlankSearch => "FLKR-I001",
            Self::PartialFailure { .. } => "FLKR-R001",
            Self::Io(_) => "FLKR-X001",
            Self::Json(_) => "FLKR-X002",
            _ => "FLKR-X099",
        }
    }

    /// Returns actionable fix suggestions for this error.
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<FixSuggestion> {
        if let Some(api) = self.api_error() {
            return suggestions::api_error_suggestions(api);
        }

        match self {
            Self::ConfigParse { path, message } => {
                suggestions::config_parse_suggestions(path, message)
            }
            Self::ConfigInvalid {
                key,
                value,
                message,
            } => suggestions::config_invalid_suggestions(key, value, message),
            Self::Config(msg) => vec![FixSuggestion::new(
                vec!["flickr-feed config show".to_string()],
                format!("Configuration error: {msg}"),
            )],
            Self::BlankSearch => vec![FixSuggestion::new(
                vec!["flickr-feed search porto".to_string()],
                "Provide at least one non-blank tag to search for.",
            )],
            Self::PartialFailure { failed } => vec![FixSuggestion::new(
                vec!["flickr-feed search <tag> --verbose".to_string()],
                format!("{failed} of the requested searches failed; the others were shown."),
            )],
            _ => Vec::new(),
        }
    }
}

/// Result type alias for flickr-feed operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_a_usage_error() {
        let err = AppError::BlankSearch;
        assert_eq!(err.exit_code(), ExitCode::UsageError);
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.error_code(), "FLKR-I001");
        assert!(!err.fix_suggestions().is_empty());
    }

    #[test]
    fn search_error_delegates_to_api_error() {
        let err = AppError::Search {
            tag: "porto".to_string(),
            source: ApiError::EmptyResponse,
        };
        assert_eq!(err.error_code(), "FLKR-C002");
        assert_eq!(err.category(), ErrorCategory::Remote);
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
        assert!(err.to_string().contains("porto"));
    }

    #[test]
    fn decode_failures_map_to_parse_exit_code() {
        let err = AppError::Api(ApiError::Decode(DecodeError {
            kind: DecodeErrorKind::TypeMismatch,
            path: "items".to_string(),
            message: "invalid type".to_string(),
        }));
        assert_eq!(err.exit_code(), ExitCode::ParseError);
        assert_eq!(i32::from(err.exit_code()), 3);
    }

    #[test]
    fn invalid_url_is_configuration() {
        let err = AppError::Api(ApiError::InvalidUrl("nope".to_string()));
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), ExitCode::UsageError);
    }
}
