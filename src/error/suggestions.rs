//! Fix suggestion database for flickr-feed errors.
//!
//! Provides actionable fix suggestions mapped to specific error types,
//! including commands and context explanations.

use super::api::{ApiError, DecodeErrorKind, TransportError};

// =============================================================================
// Fix Suggestion Types
// =============================================================================

/// A fix suggestion for an error.
#[derive(Debug, Clone)]
pub struct FixSuggestion {
    /// Fix commands in order of preference, copy-paste ready.
    pub commands: Vec<String>,

    /// Explanation of why this error occurred.
    pub context: String,

    /// Tips to prevent this error in the future.
    pub prevention: Option<String>,
}

impl FixSuggestion {
    /// Creates a new fix suggestion with required fields.
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
            prevention: None,
        }
    }

    /// Builder: adds prevention tips.
    #[must_use]
    pub fn with_prevention(mut self, prevention: impl Into<String>) -> Self {
        self.prevention = Some(prevention.into());
        self
    }
}

// =============================================================================
// Suggestion Builders
// =============================================================================

/// Suggestions for a config file that failed to parse.
#[must_use]
pub fn config_parse_suggestions(path: &str, message: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!("$EDITOR {path}")],
            format!("The config file is not valid TOML: {message}"),
        )
        .with_prevention("Run `flickr-feed config show` after editing to check the result."),
    ]
}

/// Suggestions for an invalid config value.
#[must_use]
pub fn config_invalid_suggestions(key: &str, value: &str, message: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["flickr-feed config path".to_string()],
        format!("'{key}' has value '{value}': {message}"),
    )]
}

/// Suggestions for a failed API call.
#[must_use]
pub fn api_error_suggestions(error: &ApiError) -> Vec<FixSuggestion> {
    match error {
        ApiError::Transport(TransportError::Timeout { timeout, .. }) => vec![
            FixSuggestion::new(
                vec!["flickr-feed search <tag>".to_string()],
                format!(
                    "The feed did not answer within {}s. The service may be slow or unreachable.",
                    timeout.as_secs()
                ),
            )
            .with_prevention("Check your connection before retrying."),
        ],
        ApiError::Transport(TransportError::Connect { host, .. }) => vec![FixSuggestion::new(
            vec![format!("ping {host}")],
            format!("Could not reach {host}. Check DNS, proxy, and network settings."),
        )],
        ApiError::Transport(_) => vec![FixSuggestion::new(
            vec!["flickr-feed search <tag> --verbose".to_string()],
            "The HTTP request failed before a response arrived.",
        )],
        ApiError::InvalidUrl(url) => vec![FixSuggestion::new(
            vec![
                "flickr-feed config show".to_string(),
                "flickr-feed search <tag> --base-url https://api.flickr.com".to_string(),
            ],
            format!("The request URL is invalid ({url}). Check the configured base URL."),
        )],
        ApiError::EmptyResponse => vec![FixSuggestion::new(
            vec!["flickr-feed search <tag>".to_string()],
            "The feed returned an empty body. Try again later or with a different tag.",
        )],
        ApiError::UnsuccessfulResponse(status) => vec![FixSuggestion::new(
            vec!["flickr-feed search <tag> --verbose".to_string()],
            format!("The feed answered with HTTP {status}."),
        )],
        ApiError::Decode(decode) => {
            let context = match decode.kind {
                DecodeErrorKind::Corrupted => {
                    "The feed response is not valid JSON. The endpoint may have changed format."
                        .to_string()
                }
                DecodeErrorKind::MissingKey
                | DecodeErrorKind::NullValue
                | DecodeErrorKind::TypeMismatch => format!(
                    "The feed response does not match the expected shape at '{}'. The API may have changed.",
                    decode.path
                ),
            };
            vec![FixSuggestion::new(
                vec!["flickr-feed search <tag> --http-debug --verbose".to_string()],
                context,
            )]
        }
        _ => Vec::new(),
    }
}
