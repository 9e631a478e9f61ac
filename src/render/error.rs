//! Error rendering for flickr-feed.
//!
//! Colored output with fix suggestions for terminals, plain text when
//! stderr is not a TTY, and structured JSON for robot formats.

use colored::Colorize;

use crate::cli::args::OutputFormat;
use crate::error::{AppError, FixSuggestion};
use crate::util::env::stderr_is_tty;

// =============================================================================
// Public API
// =============================================================================

/// Render an error for stderr.
///
/// JSON and Markdown formats get structured JSON. Human format is colored
/// when `no_color` is unset and stderr is a TTY, plain otherwise.
#[must_use]
pub fn render_error(
    error: &AppError,
    format: OutputFormat,
    no_color: bool,
    pretty: bool,
) -> String {
    match format {
        OutputFormat::Json => return render_error_json(error, pretty),
        OutputFormat::Md => return render_error_json(error, true),
        OutputFormat::Human => {}
    }

    if !no_color && stderr_is_tty() {
        render_rich(error)
    } else {
        render_simple(error)
    }
}

/// Render error as structured JSON for machine consumption.
#[must_use]
pub fn render_error_json(error: &AppError, pretty: bool) -> String {
    let error_json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&error_json)
    } else {
        serde_json::to_string(&error_json)
    };
    rendered.unwrap_or_else(|_| render_simple(error))
}

// =============================================================================
// Terminal Rendering
// =============================================================================

fn render_rich(error: &AppError) -> String {
    let suggestions = error.fix_suggestions();
    let mut lines = vec![
        format!(
            "{} {}",
            error.category().description().red().bold(),
            format!("[{}]", error.error_code()).as_str().dimmed()
        ),
        format!("  {error}"),
    ];

    if !suggestions.is_empty() {
        lines.push(String::new());
        lines.push("How to fix:".cyan().bold().to_string());
        lines.extend(suggestion_lines(&suggestions, |cmd| cmd.cyan().to_string()));
    }

    if let Some(first) = suggestions.first() {
        if !first.context.is_empty() {
            lines.push(String::new());
            lines.push("Why this happened:".yellow().to_string());
            lines.extend(wrap_text(&first.context, 66).iter().map(|l| format!("  {l}")));
        }
        if let Some(prevention) = &first.prevention {
            lines.push(String::new());
            lines.push("Prevention:".green().to_string());
            lines.extend(wrap_text(prevention, 66).iter().map(|l| format!("  {l}")));
        }
    }

    lines.join("\n")
}

fn suggestion_lines(
    suggestions: &[FixSuggestion],
    paint: impl Fn(&str) -> String,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, suggestion) in suggestions.iter().enumerate() {
        for (j, cmd) in suggestion.commands.iter().enumerate() {
            let prefix = if j == 0 {
                format!("  {}. ", i + 1)
            } else {
                "     Or: ".to_string()
            };
            lines.push(format!("{prefix}{}", paint(cmd)));
        }
    }
    lines
}

fn render_simple(error: &AppError) -> String {
    let mut lines = vec![format!("Error [{}]: {}", error.error_code(), error)];

    let first_command = error
        .fix_suggestions()
        .into_iter()
        .flat_map(|s| s.commands)
        .find(|cmd| !cmd.starts_with('#'));
    if let Some(cmd) = first_command {
        lines.push(format!("Fix: {cmd}"));
    }

    lines.join("\n")
}

// =============================================================================
// JSON
// =============================================================================

#[derive(serde::Serialize)]
struct ErrorJson {
    error_code: &'static str,
    category: String,
    message: String,
    is_retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    layer: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decode_kind: Option<&'static str>,
    suggestions: Vec<SuggestionJson>,
}

#[derive(serde::Serialize)]
struct SuggestionJson {
    commands: Vec<String>,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prevention: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &AppError) -> Self {
        let api = error.api_error();

        Self {
            error_code: error.error_code(),
            category: error.category().to_string(),
            message: error.to_string(),
            is_retryable: api.is_some_and(crate::error::ApiError::is_retryable),
            layer: api.map(|e| e.layer().description()),
            decode_kind: api.and_then(|e| e.decode_kind()).map(|k| k.as_str()),
            suggestions: error
                .fix_suggestions()
                .into_iter()
                .map(|s| SuggestionJson {
                    commands: s.commands,
                    context: s.context,
                    prevention: s.prevention,
                })
                .collect(),
        }
    }
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}
