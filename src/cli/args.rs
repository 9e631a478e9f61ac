//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};

/// Flickr feed search - Browse the public photo feed by tag.
#[derive(Parser, Debug)]
#[command(name = "flickr-feed")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    // === Global flags ===
    /// Output format [default: human]
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log request and response bodies (debug builds only)
    #[arg(long, global = true)]
    pub http_debug: bool,
}

impl Cli {
    /// Output format requested on the command line, if any.
    #[must_use]
    pub const fn effective_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else {
            self.format
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the public photo feed by tag
    Search(SearchArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the `search` command.
#[derive(Parser, Debug, Default)]
pub struct SearchArgs {
    /// Tags to search for; each one is a separate search
    #[arg(value_name = "TAGS", required = true, num_args = 1..)]
    pub tags: Vec<String>,

    /// Treat non-2xx HTTP statuses as failures
    #[arg(long)]
    pub strict_status: bool,

    /// API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Show at most N photos per tag
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

impl SearchArgs {
    /// Validate argument combinations.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AppError;

        if self.limit == Some(0) {
            return Err(AppError::ConfigInvalid {
                key: "limit".to_string(),
                value: "0".to_string(),
                message: "limit must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Config subcommands.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Show the resolved configuration and where each value came from
    Show,

    /// Print the config file path
    Path,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// Markdown output
    Md,
}

impl OutputFormat {
    /// Parse a format name (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "md" | "markdown" => Some(Self::Md),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::Md => "md",
        }
    }
}
