//! Output rendering for human and robot modes.

pub mod error;
pub mod human;
pub mod robot;

use crate::cli::args::OutputFormat;
use crate::core::models::SearchOutcome;
use crate::error::Result;

/// Render search outcomes.
pub fn render_search(
    outcomes: &[SearchOutcome],
    format: OutputFormat,
    limit: Option<usize>,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => human::render_search(outcomes, limit, no_color),
        OutputFormat::Json => robot::render_search_json(outcomes, limit, pretty),
        OutputFormat::Md => robot::render_search_md(outcomes, limit),
    }
}
