//! Robot-mode output (JSON and Markdown).
//!
//! Provides stable, token-efficient output for scripts and agents.

use std::fmt::Write as _;

use crate::core::models::{RobotOutput, SearchOutcome};
use crate::error::Result;

/// Render any `RobotOutput` as JSON.
pub fn render_json<T: serde::Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string(output)?)
}

/// Render any `RobotOutput` as pretty JSON.
pub fn render_json_pretty<T: serde::Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Render search outcomes as JSON.
///
/// `limit` caps the items of each feed.
pub fn render_search_json(
    outcomes: &[SearchOutcome],
    limit: Option<usize>,
    pretty: bool,
) -> Result<String> {
    let output = RobotOutput::new("search", limited(outcomes, limit));

    if pretty {
        render_json_pretty(&output)
    } else {
        render_json(&output)
    }
}

/// Render search outcomes as Markdown.
pub fn render_search_md(outcomes: &[SearchOutcome], limit: Option<usize>) -> Result<String> {
    let mut output = String::new();

    for outcome in limited(outcomes, limit) {
        write_outcome_md(&mut output, &outcome).map_err(anyhow::Error::from)?;
    }

    Ok(output)
}

fn write_outcome_md(out: &mut String, outcome: &SearchOutcome) -> std::fmt::Result {
    writeln!(out, "## {}", outcome.tag)?;
    if let Some(status) = outcome.status {
        writeln!(out, "- status: {status}")?;
    }

    if let Some(error) = &outcome.error {
        writeln!(out, "- error: {} ({})", error.message, error.code)?;
    }

    if let Some(feed) = &outcome.feed {
        writeln!(out, "- photos: {}", feed.items.len())?;
        writeln!(out, "- updated: {}", feed.modified.to_rfc3339())?;
        writeln!(out)?;
        for (position, item) in feed.items.iter().enumerate() {
            let title = item.title.trim();
            let title = if title.is_empty() { "(untitled)" } else { title };
            writeln!(out, "{}. [{}]({})", position + 1, title, item.link)?;
            writeln!(out, "   - image: {}", item.media.m)?;
            writeln!(out, "   - author: {}", item.author)?;
            if !item.tags.is_empty() {
                writeln!(out, "   - tags: {}", item.tag_list().join(", "))?;
            }
        }
    }

    writeln!(out)
}

fn limited(outcomes: &[SearchOutcome], limit: Option<usize>) -> Vec<SearchOutcome> {
    outcomes
        .iter()
        .cloned()
        .map(|mut outcome| {
            if let (Some(limit), Some(feed)) = (limit, outcome.feed.as_mut()) {
                feed.items.truncate(limit);
            }
            outcome
        })
        .collect()
}
