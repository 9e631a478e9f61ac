//! Human-readable output.
//!
//! Each tag gets a header followed by a card per photo, numbered by
//! position in the feed.

use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use crate::core::models::{FeedItem, SearchOutcome};
use crate::error::Result;
use crate::util::text::truncate;

/// Longest description shown on a card.
const DESCRIPTION_WIDTH: usize = 160;

/// Render search outcomes as photo cards.
pub fn render_search(
    outcomes: &[SearchOutcome],
    limit: Option<usize>,
    no_color: bool,
) -> Result<String> {
    let style = Style { no_color };
    let mut output = String::new();

    for (index, outcome) in outcomes.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        render_outcome(&mut output, outcome, limit, style).map_err(anyhow::Error::from)?;
    }

    Ok(output.trim_end().to_string())
}

fn render_outcome(
    out: &mut String,
    outcome: &SearchOutcome,
    limit: Option<usize>,
    style: Style,
) -> std::fmt::Result {
    let status = outcome
        .status
        .map(|status| format!(" (HTTP {status})"))
        .unwrap_or_default();
    writeln!(
        out,
        "{}{}",
        style.header(&format!("== {} ==", outcome.tag)),
        style.muted(&status)
    )?;

    if let Some(error) = &outcome.error {
        writeln!(
            out,
            "  {} {} {}",
            style.error("error:"),
            error.message,
            style.muted(&format!("[{}]", error.code))
        )?;
        return Ok(());
    }

    let Some(feed) = &outcome.feed else {
        return Ok(());
    };

    if feed.items.is_empty() {
        writeln!(out, "  {}", style.muted("No photos found"))?;
        return Ok(());
    }

    let shown = limit.unwrap_or(feed.items.len()).min(feed.items.len());
    for (position, item) in feed.items.iter().take(shown).enumerate() {
        render_card(out, position + 1, item, style)?;
    }
    if shown < feed.items.len() {
        writeln!(
            out,
            "  {}",
            style.muted(&format!("... {} more", feed.items.len() - shown))
        )?;
    }

    Ok(())
}

fn render_card(
    out: &mut String,
    position: usize,
    item: &FeedItem,
    style: Style,
) -> std::fmt::Result {
    let title = if item.title.trim().is_empty() {
        "(untitled)"
    } else {
        item.title.trim()
    };
    writeln!(out, "{:>3}. {}", position, style.title(title))?;

    match item.image_url() {
        Some(url) => writeln!(out, "     {}", style.link(url.as_str()))?,
        None => writeln!(out, "     {}", style.muted("(no image)"))?,
    }

    let description = item.plain_description().replace('\n', " ");
    if !description.is_empty() {
        writeln!(out, "     {}", truncate(&description, DESCRIPTION_WIDTH))?;
    }

    if !item.author.is_empty() {
        writeln!(out, "     {} {}", style.muted("by"), item.author)?;
    }

    let tags = item.tag_list();
    if !tags.is_empty() {
        let tags = tags.iter().map(|tag| format!("#{tag}")).collect::<Vec<_>>();
        writeln!(out, "     {}", style.muted(&tags.join(" ")))?;
    }

    Ok(())
}

/// Colors applied unless disabled.
#[derive(Clone, Copy)]
struct Style {
    no_color: bool,
}

impl Style {
    fn paint(self, text: &str, f: impl FnOnce(&str) -> ColoredString) -> String {
        if self.no_color {
            text.to_string()
        } else {
            f(text).to_string()
        }
    }

    fn header(self, text: &str) -> String {
        self.paint(text, |t| t.cyan().bold())
    }

    fn title(self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    fn link(self, text: &str) -> String {
        self.paint(text, |t| t.blue().underline())
    }

    fn muted(self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    fn error(self, text: &str) -> String {
        self.paint(text, |t| t.red().bold())
    }
}
