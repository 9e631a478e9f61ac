//! Search command implementation.

use futures::future::join_all;

use crate::cli::args::SearchArgs;
use crate::core::client::{ApiClient, ApiResult};
use crate::core::feed::{FeedService, normalize_search};
use crate::core::http::{HttpDebug, ReqwestTransport, Transport};
use crate::core::models::{OutcomeError, PhotoFeed, SearchOutcome};
use crate::error::{ApiError, AppError, Result};
use crate::render;
use crate::storage::ResolvedConfig;

/// Outcomes of one search run, in tag order.
#[derive(Debug, Default)]
pub struct SearchResults {
    pub outcomes: Vec<SearchOutcome>,
    pub failures: Vec<(String, ApiError)>,
}

/// Execute the search command.
pub async fn execute(args: &SearchArgs, config: &ResolvedConfig) -> Result<()> {
    args.validate()?;
    let tags = normalize_tags(&args.tags)?;

    let transport = ReqwestTransport::new(HttpDebug::resolve(config.http_debug))
        .map_err(ApiError::from)?;
    let client = ApiClient::new(transport)
        .with_base_domain(config.base_url.as_str())
        .with_status_policy(config.status_policy);
    let service = FeedService::new(client);

    tracing::debug!(?tags, base_url = %config.base_url, "Starting feed search");
    let mut results = search_all(&service, &tags).await;

    if results.outcomes.len() == 1 && results.failures.len() == 1 {
        if let Some((tag, source)) = results.failures.pop() {
            return Err(AppError::Search { tag, source });
        }
    }

    let output = render::render_search(
        &results.outcomes,
        config.format,
        args.limit,
        config.pretty,
        config.no_color,
    )?;
    println!("{output}");

    if !results.failures.is_empty() {
        return Err(AppError::PartialFailure {
            failed: results.failures.len(),
        });
    }

    Ok(())
}

/// Trim tags and drop blank ones.
///
/// # Errors
///
/// Returns [`AppError::BlankSearch`] if every tag is blank.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<&str>> {
    let normalized: Vec<&str> = tags.iter().filter_map(|tag| normalize_search(tag)).collect();
    if normalized.is_empty() {
        return Err(AppError::BlankSearch);
    }
    if normalized.len() < tags.len() {
        tracing::warn!(skipped = tags.len() - normalized.len(), "Skipping blank tags");
    }
    Ok(normalized)
}

/// Run one independent search per tag, concurrently.
pub async fn search_all<T: Transport>(service: &FeedService<T>, tags: &[&str]) -> SearchResults {
    let calls = tags.iter().map(|tag| async move { (*tag, service.search(tag).await) });

    let mut results = SearchResults::default();
    for (tag, result) in join_all(calls).await {
        let (outcome, error) = to_outcome(tag, result);
        if let Some(error) = error {
            results.failures.push((tag.to_string(), error));
        }
        results.outcomes.push(outcome);
    }
    results
}

fn to_outcome(
    tag: &str,
    result: ApiResult<PhotoFeed, ApiError>,
) -> (SearchOutcome, Option<ApiError>) {
    match result {
        ApiResult::Success { response, value } => (
            SearchOutcome {
                tag: tag.to_string(),
                status: Some(response.status),
                feed: Some(value),
                error: None,
            },
            None,
        ),
        ApiResult::Failure { response, error } => {
            tracing::debug!(tag, code = error.error_code(), %error, "Search failed");
            let outcome = SearchOutcome {
                tag: tag.to_string(),
                status: response.map(|r| r.status),
                feed: None,
                error: Some(OutcomeError {
                    code: error.error_code().to_string(),
                    message: error.user_message(),
                }),
            };
            (outcome, Some(error))
        }
    }
}
