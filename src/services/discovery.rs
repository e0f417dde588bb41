use rand::{seq::SliceRandom, Rng};

use crate::{
    error::AppResult,
    models::{FilterCriteria, MovieSummary},
    services::providers::MovieProvider,
};

/// Random pages are drawn from the first `MAX_RANDOM_PAGE` pages only
pub const MAX_RANDOM_PAGE: u32 = 10;

/// Picks a page uniformly from `[1, min(total_pages, MAX_RANDOM_PAGE)]`.
/// A provider reporting zero pages still yields page 1.
pub fn choose_page<R: Rng + ?Sized>(total_pages: u32, rng: &mut R) -> u32 {
    rng.gen_range(1..=total_pages.clamp(1, MAX_RANDOM_PAGE))
}

/// Fetches one random page of movies matching `criteria` and returns it shuffled.
///
/// Any provider failure is logged and yields an empty list.
pub async fn discover_and_prefetch(
    provider: &dyn MovieProvider,
    criteria: &FilterCriteria,
) -> Vec<MovieSummary> {
    match discover_random_page(provider, criteria).await {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = provider.name(),
                "Discover request failed, returning no results"
            );
            Vec::new()
        }
    }
}

async fn discover_random_page(
    provider: &dyn MovieProvider,
    criteria: &FilterCriteria,
) -> AppResult<Vec<MovieSummary>> {
    // Page count is only known after a first request
    let first = provider.discover(criteria, 1).await?;
    let page = choose_page(first.total_pages, &mut rand::thread_rng());

    let mut results = provider.discover(criteria, page).await?.results;
    results.shuffle(&mut rand::thread_rng());

    tracing::info!(
        total_pages = first.total_pages,
        page,
        results = results.len(),
        "Prefetched recommendations"
    );

    Ok(results)
}
