//! Rank collection and rating-count lookup.
//!
//! Scans successive listing pages until the target population size is
//! reached, then fetches each game's total rating count in batches and
//! assembles the [`GamePool`] the sampler draws from.

use anyhow::{Context, Result, bail};
use dataset::{GameId, GamePool};
use std::collections::HashMap;
use tracing::{debug, info};

/// Source of the ranked listing and the batch rating counts; implemented by
/// the live client and by test doubles
pub trait ListingSource {
    /// Game ids of one listing page (1-based page number), in rank order
    async fn ranked_page(&self, page: u32) -> Result<Vec<GameId>>;

    /// (game id, total rating count) for a batch of ids
    async fn rating_counts(&self, ids: &[GameId]) -> Result<Vec<(GameId, u32)>>;
}

/// Collect the ordered ids of the `top_n` ranked games
pub async fn collect_top_games<S: ListingSource>(source: &S, top_n: usize) -> Result<Vec<GameId>> {
    let mut ids = Vec::with_capacity(top_n);
    let mut page = 1u32;
    while ids.len() < top_n {
        let page_ids = source
            .ranked_page(page)
            .await
            .with_context(|| format!("fetching rank listing page {page}"))?;
        if page_ids.is_empty() {
            bail!("rank listing ended after {} of {} games", ids.len(), top_n);
        }
        debug!(page, games = page_ids.len(), "collected listing page");
        ids.extend(page_ids);
        page += 1;
    }
    ids.truncate(top_n);
    info!(games = ids.len(), pages = page - 1, "collected ranked games");
    Ok(ids)
}

/// Fetch rating counts for `ids` in batches of `batch_size` and build the
/// pool, preserving rank order.
///
/// A game missing from its batch response is a structural mismatch and
/// fails the run; so does a duplicate id in the collected list.
pub async fn build_game_pool<S: ListingSource>(
    source: &S,
    ids: &[GameId],
    batch_size: usize,
) -> Result<GamePool> {
    let mut counts: HashMap<GameId, u32> = HashMap::with_capacity(ids.len());
    for chunk in ids.chunks(batch_size.max(1)) {
        let batch = source
            .rating_counts(chunk)
            .await
            .with_context(|| format!("fetching rating counts for batch of {}", chunk.len()))?;
        for (id, count) in batch {
            counts.insert(id, count);
        }
    }

    let mut ranked = Vec::with_capacity(ids.len());
    for &id in ids {
        let Some(&count) = counts.get(&id) else {
            bail!("batch response did not include game {id}");
        };
        ranked.push((id, count));
    }

    let pool = GamePool::new(ranked)?;
    info!(
        games = pool.len(),
        total_ratings = pool.total_ratings(),
        "built game pool"
    );
    Ok(pool)
}
