//! End-to-end pipeline: collect → sample → resolve → enrich.
//!
//! Each stage takes the previous stage's output as an explicit input and
//! returns an explicit output; there is no shared mutable state between
//! stages beyond the resolver's own page cache. Two checkpoint snapshots
//! are written when a checkpoint directory is configured: the resolved
//! rows after bulk resolution and the full dataset after enrichment.

use crate::collect::{ListingSource, build_game_pool, collect_top_games};
use crate::enrich::{UserSource, enrich_rows};
use crate::resolve::{PageSource, Resolver};
use crate::sample::WeightedSampler;
use anyhow::{Context, Result};
use bgg_api::BggClient;
use dataset::{DatasetRow, GameId, RatingsPage, UserProfile, store};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Pipeline parameters; the defaults reproduce the original collection run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Size of the ranked population to sample from
    pub top_n: usize,
    /// Number of sample rows to draw
    pub sample_size: usize,
    /// Games per batch request when fetching rating counts
    pub batch_size: usize,
    /// RNG seed; a fixed seed reproduces the sample exactly
    pub seed: u64,
    /// Where to write the two checkpoint snapshots; `None` disables them
    pub checkpoint_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: 2500,
            sample_size: 10_000,
            batch_size: 50,
            seed: 0,
            checkpoint_dir: None,
        }
    }
}

/// Run the whole pipeline against `source` and return the final table
pub async fn run<S>(source: &S, config: &PipelineConfig) -> Result<Vec<DatasetRow>>
where
    S: ListingSource + PageSource + UserSource,
{
    let start = Instant::now();

    info!(top_n = config.top_n, "collecting ranked games");
    let ids = collect_top_games(source, config.top_n)
        .await
        .context("collecting ranked games")?;

    let pool = build_game_pool(source, &ids, config.batch_size)
        .await
        .context("building game pool")?;

    let sampler = WeightedSampler::new(config.sample_size, config.seed);
    let slots = sampler.draw(&pool).context("drawing weighted sample")?;
    info!(slots = slots.len(), seed = config.seed, "drew sample slots");

    let mut resolver = Resolver::new(source);
    let rows = resolver
        .resolve(&slots)
        .await
        .context("resolving sample rows")?;
    if let Some(dir) = &config.checkpoint_dir {
        let path = store::write_checkpoint(dir, store::RATINGS_SNAPSHOT, &rows)
            .context("writing ratings checkpoint")?;
        info!(path = %path.display(), "wrote ratings checkpoint");
    }

    let dataset = enrich_rows(source, rows)
        .await
        .context("enriching rows with user metadata")?;
    if let Some(dir) = &config.checkpoint_dir {
        let path = store::write_checkpoint(dir, store::DATASET_SNAPSHOT, &dataset)
            .context("writing dataset checkpoint")?;
        info!(path = %path.display(), "wrote dataset checkpoint");
    }

    info!(
        rows = dataset.len(),
        elapsed = ?start.elapsed(),
        "pipeline complete"
    );
    Ok(dataset)
}

// Live wiring: the client satisfies all three stage seams

impl ListingSource for BggClient {
    async fn ranked_page(&self, page: u32) -> Result<Vec<GameId>> {
        Ok(BggClient::ranked_page(self, page).await?)
    }

    async fn rating_counts(&self, ids: &[GameId]) -> Result<Vec<(GameId, u32)>> {
        Ok(BggClient::rating_counts(self, ids).await?)
    }
}

impl PageSource for BggClient {
    async fn ratings_page(&self, game_id: GameId, page: u32) -> Result<RatingsPage> {
        Ok(BggClient::ratings_page(self, game_id, page).await?)
    }
}

impl UserSource for BggClient {
    async fn user_profile(&self, username: &str) -> Result<UserProfile> {
        Ok(BggClient::user_profile(self, username).await?)
    }
}
