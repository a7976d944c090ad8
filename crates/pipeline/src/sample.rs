//! Weighted sampling of rating slots.
//!
//! ## Algorithm
//! 1. Draw `sample_size` game ids with replacement, probability of each
//!    game proportional to its total rating count (zero-count games carry
//!    zero weight and are never drawn)
//! 2. For each distinct game drawn k times, draw k distinct positions
//!    uniformly without replacement from [1, rating_count]
//! 3. Emit (game, position) slots in draw order
//!
//! Both stages consume one seeded RNG in a fixed order, so a fixed seed
//! reproduces the sample exactly.

use dataset::error::{DatasetError, Result};
use dataset::{GamePool, RatingSlot};
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::collections::VecDeque;
use tracing::debug;

/// Draws a fixed-size multiset of rating slots from a game pool
pub struct WeightedSampler {
    sample_size: usize,
    seed: u64,
}

impl WeightedSampler {
    pub fn new(sample_size: usize, seed: u64) -> Self {
        Self { sample_size, seed }
    }

    /// Draw the full slot list for `pool`.
    ///
    /// Fails with [`DatasetError::EmptyPool`] when no game has a nonzero
    /// rating count, and with [`DatasetError::SampleRange`] when a game was
    /// drawn more often than it has ratings, which can only happen when
    /// the sample size approaches the pool's total rating count.
    pub fn draw(&self, pool: &GamePool) -> Result<Vec<RatingSlot>> {
        let weights: Vec<u64> = pool.entries().iter().map(|&(_, c)| c as u64).collect();
        let dist = WeightedIndex::new(&weights).map_err(|_| DatasetError::EmptyPool)?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        // Stage 1: games, with replacement
        let mut draws = Vec::with_capacity(self.sample_size);
        let mut draw_counts: HashMap<_, usize> = HashMap::new();
        for _ in 0..self.sample_size {
            let (id, _) = pool.entries()[dist.sample(&mut rng)];
            draws.push(id);
            *draw_counts.entry(id).or_insert(0) += 1;
        }
        debug!(
            distinct_games = draw_counts.len(),
            draws = draws.len(),
            "drew weighted game sample"
        );

        // Stage 2: positions, without replacement, processing games in
        // first-draw order so the RNG consumption order is reproducible
        let mut positions: HashMap<_, VecDeque<u32>> = HashMap::with_capacity(draw_counts.len());
        for &id in &draws {
            if positions.contains_key(&id) {
                continue;
            }
            let requested = draw_counts[&id];
            let available = pool
                .rating_count(id)
                .ok_or(DatasetError::UnknownGame { id })?;
            if requested > available as usize {
                return Err(DatasetError::SampleRange {
                    game_id: id,
                    requested,
                    available,
                });
            }
            let picks = rand::seq::index::sample(&mut rng, available as usize, requested);
            positions.insert(id, picks.into_iter().map(|i| i as u32 + 1).collect());
        }

        // Stage 3: emit in draw order; every queue holds exactly as many
        // positions as the game was drawn
        let mut slots = Vec::with_capacity(draws.len());
        for &id in &draws {
            if let Some(queue) = positions.get_mut(&id) {
                if let Some(position) = queue.pop_front() {
                    slots.push(RatingSlot::new(id, position));
                }
            }
        }
        Ok(slots)
    }
}
