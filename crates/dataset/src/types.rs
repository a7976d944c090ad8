//! Core domain types for the rating sample.
//!
//! This module defines the data that flows through the pipeline stages:
//! the collected game pool, the sampled rating slots, fetched ratings
//! pages, and the resolved/enriched output rows.

use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases & Constants
// =============================================================================

/// Unique identifier for a board game (the BGG object id)
pub type GameId = u32;

/// Number of rating entries per ratings page as exposed by the detail
/// endpoint
pub const PAGE_SIZE: u32 = 100;

// =============================================================================
// Game Pool
// =============================================================================

/// The outcome of rank collection plus rating-count lookup: the top-N games
/// in rank order, each with its total rating count.
///
/// Built once before sampling and immutable afterwards. The sampling weight
/// of a game is `rating_count / total_ratings`.
#[derive(Debug, Clone)]
pub struct GamePool {
    /// (game id, total rating count), in rank order
    entries: Vec<(GameId, u32)>,
    /// Lookup from game id to its index in `entries`
    index: HashMap<GameId, usize>,
}

impl GamePool {
    /// Build a pool from ranked (game id, rating count) pairs.
    ///
    /// Fails with [`DatasetError::DuplicateGame`] if the same id appears
    /// twice; a duplicate means the rank scrape went wrong and the ordinal
    /// correspondence can no longer be trusted.
    pub fn new(ranked: Vec<(GameId, u32)>) -> Result<Self> {
        let mut index = HashMap::with_capacity(ranked.len());
        for (i, (id, _)) in ranked.iter().enumerate() {
            if index.insert(*id, i).is_some() {
                return Err(DatasetError::DuplicateGame { id: *id });
            }
        }
        Ok(Self {
            entries: ranked,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (game id, rating count) pairs in rank order
    pub fn entries(&self) -> &[(GameId, u32)] {
        &self.entries
    }

    /// Total rating count for a game, if it is part of the pool
    pub fn rating_count(&self, id: GameId) -> Option<u32> {
        self.index.get(&id).map(|&i| self.entries[i].1)
    }

    /// Sum of rating counts over the whole pool
    pub fn total_ratings(&self) -> u64 {
        self.entries.iter().map(|&(_, c)| c as u64).sum()
    }
}

// =============================================================================
// Sampled Slots
// =============================================================================

/// One sample pick: a 1-based rating position within a game's full list of
/// ratings.
///
/// The page-boundary convention is fixed here and used for both fetching and
/// within-page indexing: positions 1–100 live on page 0, 101–200 on page 1,
/// and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingSlot {
    pub game_id: GameId,
    /// 1-based position in [1, rating_count]
    pub position: u32,
}

impl RatingSlot {
    pub fn new(game_id: GameId, position: u32) -> Self {
        Self { game_id, position }
    }

    /// Page number the position lands on: `(position - 1) / PAGE_SIZE`
    pub fn page(&self) -> u32 {
        self.position.saturating_sub(1) / PAGE_SIZE
    }

    /// Index of the position within its page: `(position - 1) % PAGE_SIZE`
    pub fn page_index(&self) -> usize {
        (self.position.saturating_sub(1) % PAGE_SIZE) as usize
    }
}

// =============================================================================
// Fetched Page Content
// =============================================================================

/// Item-level metadata carried by every ratings page of a game.
///
/// These fields are constant across pages of the same game, so they are safe
/// to read from whichever cached page serves a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub name: String,
    pub year_published: i32,
    /// Community complexity weight
    pub weight: f32,
    pub owners: u32,
    pub average_rating: f32,
}

/// A single (username, rating) entry on a ratings page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub username: String,
    pub rating: f32,
}

/// Parsed content of one fetched ratings page: the cache value keyed by
/// (game id, page number)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsPage {
    pub game: GameSummary,
    /// Up to [`PAGE_SIZE`] entries, in page order
    pub entries: Vec<RatingEntry>,
}

// =============================================================================
// User Metadata
// =============================================================================

/// The two scalar fields extracted from the user detail endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub year_registered: u16,
    /// Year component of the user's last login date
    pub last_login: u16,
}

// =============================================================================
// Output Rows
// =============================================================================

/// A resolved sample row: the slot plus the rating value, its author, and
/// the item-level metadata fields.
///
/// Written to the first checkpoint snapshot after bulk resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRow {
    pub game_id: GameId,
    pub position: u32,
    pub rating: f32,
    pub username: String,
    pub name: String,
    pub year_published: i32,
    pub weight: f32,
    pub owners: u32,
    pub average_rating: f32,
}

impl RatingRow {
    /// Assemble a row from a slot, the page entry it resolved to, and the
    /// game metadata of the serving page
    pub fn from_parts(slot: RatingSlot, entry: &RatingEntry, game: &GameSummary) -> Self {
        Self {
            game_id: slot.game_id,
            position: slot.position,
            rating: entry.rating,
            username: entry.username.clone(),
            name: game.name.clone(),
            year_published: game.year_published,
            weight: game.weight,
            owners: game.owners,
            average_rating: game.average_rating,
        }
    }
}

/// A fully enriched row: [`RatingRow`] plus the user-level fields.
///
/// This is the final table shape, written to the second checkpoint and the
/// CSV export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRow {
    pub game_id: GameId,
    pub position: u32,
    pub rating: f32,
    pub username: String,
    pub name: String,
    pub year_published: i32,
    pub weight: f32,
    pub owners: u32,
    pub average_rating: f32,
    pub year_registered: u16,
    pub last_login: u16,
}

impl DatasetRow {
    pub fn from_rating(row: RatingRow, user: UserProfile) -> Self {
        Self {
            game_id: row.game_id,
            position: row.position,
            rating: row.rating,
            username: row.username,
            name: row.name,
            year_published: row.year_published,
            weight: row.weight,
            owners: row.owners,
            average_rating: row.average_rating,
            year_registered: user.year_registered,
            last_login: user.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_rejects_duplicate_ids() {
        let result = GamePool::new(vec![(174430, 100), (161936, 50), (174430, 7)]);
        assert!(matches!(
            result,
            Err(DatasetError::DuplicateGame { id: 174430 })
        ));
    }

    #[test]
    fn test_pool_lookup_and_totals() {
        let pool = GamePool::new(vec![(1, 100), (2, 0), (3, 250)]).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.rating_count(1), Some(100));
        assert_eq!(pool.rating_count(2), Some(0));
        assert_eq!(pool.rating_count(99), None);
        assert_eq!(pool.total_ratings(), 350);
    }

    #[test]
    fn test_page_boundaries() {
        // Positions 1, 100, 101, 250 on a game with 250 ratings
        let cases = [(1, 0, 0), (100, 0, 99), (101, 1, 0), (250, 2, 49)];
        for (position, page, index) in cases {
            let slot = RatingSlot::new(42, position);
            assert_eq!(slot.page(), page, "page for position {}", position);
            assert_eq!(slot.page_index(), index, "index for position {}", position);
        }
    }

    #[test]
    fn test_page_round_trip() {
        // Reconstructing the position from (page, index) yields the original
        for position in 1..=500u32 {
            let slot = RatingSlot::new(1, position);
            let rebuilt = slot.page() * PAGE_SIZE + slot.page_index() as u32 + 1;
            assert_eq!(rebuilt, position);
        }
    }
}
