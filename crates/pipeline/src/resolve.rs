//! Rating resolution with a per-(game, page) fetch cache.
//!
//! Every sampled slot maps to one page of its game's ratings. Pages are
//! fetched lazily, at most once per (game id, page number) key, and kept
//! for the remainder of the run, so rows that land on the same page share a
//! single fetch. The fetch counter backs both the end-of-stage log line and
//! the cache tests.

use anyhow::{Result, bail};
use dataset::{GameId, RatingRow, RatingsPage, RatingSlot};
use std::collections::HashMap;
use tracing::{debug, info};

/// Source of ratings pages; implemented by the live client and by test
/// doubles
pub trait PageSource {
    /// One 0-based page of a game's ratings
    async fn ratings_page(&self, game_id: GameId, page: u32) -> Result<RatingsPage>;
}

/// Resolves sampled slots to rating rows through the page cache
pub struct Resolver<'s, S> {
    source: &'s S,
    cache: HashMap<(GameId, u32), RatingsPage>,
    fetches: usize,
}

impl<'s, S: PageSource> Resolver<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
            fetches: 0,
        }
    }

    /// Number of pages actually fetched so far; equals the number of
    /// distinct (game, page) keys touched
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    /// Resolve every slot to a [`RatingRow`], in slot order.
    ///
    /// A slot whose in-page index is beyond the entries present on the page
    /// means the collected rating count disagrees with the live data, which
    /// fails the run.
    pub async fn resolve(&mut self, slots: &[RatingSlot]) -> Result<Vec<RatingRow>> {
        let mut rows = Vec::with_capacity(slots.len());
        for slot in slots {
            let key = (slot.game_id, slot.page());
            if !self.cache.contains_key(&key) {
                debug!(
                    game_id = slot.game_id,
                    page = slot.page(),
                    "fetching ratings page"
                );
                let page = self.source.ratings_page(slot.game_id, slot.page()).await?;
                self.fetches += 1;
                self.cache.insert(key, page);
            }

            let page = &self.cache[&key];
            let Some(entry) = page.entries.get(slot.page_index()) else {
                bail!(
                    "game {} page {} holds {} entries, but position {} needs index {}",
                    slot.game_id,
                    slot.page(),
                    page.entries.len(),
                    slot.position,
                    slot.page_index()
                );
            };
            rows.push(RatingRow::from_parts(*slot, entry, &page.game));
        }
        info!(
            rows = rows.len(),
            fetches = self.fetches,
            "resolved sample rows"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::{GameSummary, RatingEntry};
    use std::cell::RefCell;
    use std::collections::HashSet;

    fn summary(name: &str) -> GameSummary {
        GameSummary {
            name: name.to_string(),
            year_published: 2017,
            weight: 3.86,
            owners: 68123,
            average_rating: 8.74,
        }
    }

    /// Page source over synthetic data: game `g` has `count` ratings, the
    /// entry at position p is (user-p, rating p % 10)
    struct SyntheticPages {
        counts: HashMap<GameId, u32>,
        calls: RefCell<Vec<(GameId, u32)>>,
    }

    impl SyntheticPages {
        fn new(counts: &[(GameId, u32)]) -> Self {
            Self {
                counts: counts.iter().copied().collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn distinct_calls(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .copied()
                .collect::<HashSet<_>>()
                .len()
        }
    }

    impl PageSource for SyntheticPages {
        async fn ratings_page(&self, game_id: GameId, page: u32) -> Result<RatingsPage> {
            self.calls.borrow_mut().push((game_id, page));
            let Some(&count) = self.counts.get(&game_id) else {
                bail!("unexpected game {game_id}");
            };
            let first = page * 100 + 1;
            let last = (first + 99).min(count);
            let entries = (first..=last)
                .map(|p| RatingEntry {
                    username: format!("user-{p}"),
                    rating: (p % 10) as f32,
                })
                .collect();
            Ok(RatingsPage {
                game: summary(&format!("Game {game_id}")),
                entries,
            })
        }
    }

    #[tokio::test]
    async fn test_same_page_is_fetched_once() {
        // Positions 5 and 17 both live on page 0
        let source = SyntheticPages::new(&[(1, 250)]);
        let mut resolver = Resolver::new(&source);

        let slots = [RatingSlot::new(1, 5), RatingSlot::new(1, 17)];
        let rows = resolver.resolve(&slots).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(resolver.fetches(), 1);
        assert_eq!(*source.calls.borrow(), vec![(1, 0)]);
    }

    #[tokio::test]
    async fn test_fetches_equal_distinct_pages() {
        let source = SyntheticPages::new(&[(1, 250), (2, 250)]);
        let mut resolver = Resolver::new(&source);

        // Game 1 touches pages 0, 0, 1, 2; game 2 touches page 0
        let slots = [
            RatingSlot::new(1, 1),
            RatingSlot::new(1, 100),
            RatingSlot::new(1, 101),
            RatingSlot::new(1, 250),
            RatingSlot::new(2, 42),
        ];
        let rows = resolver.resolve(&slots).await.unwrap();

        assert_eq!(rows.len(), 5);
        assert_eq!(resolver.fetches(), 4);
        assert_eq!(source.distinct_calls(), 4);
    }

    #[tokio::test]
    async fn test_rows_carry_entry_and_metadata() {
        let source = SyntheticPages::new(&[(7, 300)]);
        let mut resolver = Resolver::new(&source);

        let rows = resolver.resolve(&[RatingSlot::new(7, 205)]).await.unwrap();

        let row = &rows[0];
        assert_eq!(row.game_id, 7);
        assert_eq!(row.position, 205);
        assert_eq!(row.username, "user-205");
        assert_eq!(row.rating, 5.0);
        assert_eq!(row.name, "Game 7");
        assert_eq!(row.owners, 68123);
    }

    #[tokio::test]
    async fn test_position_beyond_page_contents_fails() {
        // Game reports 250 ratings, so page 2 holds indices 0..=49; a
        // position past the real count must not resolve silently
        let source = SyntheticPages::new(&[(1, 250)]);
        let mut resolver = Resolver::new(&source);

        let err = resolver
            .resolve(&[RatingSlot::new(1, 260)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("needs index 59"));
    }

    #[tokio::test]
    async fn test_resolution_order_matches_slot_order() {
        let source = SyntheticPages::new(&[(1, 250), (2, 250)]);
        let mut resolver = Resolver::new(&source);

        let slots = [
            RatingSlot::new(2, 10),
            RatingSlot::new(1, 10),
            RatingSlot::new(2, 11),
        ];
        let rows = resolver.resolve(&slots).await.unwrap();
        let order: Vec<(u32, u32)> = rows.iter().map(|r| (r.game_id, r.position)).collect();
        assert_eq!(order, vec![(2, 10), (1, 10), (2, 11)]);
    }
}
