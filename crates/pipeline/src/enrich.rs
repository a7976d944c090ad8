//! User enrichment of resolved rows.
//!
//! Usernames are deduplicated before fetching: the same user often
//! contributes several sampled ratings, and one fetch per unique name is
//! all the user endpoint needs. Iteration order over the deduplicated set
//! is deterministic so runs against a recorded source replay identically.

use anyhow::{Context, Result, anyhow};
use dataset::{DatasetRow, RatingRow, UserProfile};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Source of user metadata; implemented by the live client and by test
/// doubles
pub trait UserSource {
    async fn user_profile(&self, username: &str) -> Result<UserProfile>;
}

/// Attach registration year and last-login year to every row
pub async fn enrich_rows<S: UserSource>(
    source: &S,
    rows: Vec<RatingRow>,
) -> Result<Vec<DatasetRow>> {
    let unique: BTreeSet<&str> = rows.iter().map(|r| r.username.as_str()).collect();
    info!(
        rows = rows.len(),
        users = unique.len(),
        "enriching rows with user metadata"
    );

    let mut profiles: HashMap<String, UserProfile> = HashMap::with_capacity(unique.len());
    for name in unique {
        let profile = source
            .user_profile(name)
            .await
            .with_context(|| format!("fetching user '{name}'"))?;
        profiles.insert(name.to_string(), profile);
    }

    rows.into_iter()
        .map(|row| {
            let profile = profiles
                .get(&row.username)
                .copied()
                .ok_or_else(|| anyhow!("no profile fetched for '{}'", row.username))?;
            Ok(DatasetRow::from_rating(row, profile))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct YearbookSource {
        calls: RefCell<Vec<String>>,
    }

    impl YearbookSource {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl UserSource for YearbookSource {
        async fn user_profile(&self, username: &str) -> Result<UserProfile> {
            self.calls.borrow_mut().push(username.to_string());
            // Deterministic fake: registration year from the name length
            Ok(UserProfile {
                year_registered: 2000 + username.len() as u16,
                last_login: 2018,
            })
        }
    }

    fn row(game_id: u32, position: u32, username: &str) -> RatingRow {
        RatingRow {
            game_id,
            position,
            rating: 8.0,
            username: username.to_string(),
            name: "Some Game".to_string(),
            year_published: 2015,
            weight: 2.5,
            owners: 1000,
            average_rating: 7.9,
        }
    }

    #[tokio::test]
    async fn test_each_user_fetched_once() {
        let source = YearbookSource::new();
        let rows = vec![
            row(1, 5, "meeplequeen"),
            row(1, 17, "dice_goblin"),
            row(2, 3, "meeplequeen"),
            row(3, 99, "meeplequeen"),
        ];

        let dataset = enrich_rows(&source, rows).await.unwrap();

        assert_eq!(dataset.len(), 4);
        // Two unique users, fetched in deterministic (sorted) order
        assert_eq!(
            *source.calls.borrow(),
            vec!["dice_goblin".to_string(), "meeplequeen".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rows_keep_order_and_gain_user_fields() {
        let source = YearbookSource::new();
        let rows = vec![row(1, 5, "abc"), row(2, 7, "defgh")];

        let dataset = enrich_rows(&source, rows).await.unwrap();

        assert_eq!(dataset[0].game_id, 1);
        assert_eq!(dataset[0].year_registered, 2003);
        assert_eq!(dataset[1].game_id, 2);
        assert_eq!(dataset[1].year_registered, 2005);
        assert!(dataset.iter().all(|r| r.last_login == 2018));
    }

    #[tokio::test]
    async fn test_empty_input_is_fine() {
        let source = YearbookSource::new();
        let dataset = enrich_rows(&source, Vec::new()).await.unwrap();
        assert!(dataset.is_empty());
        assert!(source.calls.borrow().is_empty());
    }
}
