//! # Dataset Crate
//!
//! Domain types and persistence for the sampled board-game rating dataset.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (GamePool, RatingSlot, RatingsPage, rows)
//! - **store**: JSON checkpoint snapshots
//! - **csv**: Export of the final table
//! - **error**: Error types for dataset construction
//!
//! ## Example Usage
//!
//! ```ignore
//! use dataset::{GamePool, RatingSlot};
//!
//! let pool = GamePool::new(vec![(174430, 45231), (161936, 38810)])?;
//! let slot = RatingSlot::new(174430, 205);
//!
//! assert_eq!(slot.page(), 2);
//! assert_eq!(slot.page_index(), 4);
//! ```

// Public modules
pub mod csv;
pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DatasetError, Result};
pub use types::{
    // Type aliases and constants
    GameId,
    PAGE_SIZE,
    // Core types
    GamePool,
    RatingSlot,
    RatingsPage,
    GameSummary,
    RatingEntry,
    UserProfile,
    RatingRow,
    DatasetRow,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool_construction() {
        let pool = GamePool::new(Vec::new()).unwrap();
        assert!(pool.is_empty());
        assert_eq!(pool.total_ratings(), 0);
    }

    #[test]
    fn test_slot_page_convention() {
        // Position 100 stays on page 0 under the (position - 1) / 100
        // convention
        let slot = RatingSlot::new(1, 100);
        assert_eq!(slot.page(), 0);
        assert_eq!(slot.page_index(), 99);
    }
}
