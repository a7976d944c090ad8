//! # Pipeline Crate
//!
//! The four stages that turn the live site into a sampled rating dataset,
//! chained by [`run::run`]:
//!
//! 1. **collect**: scan the rank listing, fetch rating counts in batches,
//!    build the [`dataset::GamePool`]
//! 2. **sample**: draw the (game, position) slots, games weighted by
//!    rating count, positions without replacement per game
//! 3. **resolve**: fetch each referenced ratings page at most once and
//!    extract the sampled ratings plus game metadata
//! 4. **enrich**: one fetch per unique username for the user-level fields
//!
//! Every stage talks to the outside world through a small trait
//! (`ListingSource`, `PageSource`, `UserSource`), implemented by
//! [`bgg_api::BggClient`] for live runs and by in-memory doubles in tests.
//!
//! ## Example Usage
//!
//! ```ignore
//! use bgg_api::BggClient;
//! use pipeline::{PipelineConfig, run};
//!
//! let client = BggClient::new()?;
//! let config = PipelineConfig::default();
//! let dataset = run::run(&client, &config).await?;
//! ```

// The source traits are only used from the current thread; no Send bound
// is required of implementors.
#![allow(async_fn_in_trait)]

// Public modules
pub mod collect;
pub mod enrich;
pub mod resolve;
pub mod run;
pub mod sample;

// Re-export commonly used types
pub use collect::ListingSource;
pub use enrich::UserSource;
pub use resolve::{PageSource, Resolver};
pub use run::PipelineConfig;
pub use sample::WeightedSampler;
