//! # BGG API Crate
//!
//! This crate talks to BoardGameGeek: the HTML rank listing and the three
//! XML API endpoints (batch rating counts, paginated ratings, user detail).
//!
//! ## Components
//!
//! - **client**: `BggClient` with courtesy pacing and bounded retry
//! - **parse**: structure-checked extraction from the fetched documents
//! - **error**: transient/fatal error classification
//!
//! ## Example Usage
//!
//! ```ignore
//! use bgg_api::BggClient;
//! use std::time::Duration;
//!
//! let client = BggClient::new()?.with_delay(Duration::from_secs(5));
//!
//! let top_of_list = client.ranked_page(1).await?;
//! let counts = client.rating_counts(&top_of_list[..50]).await?;
//! let page = client.ratings_page(top_of_list[0], 0).await?;
//! ```

// Public modules
pub mod client;
pub mod error;
pub mod parse;

// Re-export commonly used types
pub use client::BggClient;
pub use error::{ApiError, Result};
pub use parse::RANK_PAGE_SIZE;
