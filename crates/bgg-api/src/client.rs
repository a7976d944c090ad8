//! HTTP client for the BGG site and XML API.
//!
//! One `BggClient` serves all four external interfaces: the HTML rank
//! listing, the batch rating-count endpoint, the paginated ratings endpoint
//! and the user detail endpoint. Every call is followed by a fixed courtesy
//! delay, and transient failures (transport errors, HTTP 202/429/5xx) are
//! retried a bounded number of times with linear backoff. Any other failure
//! is fatal to the run.

use crate::error::{ApiError, Result};
use crate::parse;
use dataset::{GameId, RatingsPage, UserProfile};
use std::time::Duration;
use tracing::{debug, warn};

const SITE_URL: &str = "https://boardgamegeek.com";
const API_URL: &str = "https://boardgamegeek.com/xmlapi2";
const USER_AGENT: &str = concat!("bgg-sampler/", env!("CARGO_PKG_VERSION"));

/// Client for the BGG endpoints with pacing and bounded retry
pub struct BggClient {
    http: reqwest::Client,
    site_url: String,
    api_url: String,
    /// Courtesy delay after every network call
    delay: Duration,
    /// Retry attempts for transient failures, on top of the first try
    max_retries: u32,
    /// Base backoff; attempt n waits n times this
    backoff: Duration,
}

impl BggClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self {
            http,
            site_url: SITE_URL.to_string(),
            api_url: API_URL.to_string(),
            delay: Duration::from_secs(5),
            max_retries: 3,
            backoff: Duration::from_secs(2),
        })
    }

    /// Configure the courtesy delay between calls (default: 5 s)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Configure retry attempts for transient failures (default: 3)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Point the client at a different host (mirrors, test servers)
    pub fn with_base_urls(mut self, site_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self.api_url = api_url.into();
        self
    }

    /// One page of the rank listing, already reduced to game ids.
    ///
    /// `page` is 1-based, matching the listing URL scheme.
    pub async fn ranked_page(&self, page: u32) -> Result<Vec<GameId>> {
        let url = format!("{}/browse/boardgame/page/{}", self.site_url, page);
        let html = self.get_text(&url).await?;
        let first_rank = (page as usize - 1) * parse::RANK_PAGE_SIZE + 1;
        parse::parse_rank_page(&html, first_rank)
    }

    /// Total rating counts for a batch of game ids
    pub async fn rating_counts(&self, ids: &[GameId]) -> Result<Vec<(GameId, u32)>> {
        let csv = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/thing?id={}&ratingcomments=1", self.api_url, csv);
        let xml = self.get_text(&url).await?;
        parse::parse_rating_counts(&xml)
    }

    /// One ratings page of a game; `page` is the 0-based page number derived
    /// from the sampled position (the endpoint's own page parameter is
    /// 1-based)
    pub async fn ratings_page(&self, id: GameId, page: u32) -> Result<RatingsPage> {
        let url = format!(
            "{}/thing?id={}&stats=1&ratingcomments=1&page={}",
            self.api_url,
            id,
            page + 1
        );
        let xml = self.get_text(&url).await?;
        parse::parse_ratings_page(&xml)
    }

    /// Registration year and last-login year for one user
    pub async fn user_profile(&self, username: &str) -> Result<UserProfile> {
        let url = format!(
            "{}/user?name={}",
            self.api_url,
            encode_component(username)
        );
        let xml = self.get_text(&url).await?;
        parse::parse_user_profile(&xml)
    }

    /// GET with pacing and bounded retry for transient failures
    async fn get_text(&self, url: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_get(url).await {
                Ok(body) => {
                    debug!(url, attempt, bytes = body.len(), "fetched");
                    tokio::time::sleep(self.delay).await;
                    return Ok(body);
                }
                Err(err) if err.is_transient() && attempt <= self.max_retries => {
                    warn!(url, attempt, error = %err, "transient fetch error; backing off");
                    tokio::time::sleep(self.backoff.saturating_mul(attempt)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_get(&self, url: &str) -> Result<String> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() || status.as_u16() == 202 {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(|source| ApiError::Http {
            url: url.to_string(),
            source,
        })
    }
}

/// Percent-encode a query component; usernames may contain spaces and
/// punctuation
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(ch),
            _ => {
                for byte in ch.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component_passthrough() {
        assert_eq!(encode_component("meeplequeen"), "meeplequeen");
        assert_eq!(encode_component("dice_goblin-2.0"), "dice_goblin-2.0");
    }

    #[test]
    fn test_encode_component_reserved_chars() {
        assert_eq!(encode_component("alpha gamer"), "alpha%20gamer");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_component("caf\u{e9}"), "caf%C3%A9");
    }
}
