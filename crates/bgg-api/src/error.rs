//! Error types for the BGG client and document extraction.
//!
//! Failures split three ways: transport problems and throttling responses
//! are transient (the client retries them with bounded attempts), any other
//! HTTP status is fatal, and a missing element or attribute is a structural
//! mismatch that means the site or API changed shape, which is also fatal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport-level failure (connect, timeout, body read)
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// An element the extraction depends on was absent
    #[error("Expected element <{element}> not found in {doc}")]
    MissingElement {
        doc: &'static str,
        element: &'static str,
    },

    /// An element was present but lacked a required attribute
    #[error("Element <{element}> is missing attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute value failed to parse as the expected type
    #[error("Could not parse {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },

    /// The rank listing skipped or repeated a rank number
    #[error("Rank listing out of sequence: expected rank {expected}, found {found}")]
    RankMismatch { expected: usize, found: usize },

    /// A rank listing page contained no ranked entries at all
    #[error("Rank listing page contained no ranked entries")]
    EmptyRankPage,
}

impl ApiError {
    /// Whether retrying the request might help.
    ///
    /// HTTP 202 is the XML API's "export queued, ask again" response; 429
    /// and 5xx are throttling/outage responses. Everything else is either a
    /// transport error (assumed transient) or a contract change (fatal).
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http { .. } => true,
            ApiError::Status { status, .. } => {
                *status == 202 || *status == 429 || *status >= 500
            }
            _ => false,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let queued = ApiError::Status {
            url: "u".to_string(),
            status: 202,
        };
        let throttled = ApiError::Status {
            url: "u".to_string(),
            status: 429,
        };
        let outage = ApiError::Status {
            url: "u".to_string(),
            status: 503,
        };
        let missing = ApiError::Status {
            url: "u".to_string(),
            status: 404,
        };
        assert!(queued.is_transient());
        assert!(throttled.is_transient());
        assert!(outage.is_transient());
        assert!(!missing.is_transient());
        assert!(
            !ApiError::MissingElement {
                doc: "thing",
                element: "comments"
            }
            .is_transient()
        );
    }
}
