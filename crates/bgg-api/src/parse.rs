//! Extraction of game ids, rating counts, ratings pages and user fields
//! from the documents BGG serves.
//!
//! The rank listing is HTML; the API endpoints answer with XML whose
//! elements are all lowercase and carry their payload in attributes, so the
//! same `scraper` document model covers both. Extraction is
//! structure-checked: a missing element or attribute is a contract change
//! and surfaces as a typed error instead of a silently shorter dataset.

use crate::error::{ApiError, Result};
use dataset::{GameId, GameSummary, RatingEntry, RatingsPage, UserProfile};
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;

/// Number of ranked entries per listing page
pub const RANK_PAGE_SIZE: usize = 100;

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("valid css selector")
}

fn parse_num<T: FromStr>(field: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ApiError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

/// Find the first `css` match under `scope` and return its `value`
/// attribute, the payload convention of the XML API
fn required_value(
    scope: ElementRef<'_>,
    css: &str,
    element: &'static str,
    doc: &'static str,
) -> Result<String> {
    let selector = sel(css);
    let el = scope
        .select(&selector)
        .next()
        .ok_or(ApiError::MissingElement { doc, element })?;
    el.value()
        .attr("value")
        .map(str::to_string)
        .ok_or(ApiError::MissingAttribute {
            element,
            attribute: "value",
        })
}

/// Extract the game ids from one page of the rank listing.
///
/// Each ranked entry is anchored by its 1-based overall rank
/// (`<a name="N">` inside the rank cell) and links to `/boardgame/<id>/`.
/// Ranks must continue the sequence starting at `first_rank` without gaps
/// or repeats; anything else means the listing markup changed and the
/// ordinal correspondence can no longer be trusted.
pub fn parse_rank_page(html: &str, first_rank: usize) -> Result<Vec<GameId>> {
    let doc = Html::parse_document(html);
    let row_sel = sel("tr");
    let rank_sel = sel("td.collection_rank a[name]");
    let link_sel = sel("a[href]");

    let mut ids = Vec::new();
    let mut expected = first_rank;
    for row in doc.select(&row_sel) {
        // Rows without a rank anchor are headers or ads
        let Some(anchor) = row.select(&rank_sel).next() else {
            continue;
        };
        let rank_attr = anchor
            .value()
            .attr("name")
            .ok_or(ApiError::MissingAttribute {
                element: "a",
                attribute: "name",
            })?;
        let rank: usize = parse_num("rank", rank_attr)?;
        if rank != expected {
            return Err(ApiError::RankMismatch {
                expected,
                found: rank,
            });
        }

        let href = row
            .select(&link_sel)
            .filter_map(|a| a.value().attr("href"))
            .find(|h| h.contains("/boardgame/"))
            .ok_or(ApiError::MissingElement {
                doc: "browse",
                element: "a",
            })?;
        ids.push(parse_game_href(href)?);
        expected += 1;
    }

    if ids.is_empty() {
        return Err(ApiError::EmptyRankPage);
    }
    Ok(ids)
}

/// Pull the numeric id out of a `/boardgame/<id>/<slug>` link
fn parse_game_href(href: &str) -> Result<GameId> {
    let tail = href
        .split("/boardgame/")
        .nth(1)
        .ok_or(ApiError::MissingElement {
            doc: "browse",
            element: "a",
        })?;
    let id_part = tail.split('/').next().unwrap_or(tail);
    parse_num("game id", id_part)
}

/// Extract (game id, total rating count) pairs from a batch `thing`
/// response.
///
/// Pairs are keyed by the id carried on each `<item>`, so the caller does
/// not depend on the response preserving request order.
pub fn parse_rating_counts(xml: &str) -> Result<Vec<(GameId, u32)>> {
    let doc = Html::parse_document(xml);
    let item_sel = sel("item");
    let comments_sel = sel("comments");

    let mut counts = Vec::new();
    for item in doc.select(&item_sel) {
        let id_attr = item.value().attr("id").ok_or(ApiError::MissingAttribute {
            element: "item",
            attribute: "id",
        })?;
        let id: GameId = parse_num("game id", id_attr)?;

        let comments = item
            .select(&comments_sel)
            .next()
            .ok_or(ApiError::MissingElement {
                doc: "thing",
                element: "comments",
            })?;
        let total = comments
            .value()
            .attr("totalitems")
            .ok_or(ApiError::MissingAttribute {
                element: "comments",
                attribute: "totalitems",
            })?;
        counts.push((id, parse_num("totalitems", total)?));
    }
    Ok(counts)
}

/// Extract one ratings page: the item-level metadata plus up to 100
/// (username, rating) entries in page order
pub fn parse_ratings_page(xml: &str) -> Result<RatingsPage> {
    let doc = Html::parse_document(xml);
    let item_sel = sel("item");
    let item = doc
        .select(&item_sel)
        .next()
        .ok_or(ApiError::MissingElement {
            doc: "thing",
            element: "item",
        })?;

    // The primary name; alternate-language names carry type="alternate"
    let name = match required_value(item, r#"name[type="primary"]"#, "name", "thing") {
        Ok(value) => value,
        Err(ApiError::MissingElement { .. }) => required_value(item, "name", "name", "thing")?,
        Err(err) => return Err(err),
    };

    let year_published: i32 = parse_num(
        "yearpublished",
        &required_value(item, "yearpublished", "yearpublished", "thing")?,
    )?;
    let weight: f32 = parse_num(
        "averageweight",
        &required_value(item, "averageweight", "averageweight", "thing")?,
    )?;
    let owners: u32 = parse_num("owned", &required_value(item, "owned", "owned", "thing")?)?;
    let average_rating: f32 = parse_num(
        "average",
        &required_value(item, "average", "average", "thing")?,
    )?;

    let comment_sel = sel("comment");
    let mut entries = Vec::new();
    for comment in item.select(&comment_sel) {
        let username = comment
            .value()
            .attr("username")
            .ok_or(ApiError::MissingAttribute {
                element: "comment",
                attribute: "username",
            })?;
        let rating_attr = comment
            .value()
            .attr("rating")
            .ok_or(ApiError::MissingAttribute {
                element: "comment",
                attribute: "rating",
            })?;
        entries.push(RatingEntry {
            username: username.to_string(),
            rating: parse_num("rating", rating_attr)?,
        });
    }

    Ok(RatingsPage {
        game: GameSummary {
            name,
            year_published,
            weight,
            owners,
            average_rating,
        },
        entries,
    })
}

/// Extract registration year and last-login year from a user response.
///
/// `lastlogin` carries a full `YYYY-MM-DD` date; only the year is kept.
pub fn parse_user_profile(xml: &str) -> Result<UserProfile> {
    let doc = Html::parse_document(xml);
    let root = doc.root_element();

    let registered = required_value(root, "yearregistered", "yearregistered", "user")?;
    let last_login = required_value(root, "lastlogin", "lastlogin", "user")?;
    let login_year = last_login.get(..4).ok_or_else(|| ApiError::InvalidValue {
        field: "lastlogin",
        value: last_login.clone(),
    })?;

    Ok(UserProfile {
        year_registered: parse_num("yearregistered", &registered)?,
        last_login: parse_num("lastlogin", login_year)?,
    })
}
