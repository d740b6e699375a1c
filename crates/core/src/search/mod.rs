//! Relevance ranking for search results.
//!
//! Scoring favours, in order: exact and prefix matches on the item name,
//! matches on the credited artists, fuzzy similarity of the name, and
//! popularity. Artists get a small boost so the artist itself ranks above
//! tracks that share its name.

use serde::{Deserialize, Serialize};

const NAME_EXACT: f64 = 1000.0;
const NAME_PREFIX: f64 = 500.0;
const NAME_CONTAINS: f64 = 200.0;
const ARTIST_EXACT: f64 = 800.0;
const ARTIST_PREFIX: f64 = 400.0;
const ARTIST_CONTAINS: f64 = 150.0;
const ARTIST_TYPE_BONUS: f64 = 100.0;
const POPULARITY_WEIGHT: f64 = 0.5;
/// Only the start of long names takes part in the edit distance.
const SIMILARITY_PREFIX_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Track,
    Artist,
    Album,
    Playlist,
    Radio,
    #[default]
    #[serde(other)]
    Other,
}

/// Minimal view of a library item as far as ranking is concerned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchItem {
    pub name: String,
    pub media_type: MediaType,
    /// Names of the credited artists, empty for artists themselves.
    pub artists: Vec<String>,
    /// Popularity from metadata on a 0–100 scale. Non-finite values count
    /// as missing.
    pub popularity: Option<f64>,
}

impl SearchItem {
    pub fn new(name: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            name: name.into(),
            media_type,
            ..Default::default()
        }
    }

    pub fn with_artists<I, S>(mut self, artists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artists = artists.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }
}

/// Edit distance between two strings, counted in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == *cb {
                previous[j]
            } else {
                1 + previous[j].min(previous[j + 1]).min(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

fn match_bonus(haystack: &str, query: &str, exact: f64, prefix: f64, contains: f64) -> f64 {
    if haystack == query {
        exact
    } else if haystack.starts_with(query) {
        prefix
    } else if haystack.contains(query) {
        contains
    } else {
        0.0
    }
}

/// Scores `item` against `query`; higher is more relevant.
pub fn relevance_score(item: &SearchItem, query: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let name = item.name.trim().to_lowercase();

    let mut score = match_bonus(&name, &query, NAME_EXACT, NAME_PREFIX, NAME_CONTAINS);

    if !item.artists.is_empty() {
        let artists = item.artists.join(" ").to_lowercase();
        if !artists.is_empty() {
            score += match_bonus(
                &artists,
                &query,
                ARTIST_EXACT,
                ARTIST_PREFIX,
                ARTIST_CONTAINS,
            );
        }
    }

    let name_prefix: String = name.chars().take(SIMILARITY_PREFIX_CHARS).collect();
    let distance = levenshtein_distance(&name_prefix, &query) as f64;
    let longest = name.chars().count().max(query.chars().count()).max(1) as f64;
    score += (100.0 - distance / longest * 100.0).max(0.0);

    let popularity = item.popularity.filter(|p| p.is_finite()).unwrap_or(0.0);
    score += popularity * POPULARITY_WEIGHT;

    if item.media_type == MediaType::Artist && name.contains(&query) {
        score += ARTIST_TYPE_BONUS;
    }

    score
}

/// Pairs every item with its score, most relevant first. Ties keep their
/// input order.
pub fn rank<'a>(items: &'a [SearchItem], query: &str) -> Vec<(f64, &'a SearchItem)> {
    let mut ranked: Vec<_> = items
        .iter()
        .map(|item| (relevance_score(item, query), item))
        .collect();
    ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    ranked
}

/// Returns a copy of `items` ordered by relevance to `query`.
pub fn sort_by_relevance(items: &[SearchItem], query: &str) -> Vec<SearchItem> {
    rank(items, query)
        .into_iter()
        .map(|(_, item)| item.clone())
        .collect()
}
