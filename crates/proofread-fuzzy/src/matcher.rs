//! Generic ranked search over arbitrary candidates.

use crate::score::score_key;

/// Default number of results returned by a search.
pub const DEFAULT_LIMIT: usize = 10;

/// Default relevance floor. Keeps unrelated strings out of the results while
/// still admitting one or two typos in short keys.
pub const DEFAULT_MIN_SCORE: f64 = 0.35;

/// Tunables for a search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions {
    /// Maximum number of matches returned.
    pub limit: usize,
    /// Candidates scoring below this are dropped.
    pub min_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl SearchOptions {
    /// Same options with a different limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Same options without a result cap.
    pub fn unlimited(mut self) -> Self {
        self.limit = usize::MAX;
        self
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a, T> {
    /// The matched candidate.
    pub item: &'a T,
    /// Position of the candidate in the input slice.
    pub index: usize,
    /// Best score over the candidate's keys.
    pub score: f64,
}

/// A configured matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    options: SearchOptions,
}

impl Matcher {
    /// Create a matcher with the given options.
    pub const fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// The options this matcher was built with.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Rank `candidates` against `query`.
    ///
    /// `key_fn` yields every searchable string of a candidate; the candidate
    /// scores as its best key. Results are sorted by descending score, ties
    /// keep input order. An empty query returns candidates unranked.
    pub fn search<'a, T, F, K, S>(&self, query: &str, candidates: &'a [T], key_fn: F) -> Vec<Match<'a, T>>
    where
        F: Fn(&'a T) -> K,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query = query.trim();
        if query.is_empty() {
            return candidates
                .iter()
                .enumerate()
                .take(self.options.limit)
                .map(|(index, item)| Match {
                    item,
                    index,
                    score: 1.0,
                })
                .collect();
        }

        let mut matches: Vec<Match<'a, T>> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let score = key_fn(item)
                    .into_iter()
                    .map(|key| score_key(query, key.as_ref()))
                    .fold(0.0, f64::max);
                (score >= self.options.min_score).then_some(Match { item, index, score })
            })
            .collect();

        // `sort_by` is stable: equal scores keep their input order.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.options.limit);
        matches
    }
}

/// Rank `candidates` against `query` with explicit limit and floor.
pub fn search<'a, T, F, K, S>(
    query: &str,
    candidates: &'a [T],
    key_fn: F,
    limit: usize,
    min_score: f64,
) -> Vec<Match<'a, T>>
where
    F: Fn(&'a T) -> K,
    K: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Matcher::new(SearchOptions { limit, min_score }).search(query, candidates, key_fn)
}
