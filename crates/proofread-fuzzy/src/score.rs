//! Similarity primitives.
//!
//! All scores are in `0.0..=1.0`. Comparisons are done on `char`s, never on
//! bytes, so non-ASCII aliases ("Español", "日本語") are scored correctly.

/// Upper bound of the edit-distance band.
const FUZZY_CEILING: f64 = 0.65;

/// Band floors for substring matches.
const PREFIX_FLOOR: f64 = 0.90;
const BOUNDARY_FLOOR: f64 = 0.80;
const INNER_FLOOR: f64 = 0.70;

/// Width of a substring band, scaled by how much of the key the query covers.
const BAND_WIDTH: f64 = 0.09;

/// Characters that start a new "word" inside a key.
const SEPARATORS: [char; 6] = ['-', '_', '/', ' ', '.', ':'];

/// Levenshtein edit distance between two strings.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    levenshtein_chars(&a, &b)
}

fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single-row dynamic programming.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (diagonal + cost).min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[b.len()]
}

/// `1 - distance / longest`, so identical strings score `1.0`.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    normalized_chars(&a, &b)
}

fn normalized_chars(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_chars(a, b) as f64 / longest as f64
}

/// Best similarity of `query` against any window of `key` of the same length.
///
/// This is what makes a short query tolerant of typos inside a long key:
/// `"bitcon"` against `"intro-to-bitcoin"` compares with `"bitcoi"`, not with
/// the whole key.
pub fn window_similarity(query: &str, key: &str) -> f64 {
    let q: Vec<char> = query.chars().collect();
    let k: Vec<char> = key.chars().collect();
    if q.len() >= k.len() {
        return normalized_chars(&q, &k);
    }
    k.windows(q.len())
        .map(|window| normalized_chars(&q, window))
        .fold(0.0, f64::max)
}

/// Score one search key against a query.
///
/// Both sides are compared case-insensitively. An empty query scores `1.0`
/// against every key.
pub fn score_key(query: &str, key: &str) -> f64 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 1.0;
    }
    let key = key.to_lowercase();
    if key.is_empty() {
        return 0.0;
    }
    if query == key {
        return 1.0;
    }

    let coverage = query.chars().count() as f64 / key.chars().count() as f64;
    if let Some(floor) = substring_band(&query, &key) {
        // coverage < 1 here, so a partial match never reaches the next band.
        return floor + BAND_WIDTH * coverage.min(1.0);
    }

    let similarity = normalized_similarity(&query, &key).max(window_similarity(&query, &key));
    FUZZY_CEILING * similarity
}

/// Best band floor among all occurrences of `query` in `key`.
fn substring_band(query: &str, key: &str) -> Option<f64> {
    let mut best: Option<f64> = None;
    for (index, _) in key.match_indices(query) {
        let floor = if index == 0 {
            PREFIX_FLOOR
        } else {
            match key[..index].chars().next_back() {
                Some(prev) if SEPARATORS.contains(&prev) => BOUNDARY_FLOOR,
                _ => INNER_FLOOR,
            }
        };
        best = Some(best.map_or(floor, |b: f64| b.max(floor)));
        if floor >= PREFIX_FLOOR {
            break;
        }
    }
    best
}
