//! Proofread Fuzzy Matching
//!
//! Similarity ranking for the interactive lookups of the proofreading issue
//! manager: courses, tutorials, languages and repository branches.
//!
//! # Scoring
//!
//! Every candidate exposes one or more search keys. A key is compared to the
//! lowercase query and placed in one of five bands:
//!
//! | band | score |
//! |------|-------|
//! | exact (case-insensitive) | `1.0` |
//! | prefix | `0.90 ..= 0.99` |
//! | word-boundary substring | `0.80 ..= 0.89` |
//! | mid-string substring | `0.70 ..= 0.79` |
//! | edit-distance similarity | `0.00 ..= 0.65` |
//!
//! Bands never overlap, so an exact match always beats a partial one and a
//! prefix always beats the same text found mid-string.
//!
//! # Browsing
//!
//! An empty query is not an error and not an empty result: it returns the
//! candidates in their original order. "Show everything" is a search.

mod branch;
mod matcher;
mod score;

pub use branch::{language_tokens_match, suggest, BranchSuggestOptions, LANGUAGE_BOOST};
pub use matcher::{search, Match, Matcher, SearchOptions, DEFAULT_LIMIT, DEFAULT_MIN_SCORE};
pub use score::{levenshtein, normalized_similarity, score_key, window_similarity};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_beats_prefix_beats_substring() {
        let exact = score_key("btc101", "btc101");
        let prefix = score_key("btc", "btc101");
        let inner = score_key("101", "btc101");
        assert!(exact > prefix);
        assert!(prefix > inner);
    }

    #[test]
    fn browse_all_is_a_search() {
        let items = ["b", "a", "c"];
        let found = search("", &items, |s| [*s], 10, DEFAULT_MIN_SCORE);
        let names: Vec<_> = found.iter().map(|m| *m.item).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
