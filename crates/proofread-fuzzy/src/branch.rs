//! Branch suggestions biased towards the selected language.
//!
//! Translation work usually lives on branches named after the language
//! (`es-review`, `translation/fr`, `DE_fixes`). When a language is known,
//! those branches are lifted above equally plausible ones.

use crate::matcher::{Matcher, SearchOptions};

/// Score added to branches whose name carries the language code.
pub const LANGUAGE_BOOST: f64 = 0.25;

/// Characters separating tokens of a branch name.
const BRANCH_SEPARATORS: [char; 4] = ['-', '_', '/', '.'];

/// Tunables for [`suggest`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchSuggestOptions {
    /// Limit and relevance floor of the underlying search.
    pub search: SearchOptions,
    /// Boost for language branches.
    pub language_boost: f64,
}

impl Default for BranchSuggestOptions {
    fn default() -> Self {
        Self {
            search: SearchOptions::default(),
            language_boost: LANGUAGE_BOOST,
        }
    }
}

/// Whether a token of `branch` equals `language_code`, ignoring case.
///
/// ```
/// use proofread_fuzzy::language_tokens_match;
///
/// assert!(language_tokens_match("es-review", "es"));
/// assert!(language_tokens_match("translation/ES", "es"));
/// assert!(!language_tokens_match("tests", "es"));
/// ```
pub fn language_tokens_match(branch: &str, language_code: &str) -> bool {
    let code = language_code.trim();
    if code.is_empty() {
        return false;
    }
    branch
        .split(|c| BRANCH_SEPARATORS.contains(&c))
        .any(|token| token.eq_ignore_ascii_case(code))
}

/// Suggest branch names for `query`, optionally biased to `language_code`.
///
/// A branch equal to the query always ranks first, a byte-exact match ahead
/// of one differing only in case. An empty branch list
/// yields an empty suggestion list.
pub fn suggest<S: AsRef<str>>(
    query: &str,
    language_code: Option<&str>,
    branches: &[S],
    options: BranchSuggestOptions,
) -> Vec<String> {
    if branches.is_empty() {
        return Vec::new();
    }

    let query = query.trim();
    let matcher = Matcher::new(options.search.unlimited());
    let language_code = language_code.map(str::trim).filter(|code| !code.is_empty());

    let mut ranked: Vec<(bool, bool, f64, &str)> = matcher
        .search(query, branches, |branch| [AsRef::<str>::as_ref(branch)])
        .into_iter()
        .map(|m| {
            let name: &str = m.item.as_ref();
            let literal = !query.is_empty() && name == query;
            let exact = literal || (!query.is_empty() && name.to_lowercase() == query.to_lowercase());
            let boost = match language_code {
                Some(code) if language_tokens_match(name, code) => options.language_boost,
                _ => 0.0,
            };
            (literal, exact, m.score + boost, name)
        })
        .collect();

    // Stable: ties keep the order the branches were listed in.
    ranked.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| b.2.total_cmp(&a.2))
    });
    ranked
        .into_iter()
        .take(options.search.limit)
        .map(|(_, _, _, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> BranchSuggestOptions {
        BranchSuggestOptions::default()
    }

    #[test]
    fn empty_query_boosts_language_branches() {
        let branches = ["dev", "es-review", "main"];
        let found = suggest("", Some("es"), &branches, opts());
        assert_eq!(found, vec!["es-review", "dev", "main"]);
        let es = found.iter().position(|b| b == "es-review").unwrap();
        let main = found.iter().position(|b| b == "main").unwrap();
        assert!(es < main);
    }

    #[test]
    fn without_language_keeps_input_order() {
        let branches = ["dev", "es-review", "main"];
        assert_eq!(suggest("", None, &branches, opts()), vec!["dev", "es-review", "main"]);
        assert_eq!(suggest("", Some("  "), &branches, opts()), vec!["dev", "es-review", "main"]);
    }

    #[test]
    fn exact_match_survives_boosting() {
        let branches = ["es-review", "es-dev", "dev"];
        let found = suggest("dev", Some("es"), &branches, opts());
        assert_eq!(found[0], "dev");
        assert!(found.contains(&"es-dev".to_string()));
    }

    #[test]
    fn exact_match_ignores_case() {
        let branches = ["es-main", "MAIN"];
        let found = suggest("main", Some("es"), &branches, opts());
        assert_eq!(found[0], "MAIN");
    }

    #[test]
    fn literal_match_beats_case_variant() {
        let branches = ["MAIN", "main", "Main"];
        let found = suggest("main", None, &branches, opts());
        assert_eq!(found[0], "main");
        assert_eq!(&found[1..], ["MAIN", "Main"]);
    }

    #[test]
    fn branch_named_after_language_is_boosted() {
        let branches = ["release", "fr", "feature"];
        let found = suggest("", Some("fr"), &branches, opts());
        assert_eq!(found[0], "fr");
    }

    #[test]
    fn substring_of_word_is_not_a_language_branch() {
        assert!(!language_tokens_match("tests", "es"));
        assert!(!language_tokens_match("dev", "de"));
        assert!(language_tokens_match("review-de", "de"));
        assert!(language_tokens_match("DE_fixes", "de"));
        assert!(!language_tokens_match("anything", ""));
    }

    #[test]
    fn empty_branch_list_is_empty_result() {
        let branches: [&str; 0] = [];
        assert!(suggest("dev", Some("es"), &branches, opts()).is_empty());
    }

    #[test]
    fn limit_applies_after_boost() {
        let branches = ["a", "b", "c", "fr-a"];
        let mut options = opts();
        options.search.limit = 1;
        assert_eq!(suggest("", Some("fr"), &branches, options), vec!["fr-a"]);
    }

    #[test]
    fn unrelated_branches_are_filtered() {
        let branches = vec!["dev".to_string(), "main".to_string(), "lightning-fix".to_string()];
        let found = suggest("lightning", Some("es"), &branches, opts());
        assert_eq!(found, vec!["lightning-fix"]);
    }
}
