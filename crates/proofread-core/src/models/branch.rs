//! Branch candidate offered to the user.

use serde::{Deserialize, Serialize};

/// A remote branch name, optionally tagged with the language it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCandidate {
    pub name: String,

    /// Language code the branch appears to be about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_hint: Option<String>,
}

impl BranchCandidate {
    /// Tag `name` with `language` when one of its tokens is that code.
    pub fn new(name: impl Into<String>, language: Option<&str>) -> Self {
        let name = name.into();
        let relevance_hint = language
            .filter(|code| proofread_fuzzy::language_tokens_match(&name, code))
            .map(str::to_string);
        Self {
            name,
            relevance_hint,
        }
    }
}
