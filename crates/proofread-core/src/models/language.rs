//! Language model for translation targets.

use serde::{Deserialize, Serialize};

/// A language content can be proofread in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Language {
    /// Short code; flows into URLs, labels and project fields
    pub code: String,

    /// English name, UI only
    pub display_name: String,

    /// Alternate spellings matched during search (native name, ...)
    #[serde(default)]
    pub search_aliases: Vec<String>,
}

impl Language {
    /// Create a new language.
    pub fn new(code: &str, display_name: &str) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            search_aliases: Vec::new(),
        }
    }

    /// Builder: Add search alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.search_aliases.push(alias.to_string());
        self
    }

    /// Strings the fuzzy matcher compares a query with.
    pub fn search_keys(&self) -> Vec<&str> {
        let mut keys = vec![self.code.as_str(), self.display_name.as_str()];
        keys.extend(self.search_aliases.iter().map(String::as_str));
        keys
    }

    /// Languages supported by the content repository.
    pub fn defaults() -> Vec<Self> {
        [
            ("en", "English", "English"),
            ("fr", "French", "Français"),
            ("es", "Spanish", "Español"),
            ("de", "German", "Deutsch"),
            ("it", "Italian", "Italiano"),
            ("pt", "Portuguese", "Português"),
            ("ja", "Japanese", "日本語"),
            ("ko", "Korean", "한국어"),
            ("zh", "Chinese", "中文"),
            ("ar", "Arabic", "العربية"),
            ("fa", "Persian", "فارسی"),
            ("pl", "Polish", "Polski"),
            ("ru", "Russian", "Русский"),
            ("nl", "Dutch", "Nederlands"),
            ("tr", "Turkish", "Türkçe"),
            ("vi", "Vietnamese", "Tiếng Việt"),
            ("hi", "Hindi", "हिन्दी"),
            ("cs", "Czech", "Čeština"),
            ("fi", "Finnish", "Suomi"),
            ("el", "Greek", "Ελληνικά"),
            ("he", "Hebrew", "עברית"),
            ("hu", "Hungarian", "Magyar"),
            ("id", "Indonesian", "Bahasa Indonesia"),
            ("nb", "Norwegian", "Norsk bokmål"),
            ("ro", "Romanian", "Română"),
            ("sv", "Swedish", "Svenska"),
            ("th", "Thai", "ไทย"),
            ("uk", "Ukrainian", "Українська"),
        ]
        .into_iter()
        .map(|(code, name, native)| {
            let language = Self::new(code, name);
            if native == name {
                language
            } else {
                language.with_alias(native)
            }
        })
        .collect()
    }
}
