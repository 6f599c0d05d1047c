//! ContentItem model - one proofreadable unit of the content repository.

use super::content_kind::ContentKind;
use crate::urls::slugify;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key holding the item's UUID on the website.
pub const META_UUID: &str = "uuid";

/// Metadata key holding the URL slug derived from the display title.
pub const META_TITLE_SLUG: &str = "title_slug";

/// A proofreadable unit: a course, a tutorial, or a folder of tutorials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Kind of listing the item belongs to
    pub kind: ContentKind,

    /// Stable slug, unique within `kind`
    pub id: String,

    /// Title shown to users
    pub display_title: String,

    /// Location inside the content tree
    #[serde(default)]
    pub path_segments: Vec<String>,

    /// Free-form key-value data (uuid, title slug, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ContentItem {
    /// Create a new minimal content item.
    pub fn new(kind: ContentKind, id: String, display_title: String) -> Self {
        Self {
            kind,
            id,
            display_title,
            path_segments: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// A course as found under `courses/<id>`.
    pub fn course(id: &str, title: &str, uuid: &str) -> Self {
        Self::new(ContentKind::Course, id.to_string(), title.to_string())
            .with_path_segments(vec![id.to_string()])
            .with_metadata(META_UUID, uuid)
            .with_metadata(META_TITLE_SLUG, &slugify(title))
    }

    /// A tutorial as found under `tutorials/<category>/<name>`.
    pub fn tutorial(category: &str, name: &str, title: &str, uuid: &str) -> Self {
        Self::new(
            ContentKind::Tutorial,
            format!("{category}/{name}"),
            title.to_string(),
        )
        .with_path_segments(vec![category.to_string(), name.to_string()])
        .with_metadata(META_UUID, uuid)
        .with_metadata(META_TITLE_SLUG, &slugify(title))
    }

    /// A tutorial folder; one segment per nesting level.
    pub fn tutorial_section(segments: Vec<String>) -> Self {
        let id = segments.join("/");
        let title = segments.last().cloned().unwrap_or_default();
        Self::new(ContentKind::TutorialSection, id, title).with_path_segments(segments)
    }

    /// Builder: Set path segments.
    pub fn with_path_segments(mut self, segments: Vec<String>) -> Self {
        self.path_segments = segments;
        self
    }

    /// Builder: Add metadata entry.
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Metadata lookup.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Website UUID, when known.
    pub fn uuid(&self) -> Option<&str> {
        self.meta(META_UUID)
    }

    /// Title slug, when known.
    pub fn title_slug(&self) -> Option<&str> {
        self.meta(META_TITLE_SLUG)
    }

    /// First path segment (the category of a tutorial).
    pub fn category(&self) -> Option<&str> {
        self.path_segments.first().map(String::as_str)
    }

    /// Last path segment, what lists display.
    pub fn leaf_name(&self) -> &str {
        self.path_segments
            .last()
            .map(String::as_str)
            .unwrap_or(&self.id)
    }

    /// Segments above the leaf, outermost first.
    pub fn parent_chain(&self) -> &[String] {
        match self.path_segments.split_last() {
            Some((_, parents)) => parents,
            None => &[],
        }
    }

    /// Strings the fuzzy matcher compares a query with.
    pub fn search_keys(&self) -> Vec<String> {
        let mut keys = vec![self.id.clone(), self.display_title.clone()];
        if self.path_segments.len() > 1 {
            keys.push(self.leaf_name().to_string());
            keys.push(self.path_segments.join(" "));
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_course() {
        let item = ContentItem::course("btc101", "Bitcoin: A Journey", "1234-abcd");
        assert_eq!(item.kind, ContentKind::Course);
        assert_eq!(item.id, "btc101");
        assert_eq!(item.uuid(), Some("1234-abcd"));
        assert_eq!(item.title_slug(), Some("bitcoin-a-journey"));
        assert_eq!(item.leaf_name(), "btc101");
    }

    #[test]
    fn tutorial_path() {
        let item = ContentItem::tutorial("wallet", "alby", "Alby Wallet", "u-1");
        assert_eq!(item.id, "wallet/alby");
        assert_eq!(item.category(), Some("wallet"));
        assert_eq!(item.leaf_name(), "alby");
        assert_eq!(item.parent_chain(), &["wallet".to_string()]);
    }

    #[test]
    fn nested_section() {
        let item = ContentItem::tutorial_section(vec![
            "wallet".into(),
            "mobile".into(),
            "android".into(),
        ]);
        assert_eq!(item.id, "wallet/mobile/android");
        assert_eq!(item.display_title, "android");
        assert_eq!(item.parent_chain().len(), 2);
        assert!(!item.path_segments.is_empty());
    }

    #[test]
    fn search_keys_cover_leaf_and_path() {
        let item = ContentItem::tutorial("wallet", "alby", "Alby Wallet", "u-1");
        let keys = item.search_keys();
        assert!(keys.contains(&"wallet/alby".to_string()));
        assert!(keys.contains(&"alby".to_string()));
        assert!(keys.contains(&"wallet alby".to_string()));
        assert!(keys.contains(&"Alby Wallet".to_string()));
    }

    #[test]
    fn content_item_serialization() {
        let item = ContentItem::course("btc101", "Bitcoin 101", "u-2");
        let json = serde_json::to_string(&item).unwrap();
        let back: ContentItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
        assert!(json.contains("\"kind\":\"course\""));
    }
}
