//! In-memory catalog of proofreadable content.

use crate::error::{Error, Result};
use crate::models::{ContentItem, ContentKind, Language, Listing};
use std::collections::HashMap;

/// One scanned listing with an id index.
#[derive(Debug, Default, Clone)]
struct Shelf {
    items: Vec<ContentItem>,
    by_id: HashMap<String, usize>,
}

impl Shelf {
    fn insert(&mut self, item: ContentItem) {
        if self.by_id.contains_key(&item.id) {
            tracing::warn!(kind = %item.kind, id = %item.id, "duplicate content item dropped");
            return;
        }
        self.by_id.insert(item.id.clone(), self.items.len());
        self.items.push(item);
    }

    fn get(&self, id: &str) -> Option<&ContentItem> {
        self.by_id.get(id).map(|&i| &self.items[i])
    }
}

/// Lookup over courses, tutorials, tutorial sections and languages.
///
/// Built once from scanner output and read-only afterwards. Video and image
/// course kinds resolve against the course listing; Weblate has none.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    courses: Shelf,
    tutorials: Shelf,
    sections: Shelf,
    languages: Vec<Language>,
}

impl Catalog {
    /// Index `items` and `languages`. The first entry wins on duplicate ids.
    pub fn new(items: impl IntoIterator<Item = ContentItem>, languages: Vec<Language>) -> Self {
        let mut catalog = Self::default();
        for item in items {
            match item.kind.listing() {
                Some(listing) => catalog.shelf_mut(listing).insert(item),
                None => {
                    tracing::warn!(kind = %item.kind, id = %item.id, "content item of kind without listing dropped")
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for language in languages {
            if seen.insert(language.code.clone()) {
                catalog.languages.push(language);
            } else {
                tracing::warn!(code = %language.code, "duplicate language dropped");
            }
        }

        tracing::debug!(
            courses = catalog.courses.items.len(),
            tutorials = catalog.tutorials.items.len(),
            sections = catalog.sections.items.len(),
            languages = catalog.languages.len(),
            "catalog built"
        );
        catalog
    }

    /// Catalog with the built-in language table.
    pub fn with_default_languages(items: impl IntoIterator<Item = ContentItem>) -> Self {
        Self::new(items, Language::defaults())
    }

    fn shelf(&self, listing: Listing) -> &Shelf {
        match listing {
            Listing::Courses => &self.courses,
            Listing::Tutorials => &self.tutorials,
            Listing::TutorialSections => &self.sections,
        }
    }

    fn shelf_mut(&mut self, listing: Listing) -> &mut Shelf {
        match listing {
            Listing::Courses => &mut self.courses,
            Listing::Tutorials => &mut self.tutorials,
            Listing::TutorialSections => &mut self.sections,
        }
    }

    /// Items selectable for `kind`, in scan order. Empty for Weblate.
    pub fn list(&self, kind: ContentKind) -> &[ContentItem] {
        match kind.listing() {
            Some(listing) => &self.shelf(listing).items,
            None => &[],
        }
    }

    /// Item `id` of `kind`.
    pub fn get(&self, kind: ContentKind, id: &str) -> Result<&ContentItem> {
        kind.listing()
            .and_then(|listing| self.shelf(listing).get(id))
            .ok_or_else(|| Error::not_found(kind.item_noun(), id))
    }

    /// All languages.
    pub fn list_languages(&self) -> &[Language] {
        &self.languages
    }

    /// Language by code.
    pub fn language(&self, code: &str) -> Result<&Language> {
        self.languages
            .iter()
            .find(|l| l.code == code)
            .ok_or_else(|| Error::not_found("language", code))
    }

    /// Number of content items across all listings.
    pub fn len(&self) -> usize {
        self.courses.items.len() + self.tutorials.items.len() + self.sections.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
