//! Fuzzy lookups over the catalog.

use crate::catalog::Catalog;
use crate::models::{ContentItem, ContentKind, Language};
use proofread_fuzzy::{Matcher, SearchOptions};
use serde::Serialize;

/// A search hit with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    pub score: f64,
}

/// Items of `kind` matching `query`, best first.
///
/// An empty query lists the items in catalog order.
pub fn search_items(
    catalog: &Catalog,
    kind: ContentKind,
    query: &str,
    options: SearchOptions,
) -> Vec<Scored<ContentItem>> {
    let candidates = catalog.list(kind);
    let hits: Vec<_> = Matcher::new(options)
        .search(query, candidates, |item| item.search_keys())
        .into_iter()
        .map(|m| Scored {
            item: m.item.clone(),
            score: m.score,
        })
        .collect();
    tracing::debug!(%kind, query, candidates = candidates.len(), hits = hits.len(), "item search");
    hits
}

/// Languages matching `query` by code, English name or alias.
pub fn search_languages(
    catalog: &Catalog,
    query: &str,
    options: SearchOptions,
) -> Vec<Scored<Language>> {
    Matcher::new(options)
        .search(query, catalog.list_languages(), |language| language.search_keys())
        .into_iter()
        .map(|m| Scored {
            item: m.item.clone(),
            score: m.score,
        })
        .collect()
}
