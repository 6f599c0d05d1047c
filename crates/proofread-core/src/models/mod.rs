//! Data model for proofreading issues.
//!
//! # Content
//!
//! - [`ContentKind`] - Discriminator selecting listing and issue template
//! - [`ContentItem`] - A course, tutorial, or tutorial section
//! - [`Language`] - Translation target
//!
//! # Issues
//!
//! - [`IssuePayload`] - Title, body, labels and project fields of one issue
//! - [`ProjectField`] - Custom column of the project board
//! - [`Iteration`], [`Urgency`] - User-chosen project values
//! - [`BranchCandidate`] - Remote branch offered during selection

mod branch;
mod content_item;
mod content_kind;
mod issue;
mod language;

pub use branch::BranchCandidate;
pub use content_item::{ContentItem, META_TITLE_SLUG, META_UUID};
pub use content_kind::{ContentKind, Listing};
pub use issue::{
    IssuePayload, Iteration, ProjectField, ProjectFields, Urgency, CONTENT_TYPE_OPTIONS,
    STATUS_OPTIONS,
};
pub use language::Language;
