//! Proofread Core - issue derivation for content proofreading
//!
//! Turns a small user selection (content item, language, branch, iteration,
//! urgency) into a complete GitHub issue for the PlanB Network proofreading
//! project board.
//!
//! # Architecture
//!
//! - **Models**: Content items, languages, issue payloads and board fields
//! - **Catalog**: Lookup over scanned courses, tutorials and sections
//! - **Search**: Fuzzy lookups over the catalog
//! - **Registry**: One issue template per content kind, held as data
//! - **Validator**: Field-by-field checking of raw requests
//! - **Service**: Preview and creation against the tracker and branch list
//!
//! # Example
//!
//! ```
//! use proofread_core::{Catalog, ContentItem, ContentKind, RawIssueRequest, TemplateRegistry};
//!
//! let catalog = Catalog::with_default_languages(vec![
//!     ContentItem::course("btc101", "Bitcoin 101", "c7e3"),
//! ]);
//! let raw = RawIssueRequest::default()
//!     .with_id("btc101")
//!     .with_language("es")
//!     .with_branch("dev")
//!     .with_iteration("1st")
//!     .with_urgency("not urgent");
//!
//! let input = proofread_core::validate(ContentKind::Course, &raw, &catalog).unwrap();
//! let issue = TemplateRegistry::builtin().derive(ContentKind::Course, &input).unwrap();
//! assert_eq!(issue.title, "[PROOFREADING] btc101 - es");
//! ```

pub mod catalog;
pub mod collaborators;
pub mod error;
pub mod models;
pub mod registry;
pub mod search;
pub mod service;
pub mod urls;
pub mod validator;

pub use catalog::Catalog;
pub use collaborators::{BranchSource, CreatedIssue, IssueTracker, StaticBranches};
pub use error::{Error, Result};
pub use models::{
    BranchCandidate, ContentItem, ContentKind, IssuePayload, Iteration, Language, Listing,
    ProjectField, ProjectFields, Urgency,
};
pub use registry::{IssueSpecTemplate, TemplateRegistry};
pub use search::{search_items, search_languages, Scored};
pub use service::{BranchStatus, Created, IssueService, Preview, Warning};
pub use validator::{validate, FieldError, FieldErrorKind, RawIssueRequest, ValidatedInput, ValidationFailure};

pub use proofread_fuzzy::SearchOptions;
